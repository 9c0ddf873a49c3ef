use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "school-link")]
#[command(about = "Quote, book and manage School Link Transport accounts")]
pub struct Cli {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory used as durable storage")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List service areas and plans
    Catalog,
    /// Show the monthly price for an area and plan
    Quote {
        #[arg(long)]
        zone: Option<String>,
        #[arg(long)]
        plan: Option<String>,
    },
    /// Book transport for an area and plan
    Book {
        #[arg(long)]
        zone: String,
        #[arg(long)]
        plan: String,
    },
    Login {
        #[arg(long, help = "Email address or phone number")]
        identity: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        remember: bool,
    },
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        accept_terms: bool,
    },
    Logout,
    /// Show the signed-in user and current booking
    Status,
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
}

impl Cli {
    /// 載入配置檔（若有），並套用命令列覆寫
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.persistence.data_dir = dir.clone();
        }

        Ok(config)
    }
}
