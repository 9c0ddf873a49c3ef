use anyhow::Context;
use clap::Parser;
use school_link::config::cli::{Command, LogFormat};
use school_link::config::RemoteMode;
use school_link::core::pricing::QuoteDisplay;
use school_link::core::RemoteGateway;
use school_link::utils::error::ErrorSeverity;
use school_link::utils::{format, logger, validation::Validate};
use school_link::{
    AppConfig, AuthFlow, BookingEngine, Catalog, Cli, DashboardSummary, FileStore,
    HistoryNavigator, HttpGateway, LoginForm, MemoryStore, PersistenceAdapter, SessionManager,
    SignupForm, SimulatedGateway, ToastCenter,
};
use std::sync::Arc;

struct App {
    persistence: PersistenceAdapter,
    toasts: ToastCenter,
    navigator: HistoryNavigator,
    auth: AuthFlow,
    booking: BookingEngine,
    session: SessionManager,
}

impl App {
    fn build(config: &AppConfig) -> anyhow::Result<Self> {
        // 持久資料寫入目錄；未勾選「記住我」的登入只存在本次執行
        let durable = FileStore::new(config.persistence.data_dir.clone());
        let persistence = PersistenceAdapter::new(Arc::new(durable), Arc::new(MemoryStore::new()))
            .with_strict(config.persistence.strict);

        let gateway: Arc<dyn RemoteGateway> = match config.remote.mode {
            RemoteMode::Simulated => Arc::new(SimulatedGateway::from_config(&config.remote)),
            RemoteMode::Http => Arc::new(
                HttpGateway::from_config(&config.remote).context("building HTTP gateway")?,
            ),
        };

        let toasts = ToastCenter::new();
        let navigator = HistoryNavigator::new();

        let auth = AuthFlow::new(
            persistence.clone(),
            Arc::clone(&gateway),
            Arc::new(toasts.clone()),
            Arc::new(navigator.clone()),
            config.timing.clone(),
        );
        let booking = BookingEngine::new(
            Catalog::from_config(&config.catalog),
            persistence.clone(),
            gateway,
            Arc::new(toasts.clone()),
            config.timing.clone(),
        );
        let session = SessionManager::new(
            persistence.clone(),
            Arc::new(toasts.clone()),
            Arc::new(navigator.clone()),
            config.timing.clone(),
        );

        Ok(Self {
            persistence,
            toasts,
            navigator,
            auth,
            booking,
            session,
        })
    }

    async fn run(&self, command: Command) -> school_link::Result<()> {
        match command {
            Command::Catalog => {
                let catalog = self.booking.catalog();
                println!("Service areas:");
                for zone in catalog.zones() {
                    println!(
                        "  [{}] {} - {} ({})",
                        zone.id,
                        zone.name,
                        format::format_monthly(i64::from(zone.base_price)),
                        zone.distance
                    );
                }
                println!("Plans:");
                for plan in catalog.plans() {
                    println!(
                        "  [{}] {} - {} ({}x)",
                        plan.id, plan.name, plan.description, plan.multiplier
                    );
                    for feature in &plan.features {
                        println!("      - {}", feature);
                    }
                }
            }
            Command::Quote { zone, plan } => {
                self.booking.select_zone(zone.as_deref())?;
                let view = self.booking.select_plan(plan.as_deref())?;
                match view.display {
                    QuoteDisplay::Priced(quote) => println!(
                        "{} / {}: {} per month",
                        quote.zone.name,
                        quote.plan.name,
                        format::format_currency(i64::from(quote.price))
                    ),
                    QuoteDisplay::Empty => {
                        println!("Select an area and a plan to see your monthly price.")
                    }
                }
            }
            Command::Book { zone, plan } => {
                if !self.session.is_authenticated() {
                    tracing::warn!("Booking without a signed-in session");
                }
                self.booking.select_zone(Some(zone.as_str()))?;
                self.booking.select_plan(Some(plan.as_str()))?;
                if let Some(booking) = self.booking.commit_booking().await?.completed() {
                    println!(
                        "📋 {} / {} at {} ({})",
                        booking.zone_name,
                        booking.plan_name,
                        format::format_monthly(i64::from(booking.price)),
                        booking.status
                    );
                }
            }
            Command::Login {
                identity,
                password,
                remember,
            } => {
                let form = LoginForm {
                    identity,
                    password,
                    remember,
                };
                if let Some(session) = self.auth.login(&form).await?.completed() {
                    if !session.remember {
                        println!("Not remembered: this sign-in ends when the command exits.");
                    }
                }
            }
            Command::Signup {
                name,
                email,
                phone,
                password,
                accept_terms,
            } => {
                let form = SignupForm {
                    name,
                    email,
                    phone,
                    password,
                    accepted_terms: accept_terms,
                };
                self.auth.signup(&form).await?;
            }
            Command::Logout => self.session.logout()?,
            Command::Status => {
                let summary = DashboardSummary::load(&self.persistence);
                println!("{}", summary.welcome);
                match &summary.session {
                    Some(session) => println!(
                        "Signed in as {} since {} {}",
                        session.identity,
                        format::format_date(&session.login_time),
                        format::format_time(&session.login_time)
                    ),
                    None => println!("Not signed in."),
                }
                if summary.booking.is_some() {
                    println!("Current booking:");
                    for (label, value) in summary.booking_lines() {
                        println!("  {}: {}", label, value);
                    }
                }
            }
            Command::ForgotPassword { email } => {
                self.auth.forgot_password(&email);
            }
        }
        Ok(())
    }

    /// 等待延遲中的導頁與表單重設，並輸出所有通知
    async fn finish(&self) {
        self.auth.settle().await;
        self.booking.settle().await;
        self.session.settle().await;

        for toast in self.toasts.history() {
            println!("[{}] {}", toast.title, toast.message);
        }
        if let Some(view) = self.navigator.current() {
            println!("➡️  {}", view.page());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting school-link CLI");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let config = cli.load_config().context("loading configuration")?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }

    let app = App::build(&config)?;
    let result = app.run(cli.command.clone()).await;
    app.finish().await;

    if let Err(e) = result {
        tracing::error!("❌ Command failed: {} (Severity: {:?})", e, e.severity());
        eprintln!("❌ {}", e.user_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 3,
            ErrorSeverity::Critical => 4,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}
