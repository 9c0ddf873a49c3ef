use crate::domain::model::{Plan, Zone};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub redirect_delay_ms: u64,
    pub booking_reset_delay_ms: u64,
    pub logout_redirect_delay_ms: u64,
    pub toast_duration_ms: u64,
    pub idle_timeout_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: 1500,
            booking_reset_delay_ms: 2000,
            logout_redirect_delay_ms: 1000,
            toast_duration_ms: 3000,
            idle_timeout_secs: 30 * 60,
        }
    }
}

impl TimingConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn booking_reset_delay(&self) -> Duration {
        Duration::from_millis(self.booking_reset_delay_ms)
    }

    pub fn logout_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.logout_redirect_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteMode {
    Simulated,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub mode: RemoteMode,
    pub latency_ms: u64,
    pub auth_failure_rate: f64,
    pub booking_failure_rate: f64,
    pub endpoint: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            mode: RemoteMode::Simulated,
            latency_ms: 2000,
            auth_failure_rate: 0.1,
            booking_failure_rate: 0.05,
            endpoint: None,
            timeout_seconds: 30,
        }
    }
}

impl RemoteConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// 寫入失敗時是否讓流程失敗（預設沿用寬鬆行為：記錄後忽略）
    pub strict: bool,
    pub data_dir: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            strict: false,
            data_dir: PathBuf::from("./.school-link"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub zones: Vec<Zone>,
    pub plans: Vec<Plan>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let zone = |id: &str, name: &str, base_price: u32, distance: &str| Zone {
            id: id.to_string(),
            name: name.to_string(),
            base_price,
            distance: distance.to_string(),
        };
        let plan = |id: &str, name: &str, description: &str, multiplier: f64, features: &[&str]| {
            Plan {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                multiplier,
                features: features.iter().map(|f| f.to_string()).collect(),
            }
        };

        Self {
            zones: vec![
                zone("1", "Model Town", 1000, "0-5 km"),
                zone("2", "Civil Lines", 1200, "5-8 km"),
                zone("3", "Sector 14", 1500, "8-12 km"),
                zone("4", "Outer Ring Road", 2000, "12-20 km"),
            ],
            plans: vec![
                plan(
                    "1",
                    "Basic",
                    "One way",
                    1.0,
                    &["Morning or Evening", "5 days/week", "Basic tracking"],
                ),
                plan(
                    "2",
                    "Standard",
                    "Both ways",
                    1.5,
                    &["Morning & Evening", "5 days/week", "Live tracking", "SMS alerts"],
                ),
                plan(
                    "3",
                    "Premium",
                    "Flexible timing",
                    2.0,
                    &[
                        "Flexible timing",
                        "6 days/week",
                        "Live tracking",
                        "SMS alerts",
                        "Priority support",
                    ],
                ),
            ],
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AppError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REMOTE_ENDPOINT})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range(
            "remote.auth_failure_rate",
            self.remote.auth_failure_rate,
            0.0,
            1.0,
        )?;
        validation::validate_range(
            "remote.booking_failure_rate",
            self.remote.booking_failure_rate,
            0.0,
            1.0,
        )?;

        if self.remote.mode == RemoteMode::Http {
            let endpoint = self.remote.endpoint.as_deref().ok_or_else(|| AppError::Config {
                message: "remote.endpoint is required when remote.mode = \"http\"".to_string(),
            })?;
            validation::validate_url("remote.endpoint", endpoint)?;
        }

        if self.timing.idle_timeout_secs == 0 {
            return Err(AppError::InvalidConfigValue {
                field: "timing.idle_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "Idle timeout must be positive".to_string(),
            });
        }

        validation::validate_unique_ids(
            "catalog.zones",
            self.catalog.zones.iter().map(|z| z.id.as_str()),
        )?;
        validation::validate_unique_ids(
            "catalog.plans",
            self.catalog.plans.iter().map(|p| p.id.as_str()),
        )?;

        for zone in &self.catalog.zones {
            validation::validate_non_empty_string("catalog.zones.id", &zone.id)?;
            validation::validate_non_empty_string("catalog.zones.name", &zone.name)?;
        }

        for plan in &self.catalog.plans {
            validation::validate_non_empty_string("catalog.plans.id", &plan.id)?;
            if !plan.multiplier.is_finite() || plan.multiplier <= 0.0 {
                return Err(AppError::InvalidConfigValue {
                    field: "catalog.plans.multiplier".to_string(),
                    value: plan.multiplier.to_string(),
                    reason: "Multiplier must be a positive number".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = AppConfig::default();
        assert_eq!(config.timing.redirect_delay(), Duration::from_millis(1500));
        assert_eq!(config.timing.idle_timeout(), Duration::from_secs(1800));
        assert_eq!(config.remote.auth_failure_rate, 0.1);
        assert_eq!(config.remote.booking_failure_rate, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[timing]
redirect_delay_ms = 10

[remote]
latency_ms = 0
auth_failure_rate = 0.0

[[catalog.zones]]
id = "north"
name = "North Campus"
base_price = 1000
distance = "0-5 km"

[[catalog.plans]]
id = "std"
name = "Standard"
description = "Both ways"
multiplier = 1.5
features = ["Live tracking"]
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.timing.redirect_delay_ms, 10);
        assert_eq!(config.timing.booking_reset_delay_ms, 2000);
        assert_eq!(config.remote.booking_failure_rate, 0.05);
        assert_eq!(config.catalog.zones.len(), 1);
        assert_eq!(config.catalog.plans[0].features, vec!["Live tracking"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SCHOOL_LINK_TEST_ENDPOINT", "https://api.school-link.test");

        let toml_content = r#"
[remote]
mode = "http"
endpoint = "${SCHOOL_LINK_TEST_ENDPOINT}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.remote.endpoint.as_deref(),
            Some("https://api.school-link.test")
        );
        assert!(config.validate().is_ok());

        std::env::remove_var("SCHOOL_LINK_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.remote.auth_failure_rate = 1.2;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.remote.mode = RemoteMode::Http;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.catalog.plans[0].multiplier = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        let duplicate = config.catalog.zones[0].clone();
        config.catalog.zones.push(duplicate);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[timing\nredirect").unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
