use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 服務區域，基本月費以整數盧比計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub base_price: u32,
    pub distance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub multiplier: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub zone: Zone,
    pub plan: Plan,
    pub price: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub zone_name: String,
    pub plan_name: String,
    pub price: u32,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    pub fn confirmed(quote: &Quote, created_at: DateTime<Utc>) -> Self {
        Self {
            zone_name: quote.zone.name.clone(),
            plan_name: quote.plan.name.clone(),
            price: quote.price,
            created_at,
            status: BookingStatus::Confirmed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// email 或電話
    pub identity: String,
    pub login_time: DateTime<Utc>,
    pub remember: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub signup_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    pub fn title(&self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Error => "Error",
            Severity::Info => "Info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Login,
    Dashboard,
    About,
}

impl View {
    pub fn page(&self) -> &'static str {
        match self {
            View::Home => "index.html",
            View::Login => "login.html",
            View::Dashboard => "dashboard.html",
            View::About => "about.html",
        }
    }
}

/// 遠端呼叫的來源，各自有不同的失敗率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallSite {
    Auth,
    Booking,
}

impl CallSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallSite::Auth => "auth",
            CallSite::Booking => "booking",
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 表單送出結果：按鈕停用期間的重複送出會得到 `Busy`
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    Completed(T),
    Busy,
}

impl<T> SubmitOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            SubmitOutcome::Completed(value) => Some(value),
            SubmitOutcome::Busy => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, SubmitOutcome::Busy)
    }
}
