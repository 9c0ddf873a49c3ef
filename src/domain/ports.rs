use crate::domain::model::{CallSite, Severity, View};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 字串鍵值儲存（對應瀏覽器的 localStorage / sessionStorage）
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn call(&self, site: CallSite) -> Result<()>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity, duration: Duration);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, view: View);
}
