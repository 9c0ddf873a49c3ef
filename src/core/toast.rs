use crate::domain::model::Severity;
use crate::domain::ports::Notifier;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);
/// 淡出動畫時間，結束後才真正移除
pub const TOAST_EXIT_DURATION: Duration = Duration::from_millis(300);

/// 歷史紀錄只保留最近的筆數
pub const TOAST_HISTORY_LIMIT: usize = 100;

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Leaving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub title: &'static str,
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
    pub phase: ToastPhase,
}

#[derive(Debug, Default)]
struct ToastState {
    next_id: ToastId,
    active: Vec<Toast>,
    history: Vec<Toast>,
}

#[derive(Debug, Clone, Default)]
pub struct ToastCenter {
    state: Arc<Mutex<ToastState>>,
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, message: &str, severity: Severity, duration: Duration) -> ToastId {
        let id = {
            let Ok(mut state) = self.state.lock() else {
                tracing::error!("Toast state poisoned, dropping message: {}", message);
                return 0;
            };
            state.next_id += 1;
            let toast = Toast {
                id: state.next_id,
                title: severity.title(),
                message: message.to_string(),
                severity,
                duration,
                phase: ToastPhase::Visible,
            };
            state.history.push(toast.clone());
            if state.history.len() > TOAST_HISTORY_LIMIT {
                let overflow = state.history.len() - TOAST_HISTORY_LIMIT;
                state.history.drain(..overflow);
            }
            state.active.push(toast);
            state.next_id
        };

        match severity {
            Severity::Error => tracing::warn!("[toast] {}", message),
            _ => tracing::info!("[toast] {}", message),
        }

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let center = self.clone();
            handle.spawn(async move {
                tokio::time::sleep(duration).await;
                center.dismiss(id);
            });
        }

        id
    }

    /// 開始淡出；已在淡出或已移除時回傳 false
    pub fn dismiss(&self, id: ToastId) -> bool {
        {
            let Ok(mut state) = self.state.lock() else {
                return false;
            };
            match state.active.iter_mut().find(|t| t.id == id) {
                Some(toast) if toast.phase == ToastPhase::Visible => {
                    toast.phase = ToastPhase::Leaving;
                }
                _ => return false,
            }
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let center = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(TOAST_EXIT_DURATION).await;
                    center.remove(id);
                });
            }
            Err(_) => self.remove(id),
        }
        true
    }

    fn remove(&self, id: ToastId) {
        if let Ok(mut state) = self.state.lock() {
            state.active.retain(|t| t.id != id);
        }
    }

    pub fn active(&self) -> Vec<Toast> {
        self.state
            .lock()
            .map(|s| s.active.clone())
            .unwrap_or_default()
    }

    pub fn history(&self) -> Vec<Toast> {
        self.state
            .lock()
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.history()
            .into_iter()
            .map(|t| (t.severity, t.message))
            .collect()
    }

    pub fn last(&self) -> Option<Toast> {
        self.state.lock().ok().and_then(|s| s.history.last().cloned())
    }
}

impl Notifier for ToastCenter {
    fn notify(&self, message: &str, severity: Severity, duration: Duration) {
        self.show(message, severity, duration);
    }
}
