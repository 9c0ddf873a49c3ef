use crate::domain::model::View;
use crate::domain::ports::Navigator;
use std::sync::{Arc, Mutex};

pub const NAVIGATION_HISTORY_LIMIT: usize = 50;

/// 記錄導頁歷史（保留最近的部分）；CLI 沒有真正的頁面可切換
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    history: Arc<Mutex<Vec<View>>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<View> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn current(&self) -> Option<View> {
        self.history.lock().ok().and_then(|h| h.last().copied())
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, view: View) {
        tracing::info!("Navigating to {}", view.page());
        if let Ok(mut history) = self.history.lock() {
            history.push(view);
            if history.len() > NAVIGATION_HISTORY_LIMIT {
                let overflow = history.len() - NAVIGATION_HISTORY_LIMIT;
                history.drain(..overflow);
            }
        }
    }
}
