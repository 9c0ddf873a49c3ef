use crate::config::TimingConfig;
use crate::core::persistence::PersistenceAdapter;
use crate::domain::model::{Session, Severity, UserProfile, View};
use crate::domain::ports::{Navigator, Notifier};
use crate::utils::error::Result;
use crate::utils::tasks::PendingTasks;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// 會重設閒置計時器的使用者輸入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    MouseDown,
    MouseMove,
    KeyPress,
    Scroll,
    TouchStart,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::MouseDown,
        ActivityKind::MouseMove,
        ActivityKind::KeyPress,
        ActivityKind::Scroll,
        ActivityKind::TouchStart,
    ];

    pub fn event_name(&self) -> &'static str {
        match self {
            ActivityKind::MouseDown => "mousedown",
            ActivityKind::MouseMove => "mousemove",
            ActivityKind::KeyPress => "keypress",
            ActivityKind::Scroll => "scroll",
            ActivityKind::TouchStart => "touchstart",
        }
    }
}

/// 登入狀態與閒置計時器；重設時先取消舊計時器，同時最多一個
#[derive(Clone)]
pub struct SessionManager {
    persistence: PersistenceAdapter,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    timing: TimingConfig,
    timer: Arc<Mutex<Option<JoinHandle<()>>>>,
    pending: PendingTasks,
}

impl SessionManager {
    pub fn new(
        persistence: PersistenceAdapter,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            persistence,
            notifier,
            navigator,
            timing,
            timer: Arc::new(Mutex::new(None)),
            pending: PendingTasks::new(),
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.persistence.load_session()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.persistence.load_profile()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// 頁面載入時啟動計時
    pub fn start(&self) {
        self.reset_timer();
    }

    pub fn record_activity(&self, kind: ActivityKind) {
        tracing::trace!("Activity: {}", kind.event_name());
        self.reset_timer();
    }

    pub fn stop(&self) {
        let mut slot = self.timer.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    fn reset_timer(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, inactivity timer not armed");
            return;
        };

        let idle = self.timing.idle_timeout();
        let manager = self.clone();
        let mut slot = self.timer.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(runtime.spawn(async move {
            tokio::time::sleep(idle).await;
            manager.expire();
        }));
    }

    fn expire(&self) {
        if !self.is_authenticated() {
            tracing::debug!("Inactivity timeout with no session");
            return;
        }

        tracing::info!(
            "Session expired after {:?} of inactivity",
            self.timing.idle_timeout()
        );
        self.notify("Session expired due to inactivity", Severity::Info);
        if let Err(e) = self.logout() {
            tracing::error!("Forced logout could not clear storage: {}", e);
        }
    }

    /// 清除登入資料並導回登入頁
    pub fn logout(&self) -> Result<()> {
        let session = self.persistence.clear_session();
        let profile = self.persistence.clear_profile();

        self.notify("Logged out successfully", Severity::Info);

        let navigator = Arc::clone(&self.navigator);
        self.pending
            .defer(self.timing.logout_redirect_delay(), move || {
                navigator.navigate(View::Login)
            });

        session.and(profile)
    }

    pub async fn settle(&self) {
        self.pending.settle().await;
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifier
            .notify(message, severity, self.timing.toast_duration());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::navigation::HistoryNavigator;
    use crate::adapters::storage::MemoryStore;
    use crate::core::toast::ToastCenter;
    use chrono::Utc;
    use std::time::Duration;

    const IDLE: Duration = Duration::from_secs(30 * 60);

    fn manager() -> (SessionManager, ToastCenter, HistoryNavigator) {
        let persistence = PersistenceAdapter::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        );
        let toasts = ToastCenter::new();
        let nav = HistoryNavigator::new();
        let manager = SessionManager::new(
            persistence,
            Arc::new(toasts.clone()),
            Arc::new(nav.clone()),
            TimingConfig::default(),
        );
        (manager, toasts, nav)
    }

    fn sign_in(manager: &SessionManager) {
        manager
            .persistence
            .save_session(&Session {
                identity: "9876543210".to_string(),
                login_time: Utc::now(),
                remember: false,
            })
            .unwrap();
    }

    fn expired_count(toasts: &ToastCenter) -> usize {
        toasts
            .history()
            .iter()
            .filter(|t| t.message == "Session expired due to inactivity")
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_window_forces_logout() {
        let (manager, toasts, nav) = manager();
        sign_in(&manager);
        manager.start();
        assert!(manager.is_armed());

        tokio::time::sleep(IDLE - Duration::from_millis(1)).await;
        assert!(manager.is_authenticated());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!manager.is_authenticated());
        assert_eq!(expired_count(&toasts), 1);
        assert_eq!(toasts.last().unwrap().message, "Logged out successfully");

        manager.settle().await;
        assert_eq!(nav.current(), Some(View::Login));
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_postpones_by_full_window() {
        let (manager, toasts, _) = manager();
        sign_in(&manager);
        manager.start();

        tokio::time::sleep(Duration::from_secs(29 * 60)).await;
        manager.record_activity(ActivityKind::Scroll);

        // 29 minutes after the reset: still signed in even though 58 have passed
        tokio::time::sleep(Duration::from_secs(29 * 60)).await;
        assert!(manager.is_authenticated());

        tokio::time::sleep(Duration::from_secs(60) - Duration::from_millis(1)).await;
        assert!(manager.is_authenticated());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!manager.is_authenticated());
        assert_eq!(expired_count(&toasts), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resets_never_stack_timers() {
        let (manager, toasts, _) = manager();
        sign_in(&manager);

        for kind in ActivityKind::ALL {
            manager.record_activity(kind);
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        tokio::time::sleep(IDLE * 2).await;
        assert_eq!(expired_count(&toasts), 1);
        assert!(!manager.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_without_session_is_silent() {
        let (manager, toasts, nav) = manager();
        manager.start();

        tokio::time::sleep(IDLE + Duration::from_secs(1)).await;
        assert!(toasts.history().is_empty());
        manager.settle().await;
        assert!(nav.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_disarms_timer() {
        let (manager, toasts, _) = manager();
        sign_in(&manager);
        manager.start();
        manager.stop();
        assert!(!manager.is_armed());

        tokio::time::sleep(IDLE * 2).await;
        assert!(manager.is_authenticated());
        assert_eq!(expired_count(&toasts), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_clears_session_and_profile() {
        let (manager, toasts, nav) = manager();
        sign_in(&manager);
        manager
            .persistence
            .save_profile(&UserProfile {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
                signup_time: Utc::now(),
            })
            .unwrap();

        manager.logout().unwrap();
        assert!(!manager.is_authenticated());
        assert!(manager.profile().is_none());
        assert_eq!(toasts.last().unwrap().severity, Severity::Info);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(nav.history().is_empty());
        manager.settle().await;
        assert_eq!(nav.history(), vec![View::Login]);
    }
}
