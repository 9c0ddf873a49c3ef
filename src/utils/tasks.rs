use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// 延遲執行的背景工作（導頁、重設表單等），可在結束前等待全部完成
#[derive(Clone, Default)]
pub struct PendingTasks {
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer<F>(&self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
    }

    pub fn spawn<Fut>(&self, fut: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, deferred task dropped");
            return;
        };
        let handle = runtime.spawn(fut);
        if let Ok(mut handles) = self.handles.lock() {
            handles.retain(|h| !h.is_finished());
            handles.push(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.handles
            .lock()
            .map(|h| h.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 等待目前以及等待期間新增的所有工作
    pub async fn settle(&self) {
        loop {
            let next = match self.handles.lock() {
                Ok(mut handles) => handles.pop(),
                Err(_) => None,
            };
            match next {
                Some(handle) => {
                    if let Err(e) = handle.await {
                        tracing::warn!("Deferred task did not complete: {}", e);
                    }
                }
                None => break,
            }
        }
    }
}

/// 送出按鈕的停用狀態：同一時間只允許一個進行中的請求
#[derive(Clone, Default, Debug)]
pub struct SubmitGuard {
    busy: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct SubmitPermit {
    busy: Arc<AtomicBool>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<SubmitPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_disabled(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
