use crate::config::TimingConfig;
use crate::core::persistence::PersistenceAdapter;
use crate::core::pricing::{Catalog, PricingCalculator, PricingView, Selection};
use crate::domain::model::{Booking, CallSite, Quote, Severity, SubmitOutcome};
use crate::domain::ports::{Notifier, RemoteGateway};
use crate::utils::error::{AppError, Result};
use crate::utils::tasks::{PendingTasks, SubmitGuard};
use chrono::Utc;
use std::sync::{Arc, Mutex};

/// 儀表板的預約計算器
pub struct BookingEngine {
    calculator: Arc<Mutex<PricingCalculator>>,
    persistence: PersistenceAdapter,
    gateway: Arc<dyn RemoteGateway>,
    notifier: Arc<dyn Notifier>,
    timing: TimingConfig,
    guard: SubmitGuard,
    pending: PendingTasks,
}

impl BookingEngine {
    pub fn new(
        catalog: Catalog,
        persistence: PersistenceAdapter,
        gateway: Arc<dyn RemoteGateway>,
        notifier: Arc<dyn Notifier>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            calculator: Arc::new(Mutex::new(PricingCalculator::new(catalog))),
            persistence,
            gateway,
            notifier,
            timing,
            guard: SubmitGuard::new(),
            pending: PendingTasks::new(),
        }
    }

    fn with_calculator<R>(&self, f: impl FnOnce(&mut PricingCalculator) -> R) -> R {
        let mut calculator = self
            .calculator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut calculator)
    }

    pub fn select_zone(&self, id: Option<&str>) -> Result<PricingView> {
        let view = self.with_calculator(|c| c.select_zone(id))?;
        tracing::debug!("Zone selection changed: {:?}", id);
        Ok(view)
    }

    pub fn select_plan(&self, id: Option<&str>) -> Result<PricingView> {
        let view = self.with_calculator(|c| c.select_plan(id))?;
        tracing::debug!("Plan selection changed: {:?}", id);
        Ok(view)
    }

    pub fn view(&self) -> PricingView {
        self.with_calculator(|c| c.render())
    }

    pub fn quote(&self) -> Option<Quote> {
        self.with_calculator(|c| c.quote())
    }

    pub fn selection(&self) -> Selection {
        self.with_calculator(|c| c.selection().clone())
    }

    pub fn catalog(&self) -> Catalog {
        self.with_calculator(|c| c.catalog().clone())
    }

    /// 預約按鈕是否處於停用（請求進行中）
    pub fn is_submitting(&self) -> bool {
        self.guard.is_disabled()
    }

    pub async fn commit_booking(&self) -> Result<SubmitOutcome<Booking>> {
        let Some(_permit) = self.guard.try_acquire() else {
            tracing::debug!("Booking already in flight, ignoring submit");
            return Ok(SubmitOutcome::Busy);
        };

        let Some(quote) = self.quote() else {
            self.notify(&AppError::InvalidSelection.to_string(), Severity::Error);
            return Err(AppError::InvalidSelection);
        };

        tracing::info!(
            "Booking {} / {} at {}",
            quote.zone.name,
            quote.plan.name,
            quote.price
        );

        if let Err(e) = self.gateway.call(CallSite::Booking).await {
            tracing::warn!("Booking call failed: {}", e);
            self.notify("Booking failed. Please try again.", Severity::Error);
            return Err(AppError::RemoteCallFailure {
                site: CallSite::Booking.to_string(),
            });
        }

        let booking = Booking::confirmed(&quote, Utc::now());
        if let Err(e) = self.persistence.save_booking(&booking) {
            self.notify(&e.user_message(), Severity::Error);
            return Err(e);
        }

        self.notify(
            &format!(
                "Booking Successful! Your transport service for {} has been booked.",
                booking.zone_name
            ),
            Severity::Success,
        );

        // 顯示成功訊息一段時間後清空表單
        let calculator = Arc::clone(&self.calculator);
        self.pending.defer(self.timing.booking_reset_delay(), move || {
            let mut calculator = calculator
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            calculator.reset();
            tracing::debug!("Booking form reset");
        });

        Ok(SubmitOutcome::Completed(booking))
    }

    /// 等待延遲中的表單重設
    pub async fn settle(&self) {
        self.pending.settle().await;
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifier
            .notify(message, severity, self.timing.toast_duration());
    }
}
