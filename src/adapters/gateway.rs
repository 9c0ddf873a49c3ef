use crate::config::RemoteConfig;
use crate::domain::model::CallSite;
use crate::domain::ports::RemoteGateway;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// 模擬遠端服務：固定延遲後依呼叫來源的失敗率隨機成功或失敗
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    latency: Duration,
    auth_failure_rate: f64,
    booking_failure_rate: f64,
}

impl SimulatedGateway {
    pub fn new(latency: Duration, auth_failure_rate: f64, booking_failure_rate: f64) -> Self {
        Self {
            latency,
            auth_failure_rate: auth_failure_rate.clamp(0.0, 1.0),
            booking_failure_rate: booking_failure_rate.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(
            config.latency(),
            config.auth_failure_rate,
            config.booking_failure_rate,
        )
    }

    /// 永遠成功，延遲為零
    pub fn reliable() -> Self {
        Self::new(Duration::ZERO, 0.0, 0.0)
    }

    pub fn failure_rate(&self, site: CallSite) -> f64 {
        match site {
            CallSite::Auth => self.auth_failure_rate,
            CallSite::Booking => self.booking_failure_rate,
        }
    }
}

#[async_trait]
impl RemoteGateway for SimulatedGateway {
    async fn call(&self, site: CallSite) -> Result<()> {
        tracing::debug!("Simulated {} call ({:?})", site, self.latency);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        // random() 落在 [0, 1)，失敗率 1.0 必定失敗、0.0 必定成功
        if rand::random::<f64>() < self.failure_rate(site) {
            tracing::warn!("Simulated {} call failed", site);
            return Err(AppError::RemoteCallFailure {
                site: site.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_reliable_gateway_succeeds() {
        let gateway = SimulatedGateway::reliable();
        assert_ok!(gateway.call(CallSite::Auth).await);
        assert_ok!(gateway.call(CallSite::Booking).await);
    }

    #[tokio::test]
    async fn test_certain_failure_per_site() {
        let gateway = SimulatedGateway::new(Duration::ZERO, 1.0, 0.0);
        let err = assert_err!(gateway.call(CallSite::Auth).await);
        assert!(matches!(err, AppError::RemoteCallFailure { ref site } if site == "auth"));
        assert_ok!(gateway.call(CallSite::Booking).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let gateway = SimulatedGateway::new(Duration::from_millis(2000), 0.0, 0.0);
        let started = tokio::time::Instant::now();
        gateway.call(CallSite::Booking).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }

    #[test]
    fn test_rates_are_clamped() {
        let gateway = SimulatedGateway::new(Duration::ZERO, 3.0, -1.0);
        assert_eq!(gateway.failure_rate(CallSite::Auth), 1.0);
        assert_eq!(gateway.failure_rate(CallSite::Booking), 0.0);
    }
}
