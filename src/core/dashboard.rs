use crate::core::persistence::PersistenceAdapter;
use crate::domain::model::{Booking, Session, UserProfile};
use crate::utils::format;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub welcome: String,
    pub session: Option<Session>,
    pub profile: Option<UserProfile>,
    pub booking: Option<Booking>,
}

impl DashboardSummary {
    pub fn load(persistence: &PersistenceAdapter) -> Self {
        let profile = persistence.load_profile();
        let welcome = match profile.as_ref().map(|p| p.name.as_str()) {
            Some(name) if !name.is_empty() => format!("Welcome back, {}!", name),
            _ => "Welcome back!".to_string(),
        };

        Self {
            welcome,
            session: persistence.load_session(),
            profile,
            booking: persistence.load_booking(),
        }
    }

    /// 目前預約的摘要（區域、方案、月費、狀態）
    pub fn booking_lines(&self) -> Vec<(&'static str, String)> {
        match &self.booking {
            Some(booking) => vec![
                ("Area", booking.zone_name.clone()),
                ("Plan", booking.plan_name.clone()),
                ("Monthly Fee", format::format_monthly(i64::from(booking.price))),
                ("Status", booking.status.to_string()),
                ("Booked On", format::format_date(&booking.created_at)),
            ],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::domain::model::BookingStatus;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn test_summary_for_new_visitor() {
        let persistence =
            PersistenceAdapter::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
        let summary = DashboardSummary::load(&persistence);
        assert_eq!(summary.welcome, "Welcome back!");
        assert!(summary.booking.is_none());
        assert!(summary.booking_lines().is_empty());
    }

    #[test]
    fn test_summary_with_profile_and_booking() {
        let persistence =
            PersistenceAdapter::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
        persistence
            .save_profile(&UserProfile {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
                signup_time: Utc::now(),
            })
            .unwrap();
        persistence
            .save_booking(&Booking {
                zone_name: "Sector 14".to_string(),
                plan_name: "Premium".to_string(),
                price: 3000,
                created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
                status: BookingStatus::Confirmed,
            })
            .unwrap();

        let summary = DashboardSummary::load(&persistence);
        assert_eq!(summary.welcome, "Welcome back, Asha!");
        let lines = summary.booking_lines();
        assert_eq!(lines[2], ("Monthly Fee", "₹3000/month".to_string()));
        assert_eq!(lines[3], ("Status", "confirmed".to_string()));
        assert_eq!(lines[4], ("Booked On", "1 June 2024".to_string()));
    }
}
