use crate::domain::model::{Booking, Session, UserProfile};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub const SESSION_KEY: &str = "userSession";
pub const PROFILE_KEY: &str = "userData";
pub const BOOKING_KEY: &str = "currentBooking";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Durable,
    Ephemeral,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Durable => f.write_str("durable"),
            StoreKind::Ephemeral => f.write_str("ephemeral"),
        }
    }
}

/// 讀取失敗一律視為 None；寫入失敗只記錄，strict 模式才回傳錯誤
#[derive(Clone)]
pub struct PersistenceAdapter {
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
    strict: bool,
}

impl PersistenceAdapter {
    pub fn new(durable: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn KeyValueStore>) -> Self {
        Self {
            durable,
            ephemeral,
            strict: false,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn store(&self, kind: StoreKind) -> &dyn KeyValueStore {
        match kind {
            StoreKind::Durable => self.durable.as_ref(),
            StoreKind::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    fn read<T: DeserializeOwned>(&self, kind: StoreKind, key: &str) -> Option<T> {
        let raw = match self.store(kind).get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!("Error reading '{}' from {} storage: {}", key, kind, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Error decoding '{}' from {} storage: {}", key, kind, e);
                None
            }
        }
    }

    fn write<T: Serialize>(&self, kind: StoreKind, key: &str, value: &T) -> Result<()> {
        let outcome = serde_json::to_string(value)
            .map_err(AppError::from)
            .and_then(|json| self.store(kind).set(key, &json));
        self.contain(kind, key, "saving", outcome)
    }

    fn delete(&self, kind: StoreKind, key: &str) -> Result<()> {
        let outcome = self.store(kind).remove(key);
        self.contain(kind, key, "removing", outcome)
    }

    fn contain(&self, kind: StoreKind, key: &str, action: &str, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!("Error {} '{}' in {} storage: {}", action, key, kind, e);
                if self.strict {
                    Err(AppError::persistence(key, e))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// 先查持久儲存，再查本次瀏覽階段
    pub fn load_session(&self) -> Option<Session> {
        self.read(StoreKind::Durable, SESSION_KEY)
            .or_else(|| self.read(StoreKind::Ephemeral, SESSION_KEY))
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        let kind = if session.remember {
            StoreKind::Durable
        } else {
            StoreKind::Ephemeral
        };
        self.write(kind, SESSION_KEY, session)
    }

    pub fn clear_session(&self) -> Result<()> {
        let durable = self.delete(StoreKind::Durable, SESSION_KEY);
        let ephemeral = self.delete(StoreKind::Ephemeral, SESSION_KEY);
        durable.and(ephemeral)
    }

    pub fn load_profile(&self) -> Option<UserProfile> {
        self.read(StoreKind::Durable, PROFILE_KEY)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.write(StoreKind::Durable, PROFILE_KEY, profile)
    }

    pub fn clear_profile(&self) -> Result<()> {
        self.delete(StoreKind::Durable, PROFILE_KEY)
    }

    pub fn load_booking(&self) -> Option<Booking> {
        self.read(StoreKind::Durable, BOOKING_KEY)
    }

    pub fn save_booking(&self, booking: &Booking) -> Result<()> {
        self.write(StoreKind::Durable, BOOKING_KEY, booking)
    }

    pub fn clear_booking(&self) -> Result<()> {
        self.delete(StoreKind::Durable, BOOKING_KEY)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::domain::model::BookingStatus;
    use chrono::Utc;

    /// 所有寫入都失敗的儲存
    pub(crate) struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(AppError::persistence(key, "quota exceeded"))
        }

        fn remove(&self, key: &str) -> Result<()> {
            Err(AppError::persistence(key, "quota exceeded"))
        }
    }

    fn adapter() -> (PersistenceAdapter, MemoryStore, MemoryStore) {
        let durable = MemoryStore::new();
        let ephemeral = MemoryStore::new();
        let adapter =
            PersistenceAdapter::new(Arc::new(durable.clone()), Arc::new(ephemeral.clone()));
        (adapter, durable, ephemeral)
    }

    fn session(remember: bool) -> Session {
        Session {
            identity: "parent@example.com".to_string(),
            login_time: Utc::now(),
            remember,
        }
    }

    #[test]
    fn test_remembered_session_is_durable() {
        let (adapter, durable, ephemeral) = adapter();
        adapter.save_session(&session(true)).unwrap();

        assert!(durable.get(SESSION_KEY).unwrap().is_some());
        assert!(ephemeral.get(SESSION_KEY).unwrap().is_none());
        assert_eq!(adapter.load_session().unwrap().identity, "parent@example.com");
    }

    #[test]
    fn test_unremembered_session_is_ephemeral() {
        let (adapter, durable, ephemeral) = adapter();
        adapter.save_session(&session(false)).unwrap();

        assert!(durable.get(SESSION_KEY).unwrap().is_none());
        assert!(ephemeral.get(SESSION_KEY).unwrap().is_some());
        assert!(adapter.load_session().is_some());

        adapter.clear_session().unwrap();
        assert!(adapter.load_session().is_none());
    }

    #[test]
    fn test_booking_json_layout() {
        let (adapter, durable, _) = adapter();
        let booking = Booking {
            zone_name: "Model Town".to_string(),
            plan_name: "Standard".to_string(),
            price: 1500,
            created_at: Utc::now(),
            status: BookingStatus::Confirmed,
        };
        adapter.save_booking(&booking).unwrap();

        let raw = durable.get(BOOKING_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["zoneName"], "Model Town");
        assert_eq!(json["planName"], "Standard");
        assert_eq!(json["price"], 1500);
        assert_eq!(json["status"], "confirmed");
        assert!(json["createdAt"].is_string());

        assert_eq!(adapter.load_booking(), Some(booking));
    }

    #[test]
    fn test_corrupt_record_reads_as_none() {
        let (adapter, durable, _) = adapter();
        durable.set(PROFILE_KEY, "{not json").unwrap();
        assert!(adapter.load_profile().is_none());
    }

    #[test]
    fn test_write_failure_is_swallowed_unless_strict() {
        let lenient = PersistenceAdapter::new(Arc::new(FailingStore), Arc::new(FailingStore));
        assert!(lenient.save_session(&session(true)).is_ok());
        assert!(lenient.clear_session().is_ok());

        let strict = lenient.clone().with_strict(true);
        let err = strict.save_session(&session(true)).unwrap_err();
        assert!(matches!(err, AppError::Persistence { ref key, .. } if key == SESSION_KEY));
    }
}
