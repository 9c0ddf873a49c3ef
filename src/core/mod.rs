pub mod animator;
pub mod auth;
pub mod booking;
pub mod counter;
pub mod dashboard;
pub mod home;
pub mod persistence;
pub mod pricing;
pub mod session;
pub mod timeline;
pub mod toast;
pub mod visibility;

pub use crate::domain::model::{
    Booking, BookingStatus, CallSite, Plan, Quote, Session, Severity, SubmitOutcome, UserProfile,
    View, Zone,
};
pub use crate::domain::ports::{KeyValueStore, Navigator, Notifier, RemoteGateway};
pub use crate::utils::error::Result;
