pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;
pub use config::AppConfig;

pub use adapters::{FileStore, HistoryNavigator, HttpGateway, MemoryStore, SimulatedGateway};
pub use core::{
    animator::{AnimationProfile, Animator},
    auth::{AuthFlow, LoginForm, SignupForm},
    booking::BookingEngine,
    counter::CounterAnimation,
    dashboard::DashboardSummary,
    home::{book_now, learn_more, HomeAction},
    persistence::PersistenceAdapter,
    pricing::{compute_quote, Catalog, PricingCalculator},
    session::{ActivityKind, SessionManager},
    toast::ToastCenter,
};
pub use utils::error::{AppError, Result, ValidationError};
