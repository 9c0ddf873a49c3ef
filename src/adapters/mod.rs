// Adapters layer: concrete implementations of the domain ports (storage, remote calls, navigation).

pub mod gateway;
pub mod http;
pub mod navigation;
pub mod storage;

pub use gateway::SimulatedGateway;
pub use http::HttpGateway;
pub use navigation::HistoryNavigator;
pub use storage::{FileStore, MemoryStore};
