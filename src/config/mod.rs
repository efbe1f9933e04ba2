pub mod settings;

pub use settings::{AppConfig, BackendConfig, CalculationConfig, ObserverConfig};
