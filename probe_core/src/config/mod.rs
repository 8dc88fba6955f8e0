pub mod settings;

pub use settings::{AppConfig, CorsConfig, LogFormat, LoggingConfig, ProbeConfig, ServerConfig};
