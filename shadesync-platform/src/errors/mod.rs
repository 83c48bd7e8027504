mod config;

pub use config::ConfigError;
pub use shadesync_api::transport::BridgeError;
