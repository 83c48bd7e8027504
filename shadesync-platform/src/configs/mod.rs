mod settings;

pub use settings::{Bridge, Coordinator, Logger, Settings};
