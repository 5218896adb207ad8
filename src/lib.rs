pub mod config;
pub mod display;
pub mod local;
pub mod outputs;
pub mod processing;
pub mod scheduler;
pub mod sensors;
#[cfg(feature = "visualization")]
pub mod visualization;

pub use config::{load_config, save_config, Config};
pub use processing::signal_processor::{SignalProcessor, SignalProcessorConfig};
pub use processing::Sample;
