#[cfg(feature = "hardware")]
pub mod gpio;

use thiserror::Error;

use crate::config::OutputConfig;
use crate::processing::triggers::OutputAction;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to set output line: {0}")]
    Pin(String),

    #[error("Failed to open output line: {0}")]
    Open(String),
}

/// Digital line raised while a spike is being held.
pub trait OutputSink: Send {
    fn assert(&mut self) -> Result<(), OutputError>;

    fn deassert(&mut self) -> Result<(), OutputError>;

    /// Applies the action a tick produced. `Hold` leaves the line alone.
    fn apply(&mut self, action: OutputAction) -> Result<(), OutputError> {
        match action {
            OutputAction::Assert => self.assert(),
            OutputAction::Deassert => self.deassert(),
            OutputAction::Hold => Ok(()),
        }
    }
}

/// Stand-in output line that only logs level changes.
#[derive(Debug, Default)]
pub struct ConsoleOutput {
    high: bool,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl OutputSink for ConsoleOutput {
    fn assert(&mut self) -> Result<(), OutputError> {
        if !self.high {
            tracing::info!("Output line HIGH");
        }
        self.high = true;
        Ok(())
    }

    fn deassert(&mut self) -> Result<(), OutputError> {
        if self.high {
            tracing::info!("Output line LOW");
        }
        self.high = false;
        Ok(())
    }
}

pub fn create_output(config: &OutputConfig) -> Result<Box<dyn OutputSink>, OutputError> {
    match config {
        OutputConfig::Console => Ok(Box::new(ConsoleOutput::new())),
        #[cfg(feature = "hardware")]
        OutputConfig::Gpio { pin } => Ok(Box::new(gpio::GpioOutput::open(*pin)?)),
        #[cfg(not(feature = "hardware"))]
        OutputConfig::Gpio { .. } => Err(OutputError::Open(
            "GPIO output requires the `hardware` feature".to_string(),
        )),
    }
}
