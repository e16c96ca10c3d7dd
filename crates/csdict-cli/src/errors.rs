//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("996 Too many command line options - Only -d is allowed")]
    TooManyOptions,
    #[error("997 Invalid command line option - Only -d is allowed")]
    InvalidOption,
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("998 Input error while reading commands, terminating")]
    ReadCommand(#[source] io::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}

impl AppError {
    /// Option errors are part of the interactive output and go to stdout.
    pub(crate) const fn reported_on_stdout(&self) -> bool {
        matches!(self, Self::TooManyOptions | Self::InvalidOption)
    }
}
