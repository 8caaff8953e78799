//! Host error type.
//!
//! Only window creation has a failure path that is reported upward; every other OS call made
//! by the host is best-effort and merely logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// The base window could not be registered or created.
    #[error("base window creation failed: {0}")]
    BaseWindow(String),

    /// The embedded view was constructed without a usable engine handle.
    #[error("embedded view has no engine")]
    EngineUnavailable,

    /// The embedded view was constructed without a native view handle.
    #[error("embedded view has no native view")]
    ViewUnavailable,

    /// The window title contains an interior NUL and cannot be passed to the OS.
    #[error("window title contains an interior NUL character")]
    InvalidTitle,

    #[cfg(windows)]
    #[error(transparent)]
    Win32(#[from] windows::core::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;
