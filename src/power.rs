//! Display / system sleep inhibition while the host window is alive.

use std::cell::Cell;
use tracing::debug;

pub trait PowerControl {
    /// Keep the display on and the system awake until `allow_sleep`.
    fn keep_awake(&self);
    /// Restore default power management.
    fn allow_sleep(&self);
}

/// Tracks whether sleep is currently inhibited so release is idempotent, including from `Drop`.
pub struct KeepAwake<P: PowerControl> {
    control: P,
    engaged: Cell<bool>,
}

impl<P: PowerControl> KeepAwake<P> {
    pub fn new(control: P) -> Self {
        Self {
            control,
            engaged: Cell::new(false),
        }
    }

    pub fn engage(&self) {
        if !self.engaged.replace(true) {
            self.control.keep_awake();
            debug!("display and system sleep inhibited");
        }
    }

    pub fn release(&self) {
        if self.engaged.replace(false) {
            self.control.allow_sleep();
            debug!("default power management restored");
        }
    }

    #[cfg(test)]
    pub fn is_engaged(&self) -> bool {
        self.engaged.get()
    }

    #[cfg(test)]
    pub fn control(&self) -> &P {
        &self.control
    }
}

impl<P: PowerControl> Drop for KeepAwake<P> {
    fn drop(&mut self) {
        self.release();
    }
}

/// `SetThreadExecutionState` backed control for the UI thread.
#[cfg(windows)]
pub struct SystemPower;

#[cfg(windows)]
impl PowerControl for SystemPower {
    fn keep_awake(&self) {
        use windows::Win32::System::Power::{
            ES_CONTINUOUS, ES_DISPLAY_REQUIRED, ES_SYSTEM_REQUIRED, SetThreadExecutionState,
        };
        let previous =
            unsafe { SetThreadExecutionState(ES_CONTINUOUS | ES_DISPLAY_REQUIRED | ES_SYSTEM_REQUIRED) };
        if previous.0 == 0 {
            tracing::warn!("SetThreadExecutionState rejected keep-awake request");
        }
    }

    fn allow_sleep(&self) {
        use windows::Win32::System::Power::{ES_CONTINUOUS, SetThreadExecutionState};
        unsafe {
            let _ = SetThreadExecutionState(ES_CONTINUOUS);
        }
    }
}
