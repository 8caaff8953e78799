//! Window message representation passed between the OS layer, the embedded view and the
//! chrome controller.
//!
//! Message ids are the stable Win32 values. They are spelled out here (rather than taken from
//! the `windows` crate) so the routing logic compiles and tests on every platform; the Win32
//! layer checks them against the bindings in its own tests.

// Window messages (subset routed by the host).
pub const WM_DESTROY: u32 = 0x0002;
pub const WM_SIZE: u32 = 0x0005;
pub const WM_ACTIVATE: u32 = 0x0006;
pub const WM_GETMINMAXINFO: u32 = 0x0024;
pub const WM_NCDESTROY: u32 = 0x0082;
pub const WM_NCCALCSIZE: u32 = 0x0083;
pub const WM_NCHITTEST: u32 = 0x0084;
pub const WM_NCLBUTTONDOWN: u32 = 0x00A1;
pub const WM_SYSCOMMAND: u32 = 0x0112;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_CAPTURECHANGED: u32 = 0x0215;
pub const WM_DPICHANGED: u32 = 0x02E0;

// Hit-test zones reported from WM_NCHITTEST.
pub const HTCAPTION: isize = 2;
pub const HTMAXBUTTON: isize = 9;

// System command ids (low four bits of wparam are reserved and must be masked off).
pub const SC_MINIMIZE: usize = 0xF020;
pub const SC_MAXIMIZE: usize = 0xF030;
pub const SC_RESTORE: usize = 0xF120;
const SC_MASK: usize = 0xFFF0;

/// A window message as delivered to the window procedure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawMessage {
    pub id: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    pub const fn new(id: u32, wparam: usize, lparam: isize) -> Self {
        Self { id, wparam, lparam }
    }

    /// System command carried by a WM_SYSCOMMAND message, with reserved bits cleared.
    pub const fn system_command(&self) -> usize {
        self.wparam & SC_MASK
    }
}

/// Outcome of one handler stage.
///
/// `NotHandled` lets the next stage (and finally the default window procedure) see the
/// message; `Consumed` stops routing and returns the value to the OS.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Handled {
    Consumed(isize),
    NotHandled,
}

impl Handled {
    #[cfg(test)]
    pub fn is_consumed(&self) -> bool {
        matches!(self, Handled::Consumed(_))
    }

    /// Continue routing with `next` only when this stage declined the message.
    pub fn or_else(self, next: impl FnOnce() -> Handled) -> Handled {
        match self {
            Handled::Consumed(result) => Handled::Consumed(result),
            Handled::NotHandled => next(),
        }
    }
}

/// Human readable message name for trace logging.
pub fn message_name(id: u32) -> &'static str {
    match id {
        WM_DESTROY => "WM_DESTROY",
        WM_SIZE => "WM_SIZE",
        WM_ACTIVATE => "WM_ACTIVATE",
        WM_GETMINMAXINFO => "WM_GETMINMAXINFO",
        WM_NCDESTROY => "WM_NCDESTROY",
        WM_NCCALCSIZE => "WM_NCCALCSIZE",
        WM_NCHITTEST => "WM_NCHITTEST",
        WM_NCLBUTTONDOWN => "WM_NCLBUTTONDOWN",
        WM_SYSCOMMAND => "WM_SYSCOMMAND",
        WM_MOUSEMOVE => "WM_MOUSEMOVE",
        WM_LBUTTONUP => "WM_LBUTTONUP",
        WM_CAPTURECHANGED => "WM_CAPTURECHANGED",
        WM_DPICHANGED => "WM_DPICHANGED",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_command_masks_reserved_bits() {
        // Double-clicking the caption sends SC_MAXIMIZE | 2.
        let msg = RawMessage::new(WM_SYSCOMMAND, SC_MAXIMIZE | 0x2, 0);
        assert_eq!(msg.system_command(), SC_MAXIMIZE);
    }

    #[test]
    fn or_else_short_circuits_on_consumed() {
        let mut called = false;
        let out = Handled::Consumed(7).or_else(|| {
            called = true;
            Handled::Consumed(1)
        });
        assert_eq!(out, Handled::Consumed(7));
        assert!(!called);
    }

    #[test]
    fn or_else_runs_next_stage_when_declined() {
        let out = Handled::NotHandled.or_else(|| Handled::Consumed(3));
        assert_eq!(out, Handled::Consumed(3));
        assert!(Handled::Consumed(0).is_consumed());
        assert!(!Handled::NotHandled.is_consumed());
    }

    #[test]
    fn names_for_routed_messages() {
        assert_eq!(message_name(WM_NCHITTEST), "WM_NCHITTEST");
        assert_eq!(message_name(0xFFFF), "other");
    }
}
