//! Seams between the host and the OS window it drives.
//!
//! `NativeWindow` is the generic platform window base: lifecycle hooks, the default message
//! handler and the handful of window-manager operations the chrome logic needs. All methods
//! take `&self` because the OS re-enters the window procedure synchronously from inside many
//! of these calls (restoring, moving and frame changes all send messages back to the window).
//!
//! Every operation except `create` is best-effort: implementations log failures and carry on.

use std::rc::Weak;

use crate::engine::ViewHandle;
use crate::error::Result;
use crate::geometry::{Point, Rect, Size};
use crate::message::RawMessage;

/// Receives every message delivered to a created window.
pub trait WindowDelegate {
    fn handle_message(&self, msg: RawMessage) -> isize;
}

/// Opaque GDI brush handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BrushHandle(pub isize);

/// 24-bit color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Pack as a Win32 COLORREF (0x00BBGGRR).
    pub const fn to_colorref(self) -> u32 {
        (self.0 as u32) | ((self.1 as u32) << 8) | ((self.2 as u32) << 16)
    }
}

/// Maximized placement reported through WM_GETMINMAXINFO.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MaximizeTarget {
    pub position: Point,
    pub size: Size,
}

pub trait NativeWindow {
    /// Create the OS window and route its messages to `delegate`.
    ///
    /// `origin` and `size` are in 96-DPI logical pixels; implementations scale them for the
    /// monitor the window lands on.
    fn create(
        &self,
        title: &str,
        origin: Point,
        size: Size,
        delegate: Weak<dyn WindowDelegate>,
    ) -> Result<()>;

    /// Make the window visible. The window is created hidden so it never shows the system frame.
    fn show(&self);

    /// Tear down the OS window. Idempotent.
    fn destroy(&self);

    /// The OS is destroying the window (WM_DESTROY); it must not be destroyed again.
    fn handle_destroyed(&self);

    /// Base message handling for anything the host did not consume.
    fn default_proc(&self, msg: &RawMessage) -> isize;

    fn client_size(&self) -> Size;
    fn window_rect(&self) -> Rect;
    fn is_maximized(&self) -> bool;
    fn restore(&self);
    /// Move the top-left corner, keeping size and z-order.
    fn move_to(&self, top_left: Point);
    fn screen_to_client(&self, point: Point) -> Point;
    /// Current cursor position in screen coordinates.
    fn cursor_position(&self) -> Point;
    fn capture_mouse(&self);
    fn release_mouse(&self);
    /// Work area of the monitor nearest to the window, `None` if the monitor cannot be queried.
    fn nearest_work_area(&self) -> Option<Rect>;

    fn style(&self) -> u32;
    fn set_style(&self, style: u32);
    /// Let DWM render the non-client area so the frame can be extended.
    fn enable_non_client_rendering(&self);
    /// Extend the composited frame into the client area with zero margins.
    fn extend_frame_into_client_area(&self);
    /// Recalculate the non-client area without moving, sizing or reordering.
    fn notify_frame_changed(&self);

    fn create_solid_brush(&self, color: Rgb) -> Option<BrushHandle>;
    /// Install `brush` as the class background (`None` clears it).
    fn set_class_background(&self, brush: Option<BrushHandle>);
    fn delete_brush(&self, brush: BrushHandle);

    /// Re-parent `view` into the client area and size it to fill it.
    fn set_child_content(&self, view: ViewHandle);

    /// Write `target` into the MINMAXINFO structure a WM_GETMINMAXINFO `lparam` points at.
    fn write_max_info(&self, lparam: isize, target: MaximizeTarget);
}
