//! Borderless window chrome.
//!
//! Turns a standard overlapped window into a frameless one while keeping the OS's own
//! minimize / maximize / restore semantics:
//! * The caption, sizing frame and system menu styles are stripped and the frame is extended
//!   into the client area, so the embedded view covers the whole window.
//! * The top `TITLE_BAR_HEIGHT` pixels act as a caption band. When the window is normal the
//!   band reports HTCAPTION so the OS moves it. When maximized the band reports HTMAXBUTTON,
//!   and pressing it starts a manual drag session that restores the window under the cursor
//!   and follows the mouse until the button is released.
//! * WM_GETMINMAXINFO pins the maximized placement to the nearest monitor's work area, so a
//!   frameless maximized window does not cover the taskbar.

use std::cell::Cell;
use tracing::{debug, trace};

use crate::geometry::Point;
use crate::message::{
    HTCAPTION, HTMAXBUTTON, Handled, RawMessage, SC_MAXIMIZE, SC_MINIMIZE, SC_RESTORE,
    WM_CAPTURECHANGED, WM_GETMINMAXINFO, WM_LBUTTONUP, WM_MOUSEMOVE, WM_NCCALCSIZE,
    WM_NCHITTEST, WM_NCLBUTTONDOWN, WM_SYSCOMMAND,
};
use crate::window::{BrushHandle, MaximizeTarget, NativeWindow, Rgb};

/// Height of the draggable band at the top of the client area, in physical pixels.
pub const TITLE_BAR_HEIGHT: i32 = 32;

pub const WS_MAXIMIZEBOX: u32 = 0x0001_0000;
pub const WS_MINIMIZEBOX: u32 = 0x0002_0000;
pub const WS_THICKFRAME: u32 = 0x0004_0000;
pub const WS_SYSMENU: u32 = 0x0008_0000;
pub const WS_CAPTION: u32 = 0x00C0_0000;

/// Background painted before the embedded view's first frame.
const BACKGROUND: Rgb = Rgb::BLACK;

/// Window style with the OS chrome removed but minimize/maximize capability kept.
pub const fn borderless_style(style: u32) -> u32 {
    (style & !(WS_CAPTION | WS_THICKFRAME | WS_SYSMENU)) | WS_MINIMIZEBOX | WS_MAXIMIZEBOX
}

/// Manual move started from the fake maximize button.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    /// `grab_offset` is the cursor position relative to the window's top-left corner.
    Dragging { grab_offset: Point },
}

#[derive(Default)]
pub struct Chrome {
    drag: Cell<DragSession>,
    background: Cell<Option<BrushHandle>>,
}

impl Chrome {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn drag_session(&self) -> DragSession {
        self.drag.get()
    }

    #[cfg(test)]
    pub fn background_brush(&self) -> Option<BrushHandle> {
        self.background.get()
    }

    /// Apply the borderless styling. Safe to repeat; the background brush is created once.
    pub fn apply<W: NativeWindow + ?Sized>(&self, window: &W) {
        let style = window.style();
        let updated = borderless_style(style);
        trace!(
            from = format!("0x{style:08X}"),
            to = format!("0x{updated:08X}"),
            "applying borderless style"
        );
        window.set_style(updated);
        window.enable_non_client_rendering();
        window.extend_frame_into_client_area();
        window.notify_frame_changed();

        let brush = match self.background.get() {
            Some(brush) => Some(brush),
            None => {
                let created = window.create_solid_brush(BACKGROUND);
                self.background.set(created);
                created
            }
        };
        if let Some(brush) = brush {
            window.set_class_background(Some(brush));
        }
        window.notify_frame_changed();
    }

    /// Release the background brush. Only the first call after `apply` touches the OS.
    pub fn release<W: NativeWindow + ?Sized>(&self, window: &W) {
        if let Some(brush) = self.background.take() {
            window.set_class_background(None);
            window.delete_brush(brush);
            debug!(?brush, "background brush released");
        }
    }

    /// Chrome stage of the message handler.
    pub fn handle<W: NativeWindow + ?Sized>(&self, window: &W, msg: &RawMessage) -> Handled {
        match msg.id {
            // A non-zero wparam asks for the client rectangle; returning 0 without touching
            // it makes the client area cover the whole window.
            WM_NCCALCSIZE if msg.wparam != 0 => Handled::Consumed(0),
            WM_NCHITTEST => self.hit_test(window, Point::from_lparam(msg.lparam)),
            WM_NCLBUTTONDOWN
                if msg.wparam as isize == HTMAXBUTTON && window.is_maximized() =>
            {
                self.begin_drag(window, Point::from_lparam(msg.lparam));
                Handled::Consumed(0)
            }
            // Drag tracking never consumes mouse input; the base handler still sees it.
            WM_MOUSEMOVE => {
                if let DragSession::Dragging { grab_offset } = self.drag.get() {
                    window.move_to(window.cursor_position() - grab_offset);
                }
                Handled::NotHandled
            }
            WM_LBUTTONUP => {
                if let DragSession::Dragging { .. } = self.drag.get() {
                    self.end_drag(window);
                }
                Handled::NotHandled
            }
            WM_CAPTURECHANGED => {
                if let DragSession::Dragging { .. } = self.drag.replace(DragSession::Idle) {
                    debug!("mouse capture lost; drag session cancelled");
                }
                Handled::NotHandled
            }
            // Without monitor info the OS defaults are left in place.
            WM_GETMINMAXINFO => {
                match window.nearest_work_area() {
                    Some(work) => window.write_max_info(
                        msg.lparam,
                        MaximizeTarget {
                            position: work.origin(),
                            size: work.size(),
                        },
                    ),
                    None => debug!("no monitor work area; keeping default maximized placement"),
                }
                Handled::Consumed(0)
            }
            WM_SYSCOMMAND
                if matches!(
                    msg.system_command(),
                    SC_MINIMIZE | SC_MAXIMIZE | SC_RESTORE
                ) =>
            {
                // The OS resets frame styles on these transitions; re-apply after it is done.
                window.default_proc(msg);
                self.apply(window);
                Handled::Consumed(0)
            }
            _ => Handled::NotHandled,
        }
    }

    fn hit_test<W: NativeWindow + ?Sized>(&self, window: &W, screen: Point) -> Handled {
        let client = window.screen_to_client(screen);
        if client.y >= TITLE_BAR_HEIGHT {
            return Handled::NotHandled;
        }
        if window.is_maximized() {
            Handled::Consumed(HTMAXBUTTON)
        } else {
            Handled::Consumed(HTCAPTION)
        }
    }

    /// Restore the maximized window centered horizontally under `cursor` and start following it.
    fn begin_drag<W: NativeWindow + ?Sized>(&self, window: &W, cursor: Point) {
        window.restore();
        let restored = window.window_rect();
        let top_left = Point::new(cursor.x - restored.width() / 2, cursor.y);
        window.move_to(top_left);
        let grab_offset = cursor - top_left;
        self.drag.set(DragSession::Dragging { grab_offset });
        window.capture_mouse();
        debug!(?cursor, ?top_left, ?grab_offset, "drag session started");
    }

    fn end_drag<W: NativeWindow + ?Sized>(&self, window: &W) {
        self.drag.set(DragSession::Idle);
        window.release_mouse();
        debug!("drag session ended");
    }
}
