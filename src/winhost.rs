//! Win32 base window and message loop.
//!
//! `Win32Window` registers one window class per process, creates the top-level window and
//! routes every message through a `Weak<dyn WindowDelegate>` stored in GWLP_USERDATA. Messages
//! that arrive before the delegate is attached (creation time) or after the delegate is gone
//! (host dropped) fall straight through to DefWindowProcW. The boxed `Weak` is reclaimed on
//! WM_NCDESTROY.
//!
//! All OS calls except window creation are best-effort; failures are traced and ignored.

use anyhow::{Result as AnyResult, anyhow};
use once_cell::sync::OnceCell;
use std::cell::Cell;
use std::ffi::c_void;
use std::rc::Weak;
use tracing::{debug, trace, warn};
use widestring::U16CString;
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Dwm::{
    DWMNCRP_ENABLED, DWMWA_NCRENDERING_POLICY, DwmExtendFrameIntoClientArea, DwmSetWindowAttribute,
};
use windows::Win32::Graphics::Gdi::{
    CreateSolidBrush, DeleteObject, GetMonitorInfoW, HGDIOBJ, MONITOR_DEFAULTTONEAREST,
    MONITORINFO, MonitorFromPoint, MonitorFromWindow, ScreenToClient,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Controls::MARGINS;
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture, SetFocus};
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW,
    GCLP_HBRBACKGROUND, GWL_STYLE, GWLP_USERDATA, GetClientRect, GetCursorPos, GetMessageW,
    GetWindowLongPtrW, GetWindowRect, IDC_ARROW, IsZoomed, LoadCursorW, MINMAXINFO, MSG,
    MoveWindow, PostQuitMessage, RegisterClassW, SW_RESTORE, SW_SHOWNORMAL, SWP_FRAMECHANGED, SWP_NOACTIVATE,
    SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, SetClassLongPtrW, SetParent, SetWindowLongPtrW,
    SetWindowPos, ShowWindow, TranslateMessage, WINDOW_EX_STYLE, WNDCLASSW, WS_CHILD,
    WS_OVERLAPPEDWINDOW, WS_POPUP, WS_VISIBLE,
};
use windows::core::PCWSTR;

use crate::engine::ViewHandle;
use crate::error::{HostError, Result};
use crate::geometry::{Point, Rect, Size, scale_for_dpi};
use crate::message::{
    RawMessage, WM_ACTIVATE, WM_DPICHANGED, WM_NCDESTROY, WM_SIZE, message_name,
};
use crate::window::{BrushHandle, MaximizeTarget, NativeWindow, Rgb, WindowDelegate};

const CLASS_NAME: &str = "HostframeWindow";
const DEFAULT_DPI: u32 = 96;

static WINDOW_CLASS: OnceCell<U16CString> = OnceCell::new();

type DelegateSlot = Weak<dyn WindowDelegate>;

pub(crate) fn rect_from(rc: RECT) -> Rect {
    Rect::new(rc.left, rc.top, rc.right, rc.bottom)
}

pub(crate) fn hwnd_from(view: ViewHandle) -> HWND {
    HWND(view.0 as *mut c_void)
}

/// Raw window procedure (FFI boundary). Resolves the delegate slot and forwards.
unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let slot = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut DelegateSlot;
    if slot.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }
    // The upgraded Rc keeps the host alive for the duration of this (possibly re-entered) call.
    let delegate = unsafe { (*slot).upgrade() };
    let result = match delegate {
        Some(delegate) => LRESULT(delegate.handle_message(RawMessage::new(msg, wparam.0, lparam.0))),
        None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    };
    if msg == WM_NCDESTROY {
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            drop(Box::from_raw(slot));
        }
    }
    result
}

fn register_window_class() -> Result<&'static U16CString> {
    WINDOW_CLASS.get_or_try_init(|| {
        let name = U16CString::from_str(CLASS_NAME)
            .map_err(|_| HostError::BaseWindow("invalid class name".into()))?;
        unsafe {
            let instance = GetModuleHandleW(PCWSTR::null())?;
            let wc = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(wnd_proc),
                hInstance: instance.into(),
                hCursor: LoadCursorW(None, IDC_ARROW)?,
                lpszClassName: PCWSTR(name.as_ptr()),
                ..Default::default()
            };
            if RegisterClassW(&wc) == 0 {
                return Err(HostError::BaseWindow("RegisterClassW failed".into()));
            }
        }
        debug!(class = CLASS_NAME, "window class registered");
        Ok(name)
    })
}

/// Effective DPI of the monitor nearest to `point` (96 if it cannot be queried).
fn monitor_dpi(point: Point) -> u32 {
    unsafe {
        let monitor = MonitorFromPoint(POINT { x: point.x, y: point.y }, MONITOR_DEFAULTTONEAREST);
        let (mut dpi_x, mut dpi_y) = (0u32, 0u32);
        if GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y).is_ok() && dpi_x != 0 {
            dpi_x
        } else {
            DEFAULT_DPI
        }
    }
}

/// Top-level Win32 window.
pub struct Win32Window {
    hwnd: Cell<HWND>,
    child: Cell<Option<HWND>>,
    destroying: Cell<bool>,
    quit_on_close: bool,
}

impl Win32Window {
    /// `quit_on_close` posts WM_QUIT once the OS destroys the window.
    pub fn new(quit_on_close: bool) -> Self {
        Self {
            hwnd: Cell::new(HWND::default()),
            child: Cell::new(None),
            destroying: Cell::new(false),
            quit_on_close,
        }
    }

    pub fn hwnd(&self) -> Option<HWND> {
        let hwnd = self.hwnd.get();
        (!hwnd.is_invalid()).then_some(hwnd)
    }

    fn fit_child_to_client(&self, hwnd: HWND) {
        let Some(child) = self.child.get() else {
            return;
        };
        let mut rc = RECT::default();
        unsafe {
            if GetClientRect(hwnd, &mut rc).is_ok() {
                let _ = MoveWindow(child, rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top, true);
            }
        }
    }

    fn apply_suggested_rect(&self, hwnd: HWND, lparam: isize) {
        let suggested = lparam as *const RECT;
        if let Some(rc) = unsafe { suggested.as_ref() } {
            trace!(?rc, "adopting DPI suggested rect");
            unsafe {
                let _ = SetWindowPos(
                    hwnd,
                    None,
                    rc.left,
                    rc.top,
                    rc.right - rc.left,
                    rc.bottom - rc.top,
                    SWP_NOZORDER | SWP_NOACTIVATE,
                );
            }
        }
    }
}

impl NativeWindow for Win32Window {
    fn create(
        &self,
        title: &str,
        origin: Point,
        size: Size,
        delegate: Weak<dyn WindowDelegate>,
    ) -> Result<()> {
        let class = register_window_class()?;
        let title_w = U16CString::from_str(title).map_err(|_| HostError::InvalidTitle)?;
        let dpi = monitor_dpi(origin);
        let hwnd = unsafe {
            let instance = GetModuleHandleW(PCWSTR::null())?;
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                PCWSTR(class.as_ptr()),
                PCWSTR(title_w.as_ptr()),
                WS_OVERLAPPEDWINDOW,
                scale_for_dpi(origin.x, dpi),
                scale_for_dpi(origin.y, dpi),
                scale_for_dpi(size.width, dpi),
                scale_for_dpi(size.height, dpi),
                None,
                None,
                Some(instance.into()),
                None,
            )?
        };
        self.hwnd.set(hwnd);
        self.destroying.set(false);
        let slot: Box<DelegateSlot> = Box::new(delegate);
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(slot) as isize);
        }
        debug!(?hwnd, dpi, title, "base window created");
        Ok(())
    }

    fn show(&self) {
        if let Some(hwnd) = self.hwnd() {
            let _ = unsafe { ShowWindow(hwnd, SW_SHOWNORMAL) };
        }
    }

    fn destroy(&self) {
        if let Some(hwnd) = self.hwnd()
            && !self.destroying.replace(true)
        {
            debug!(?hwnd, "destroying base window");
            if let Err(e) = unsafe { DestroyWindow(hwnd) } {
                warn!(?e, "DestroyWindow failed");
            }
        }
    }

    fn handle_destroyed(&self) {
        self.destroying.set(true);
        if self.quit_on_close {
            unsafe { PostQuitMessage(0) };
        }
    }

    fn default_proc(&self, msg: &RawMessage) -> isize {
        let Some(hwnd) = self.hwnd() else {
            return 0;
        };
        match msg.id {
            WM_SIZE => {
                self.fit_child_to_client(hwnd);
                0
            }
            WM_ACTIVATE => {
                if let Some(child) = self.child.get() {
                    unsafe {
                        let _ = SetFocus(Some(child));
                    }
                }
                0
            }
            WM_DPICHANGED => {
                self.apply_suggested_rect(hwnd, msg.lparam);
                0
            }
            WM_NCDESTROY => {
                let result = unsafe {
                    DefWindowProcW(hwnd, msg.id, WPARAM(msg.wparam), LPARAM(msg.lparam))
                };
                self.hwnd.set(HWND::default());
                self.child.set(None);
                result.0
            }
            _ => {
                trace!(message = message_name(msg.id), "default handling");
                unsafe { DefWindowProcW(hwnd, msg.id, WPARAM(msg.wparam), LPARAM(msg.lparam)).0 }
            }
        }
    }

    fn client_size(&self) -> Size {
        let mut rc = RECT::default();
        if let Some(hwnd) = self.hwnd() {
            let _ = unsafe { GetClientRect(hwnd, &mut rc) };
        }
        rect_from(rc).size()
    }

    fn window_rect(&self) -> Rect {
        let mut rc = RECT::default();
        if let Some(hwnd) = self.hwnd() {
            let _ = unsafe { GetWindowRect(hwnd, &mut rc) };
        }
        rect_from(rc)
    }

    fn is_maximized(&self) -> bool {
        self.hwnd()
            .is_some_and(|hwnd| unsafe { IsZoomed(hwnd) }.as_bool())
    }

    fn restore(&self) {
        if let Some(hwnd) = self.hwnd() {
            let _ = unsafe { ShowWindow(hwnd, SW_RESTORE) };
        }
    }

    fn move_to(&self, top_left: Point) {
        if let Some(hwnd) = self.hwnd() {
            let moved = unsafe {
                SetWindowPos(
                    hwnd,
                    None,
                    top_left.x,
                    top_left.y,
                    0,
                    0,
                    SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
                )
            };
            if let Err(e) = moved {
                trace!(?e, "SetWindowPos (move) failed");
            }
        }
    }

    fn screen_to_client(&self, point: Point) -> Point {
        let mut pt = POINT {
            x: point.x,
            y: point.y,
        };
        if let Some(hwnd) = self.hwnd() {
            let _ = unsafe { ScreenToClient(hwnd, &mut pt) };
        }
        Point::new(pt.x, pt.y)
    }

    fn cursor_position(&self) -> Point {
        let mut pt = POINT::default();
        let _ = unsafe { GetCursorPos(&mut pt) };
        Point::new(pt.x, pt.y)
    }

    fn capture_mouse(&self) {
        if let Some(hwnd) = self.hwnd() {
            let _ = unsafe { SetCapture(hwnd) };
        }
    }

    fn release_mouse(&self) {
        if let Err(e) = unsafe { ReleaseCapture() } {
            trace!(?e, "ReleaseCapture failed");
        }
    }

    fn nearest_work_area(&self) -> Option<Rect> {
        let hwnd = self.hwnd()?;
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        unsafe {
            let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
            if GetMonitorInfoW(monitor, &mut info).as_bool() {
                Some(rect_from(info.rcWork))
            } else {
                warn!("GetMonitorInfoW failed");
                None
            }
        }
    }

    fn style(&self) -> u32 {
        self.hwnd()
            .map_or(0, |hwnd| unsafe { GetWindowLongPtrW(hwnd, GWL_STYLE) } as u32)
    }

    fn set_style(&self, style: u32) {
        if let Some(hwnd) = self.hwnd() {
            unsafe {
                SetWindowLongPtrW(hwnd, GWL_STYLE, style as isize);
            }
        }
    }

    fn enable_non_client_rendering(&self) {
        if let Some(hwnd) = self.hwnd() {
            let policy = DWMNCRP_ENABLED.0;
            let set = unsafe {
                DwmSetWindowAttribute(
                    hwnd,
                    DWMWA_NCRENDERING_POLICY,
                    &policy as *const i32 as *const c_void,
                    std::mem::size_of_val(&policy) as u32,
                )
            };
            if let Err(e) = set {
                debug!(?e, "DwmSetWindowAttribute(NCRENDERING_POLICY) failed");
            }
        }
    }

    fn extend_frame_into_client_area(&self) {
        if let Some(hwnd) = self.hwnd() {
            let margins = MARGINS::default();
            if let Err(e) = unsafe { DwmExtendFrameIntoClientArea(hwnd, &margins) } {
                debug!(?e, "DwmExtendFrameIntoClientArea failed");
            }
        }
    }

    fn notify_frame_changed(&self) {
        if let Some(hwnd) = self.hwnd() {
            unsafe {
                let _ = SetWindowPos(
                    hwnd,
                    None,
                    0,
                    0,
                    0,
                    0,
                    SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER,
                );
            }
        }
    }

    fn create_solid_brush(&self, color: Rgb) -> Option<BrushHandle> {
        let brush = unsafe { CreateSolidBrush(COLORREF(color.to_colorref())) };
        if brush.is_invalid() {
            warn!(?color, "CreateSolidBrush failed");
            return None;
        }
        Some(BrushHandle(brush.0 as isize))
    }

    fn set_class_background(&self, brush: Option<BrushHandle>) {
        if let Some(hwnd) = self.hwnd() {
            unsafe {
                SetClassLongPtrW(hwnd, GCLP_HBRBACKGROUND, brush.map_or(0, |b| b.0));
            }
        }
    }

    fn delete_brush(&self, brush: BrushHandle) {
        unsafe {
            let _ = DeleteObject(HGDIOBJ(brush.0 as *mut c_void));
        }
    }

    fn set_child_content(&self, view: ViewHandle) {
        let Some(hwnd) = self.hwnd() else {
            return;
        };
        let child = hwnd_from(view);
        unsafe {
            if let Err(e) = SetParent(child, Some(hwnd)) {
                warn!(?e, "SetParent failed for embedded view");
                return;
            }
            let style = GetWindowLongPtrW(child, GWL_STYLE) as u32;
            let style = (style & !WS_POPUP.0) | WS_CHILD.0 | WS_VISIBLE.0;
            SetWindowLongPtrW(child, GWL_STYLE, style as isize);
        }
        self.child.set(Some(child));
        self.fit_child_to_client(hwnd);
        unsafe {
            let _ = SetFocus(Some(child));
        }
    }

    fn write_max_info(&self, lparam: isize, target: MaximizeTarget) {
        let info = lparam as *mut MINMAXINFO;
        // SAFETY: only called while handling WM_GETMINMAXINFO, whose lparam points at a
        // MINMAXINFO owned by the OS for the duration of the message.
        if let Some(info) = unsafe { info.as_mut() } {
            info.ptMaxPosition = POINT {
                x: target.position.x,
                y: target.position.y,
            };
            info.ptMaxSize = POINT {
                x: target.size.width,
                y: target.size.height,
            };
        }
    }
}

/// Standard GetMessage/Dispatch loop terminated by WM_QUIT.
pub fn run_message_loop() -> AnyResult<()> {
    unsafe {
        let mut msg = MSG::default();
        loop {
            let r = GetMessageW(&mut msg, None, 0, 0);
            if r.0 == -1 {
                return Err(anyhow!("GetMessageW failed"));
            }
            if r.0 == 0 {
                return Ok(());
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
