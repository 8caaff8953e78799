//! Stand-in embedded view: a black child-capable window with a unique engine id.
//!
//! Used when no rendering engine is linked in. It exercises the full embedding path (reparenting,
//! resize and focus forwarding, teardown) and declines every top-level message.

use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicIsize, Ordering};
use tracing::{debug, error, warn};
use widestring::U16CString;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{BLACK_BRUSH, GetStockObject, HBRUSH};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, IsWindow, RegisterClassW, WINDOW_EX_STYLE,
    WNDCLASSW, WS_POPUP,
};
use windows::core::PCWSTR;

use crate::engine::{EmbeddedView, EngineHandle, ProjectDescriptor, ViewFactory, ViewHandle};
use crate::error::{HostError, Result};
use crate::geometry::Size;
use crate::message::{Handled, RawMessage};

const CLASS_NAME: &str = "HostframeSurface";

static SURFACE_CLASS: OnceCell<U16CString> = OnceCell::new();
static NEXT_ENGINE_ID: AtomicIsize = AtomicIsize::new(1);

unsafe extern "system" fn surface_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

fn register_surface_class() -> Result<&'static U16CString> {
    SURFACE_CLASS.get_or_try_init(|| {
        let name = U16CString::from_str(CLASS_NAME)
            .map_err(|_| HostError::BaseWindow("invalid class name".into()))?;
        unsafe {
            let instance = GetModuleHandleW(PCWSTR::null())?;
            let wc = WNDCLASSW {
                lpfnWndProc: Some(surface_proc),
                hInstance: instance.into(),
                hbrBackground: HBRUSH(GetStockObject(BLACK_BRUSH).0),
                lpszClassName: PCWSTR(name.as_ptr()),
                ..Default::default()
            };
            if RegisterClassW(&wc) == 0 {
                return Err(HostError::BaseWindow("RegisterClassW (surface) failed".into()));
            }
        }
        Ok(name)
    })
}

fn create_surface_window(size: Size) -> Result<HWND> {
    let class = register_surface_class()?;
    let hwnd = unsafe {
        let instance = GetModuleHandleW(PCWSTR::null())?;
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            PCWSTR(class.as_ptr()),
            PCWSTR::null(),
            WS_POPUP,
            0,
            0,
            size.width,
            size.height,
            None,
            None,
            Some(instance.into()),
            None,
        )?
    };
    Ok(hwnd)
}

pub struct BlankSurfaceFactory;

impl ViewFactory for BlankSurfaceFactory {
    type View = BlankSurface;

    fn create(&self, size: Size, project: &ProjectDescriptor) -> BlankSurface {
        debug!(
            assets = %project.assets_dir.display(),
            aot = %project.aot_library.display(),
            args = ?project.entrypoint_args,
            "resolving bundle"
        );
        let missing = project.missing_paths();
        if !missing.is_empty() {
            warn!(?missing, "bundle is incomplete; surface stays blank");
        }
        let hwnd = match create_surface_window(size) {
            Ok(hwnd) => Some(hwnd),
            Err(e) => {
                error!(?e, "surface window creation failed");
                None
            }
        };
        let engine = EngineHandle(NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed));
        debug!(?hwnd, ?engine, width = size.width, height = size.height, "blank surface created");
        BlankSurface { hwnd, engine }
    }
}

pub struct BlankSurface {
    hwnd: Option<HWND>,
    engine: EngineHandle,
}

impl EmbeddedView for BlankSurface {
    fn engine(&self) -> Option<EngineHandle> {
        Some(self.engine)
    }

    fn native_view(&self) -> Option<ViewHandle> {
        self.hwnd.map(|hwnd| ViewHandle(hwnd.0 as isize))
    }

    fn handle_top_level_message(&self, _msg: &RawMessage) -> Handled {
        Handled::NotHandled
    }
}

impl Drop for BlankSurface {
    fn drop(&mut self) {
        if let Some(hwnd) = self.hwnd.take()
            && unsafe { IsWindow(Some(hwnd)) }.as_bool()
        {
            let _ = unsafe { DestroyWindow(hwnd) };
        }
    }
}
