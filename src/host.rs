//! The window host: one native window with one embedded view filling its client area.
//!
//! Message routing order:
//! 1. the embedded view's top-level handler (a consumed message returns immediately),
//! 2. host lifecycle (WM_DESTROY),
//! 3. the borderless chrome (`Chrome::handle`),
//! 4. the base window's default handler.
//!
//! The host lives in an `Rc` and the OS window only holds a `Weak` to it, so a host that is
//! being dropped never receives messages from its own teardown.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, info, trace, warn};

use crate::chrome::Chrome;
use crate::engine::{EmbeddedView, PluginRegistrar, ProjectDescriptor, ViewFactory};
use crate::error::{HostError, Result};
use crate::geometry::{Point, Size};
use crate::message::{Handled, RawMessage, WM_DESTROY, message_name};
use crate::power::{KeepAwake, PowerControl};
use crate::window::{NativeWindow, WindowDelegate};

pub struct WindowHost<W, F, P>
where
    W: NativeWindow,
    F: ViewFactory,
    P: PowerControl,
{
    window: W,
    factory: F,
    project: ProjectDescriptor,
    register_plugins: PluginRegistrar,
    view: RefCell<Option<F::View>>,
    chrome: Chrome,
    keep_awake: KeepAwake<P>,
}

impl<W, F, P> WindowHost<W, F, P>
where
    W: NativeWindow + 'static,
    F: ViewFactory + 'static,
    P: PowerControl + 'static,
{
    pub fn new(
        window: W,
        factory: F,
        project: ProjectDescriptor,
        register_plugins: PluginRegistrar,
        power: P,
    ) -> Rc<Self> {
        Rc::new(Self {
            window,
            factory,
            project,
            register_plugins,
            view: RefCell::new(None),
            chrome: Chrome::new(),
            keep_awake: KeepAwake::new(power),
        })
    }

    /// Create the native window, embed the view and apply the borderless chrome.
    ///
    /// If the view comes back without an engine or native view it is dropped before anything
    /// is attached, styled or inhibited; the hidden base window is left for `destroy` / `Drop`.
    pub fn create(self: &Rc<Self>, title: &str, origin: Point, size: Size) -> Result<()> {
        let delegate: Weak<dyn WindowDelegate> = Rc::downgrade(self) as Weak<dyn WindowDelegate>;
        self.window.create(title, origin, size, delegate)?;

        let client = self.window.client_size();
        debug!(width = client.width, height = client.height, "creating embedded view");
        let view = self.factory.create(client, &self.project);
        let Some(engine) = view.engine() else {
            warn!("embedded view came back without an engine");
            return Err(HostError::EngineUnavailable);
        };
        let Some(native) = view.native_view() else {
            warn!("embedded view came back without a native view");
            return Err(HostError::ViewUnavailable);
        };
        *self.view.borrow_mut() = Some(view);

        (self.register_plugins)(engine);
        self.window.set_child_content(native);
        self.chrome.apply(&self.window);
        self.keep_awake.engage();
        self.window.show();
        info!(engine = engine.0, ?native, title, "host window created");
        Ok(())
    }
}

impl<W, F, P> WindowHost<W, F, P>
where
    W: NativeWindow,
    F: ViewFactory,
    P: PowerControl,
{
    /// Release the view, power request and background brush, then tear down the base window.
    /// Every step is idempotent.
    pub fn destroy(&self) {
        match self.view.try_borrow_mut() {
            Ok(mut slot) => {
                if slot.take().is_some() {
                    debug!("embedded view released");
                }
            }
            Err(_) => warn!("embedded view busy during teardown; release deferred to drop"),
        }
        self.keep_awake.release();
        self.chrome.release(&self.window);
        self.window.destroy();
    }

    #[cfg(test)]
    pub fn window(&self) -> &W {
        &self.window
    }

    #[cfg(test)]
    pub fn has_view(&self) -> bool {
        self.view.try_borrow().map(|v| v.is_some()).unwrap_or(true)
    }

    #[cfg(test)]
    pub fn drag_session(&self) -> crate::chrome::DragSession {
        self.chrome.drag_session()
    }

    #[cfg(test)]
    pub fn is_keeping_awake(&self) -> bool {
        self.keep_awake.is_engaged()
    }

    fn forward_to_view(&self, msg: &RawMessage) -> Handled {
        // Shared borrows nest, so a view handler that triggers re-entrant messages is fine;
        // only the brief store/take in create/destroy makes this fail.
        match self.view.try_borrow() {
            Ok(slot) => slot
                .as_ref()
                .map_or(Handled::NotHandled, |view| view.handle_top_level_message(msg)),
            Err(_) => Handled::NotHandled,
        }
    }

    fn handle_lifecycle(&self, msg: &RawMessage) -> Handled {
        if msg.id != WM_DESTROY {
            return Handled::NotHandled;
        }
        info!("host window destroyed by the OS");
        self.window.handle_destroyed();
        self.destroy();
        Handled::Consumed(0)
    }
}

impl<W, F, P> WindowDelegate for WindowHost<W, F, P>
where
    W: NativeWindow,
    F: ViewFactory,
    P: PowerControl,
{
    fn handle_message(&self, msg: RawMessage) -> isize {
        trace!(
            message = message_name(msg.id),
            id = format!("0x{:04X}", msg.id),
            wparam = msg.wparam,
            lparam = msg.lparam,
            "routing"
        );
        let handled = self
            .forward_to_view(&msg)
            .or_else(|| self.handle_lifecycle(&msg))
            .or_else(|| self.chrome.handle(&self.window, &msg));
        match handled {
            Handled::Consumed(result) => result,
            Handled::NotHandled => self.window.default_proc(&msg),
        }
    }
}

impl<W, F, P> Drop for WindowHost<W, F, P>
where
    W: NativeWindow,
    F: ViewFactory,
    P: PowerControl,
{
    fn drop(&mut self) {
        self.destroy();
    }
}
