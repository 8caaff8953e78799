//! Recording fakes for the window, power and view seams.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::engine::{EmbeddedView, EngineHandle, ProjectDescriptor, ViewFactory, ViewHandle};
use crate::error::{HostError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::message::{Handled, RawMessage};
use crate::power::PowerControl;
use crate::window::{BrushHandle, MaximizeTarget, NativeWindow, Rgb, WindowDelegate};

const WS_VISIBLE: u32 = 0x1000_0000;

/// Pack a screen point the way the OS does for non-client mouse messages.
pub fn lparam_at(point: Point) -> isize {
    (((point.y as u16) as isize) << 16) | (point.x as u16) as isize
}

/// In-memory window. The client area covers the whole window (as after the chrome is
/// applied), so screen-to-client is a plain translation by the window origin.
pub struct FakeWindow {
    rect: Cell<Rect>,
    restored: Cell<Option<Rect>>,
    maximized: Cell<bool>,
    cursor: Cell<Point>,
    capture: Cell<bool>,
    capture_releases: Cell<usize>,
    style: Cell<u32>,
    work_area: Cell<Option<Rect>>,
    next_brush: Cell<isize>,
    brushes_created: Cell<usize>,
    brushes_deleted: Cell<usize>,
    class_background: Cell<Option<BrushHandle>>,
    default_result: Cell<isize>,
    default_seen: RefCell<Vec<u32>>,
    max_info: Cell<Option<(isize, MaximizeTarget)>>,
    child: Cell<Option<ViewHandle>>,
    fail_create: Cell<bool>,
    created: Cell<bool>,
    os_destroyed: Cell<bool>,
    delegate: RefCell<Option<Weak<dyn WindowDelegate>>>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeWindow {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Cell::new(rect),
            restored: Cell::new(None),
            maximized: Cell::new(false),
            cursor: Cell::new(Point::default()),
            capture: Cell::new(false),
            capture_releases: Cell::new(0),
            style: Cell::new(0),
            work_area: Cell::new(Some(Rect::new(0, 0, 1920, 1040))),
            next_brush: Cell::new(0x100),
            brushes_created: Cell::new(0),
            brushes_deleted: Cell::new(0),
            class_background: Cell::new(None),
            default_result: Cell::new(0),
            default_seen: RefCell::new(Vec::new()),
            max_info: Cell::new(None),
            child: Cell::new(None),
            fail_create: Cell::new(false),
            created: Cell::new(false),
            os_destroyed: Cell::new(false),
            delegate: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn set_maximized(&self, maximized: bool) {
        self.maximized.set(maximized);
    }

    /// Rectangle the window returns to when restored from maximized.
    pub fn set_restored_rect(&self, rect: Rect) {
        self.restored.set(Some(rect));
    }

    pub fn set_cursor(&self, cursor: Point) {
        self.cursor.set(cursor);
    }

    pub fn set_style_bits(&self, style: u32) {
        self.style.set(style);
    }

    pub fn style_bits(&self) -> u32 {
        self.style.get()
    }

    /// The full monitor rectangle is accepted only to show it is never reported.
    pub fn set_monitor(&self, _monitor: Rect, work_area: Rect) {
        self.work_area.set(Some(work_area));
    }

    /// Make the nearest-monitor query fail.
    pub fn fail_monitor_query(&self) {
        self.work_area.set(None);
    }

    pub fn set_default_result(&self, result: isize) {
        self.default_result.set(result);
    }

    pub fn fail_next_create(&self) {
        self.fail_create.set(true);
    }

    pub fn has_capture(&self) -> bool {
        self.capture.get()
    }

    pub fn capture_releases(&self) -> usize {
        self.capture_releases.get()
    }

    pub fn brushes_created(&self) -> usize {
        self.brushes_created.get()
    }

    pub fn brushes_deleted(&self) -> usize {
        self.brushes_deleted.get()
    }

    pub fn class_background(&self) -> Option<BrushHandle> {
        self.class_background.get()
    }

    pub fn frame_changes(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| **c == "frame_changed")
            .count()
    }

    pub fn max_info(&self) -> Option<(isize, MaximizeTarget)> {
        self.max_info.get()
    }

    pub fn child(&self) -> Option<ViewHandle> {
        self.child.get()
    }

    pub fn default_seen(&self) -> Vec<u32> {
        self.default_seen.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.style.get() & WS_VISIBLE != 0
    }

    /// Deliver `msg` the way the OS would: through the registered delegate.
    pub fn dispatch(&self, msg: RawMessage) -> Option<isize> {
        let delegate = self.delegate.borrow().as_ref()?.upgrade()?;
        Some(delegate.handle_message(msg))
    }
}

impl NativeWindow for FakeWindow {
    fn create(
        &self,
        _title: &str,
        origin: Point,
        size: Size,
        delegate: Weak<dyn WindowDelegate>,
    ) -> Result<()> {
        self.record("create");
        if self.fail_create.replace(false) {
            return Err(HostError::BaseWindow("CreateWindowExW failed".into()));
        }
        self.rect.set(Rect::from_origin_size(origin, size));
        self.style.set(0x00CF_0000); // WS_OVERLAPPEDWINDOW, hidden
        *self.delegate.borrow_mut() = Some(delegate);
        self.created.set(true);
        Ok(())
    }

    fn show(&self) {
        self.record("show");
        self.style.set(self.style.get() | WS_VISIBLE);
    }

    fn destroy(&self) {
        if self.created.replace(false) && !self.os_destroyed.get() {
            self.record("destroy");
        }
    }

    fn handle_destroyed(&self) {
        self.os_destroyed.set(true);
        self.record("handle_destroyed");
    }

    fn default_proc(&self, msg: &RawMessage) -> isize {
        self.record("default_proc");
        self.default_seen.borrow_mut().push(msg.id);
        self.default_result.get()
    }

    fn client_size(&self) -> Size {
        self.rect.get().size()
    }

    fn window_rect(&self) -> Rect {
        self.rect.get()
    }

    fn is_maximized(&self) -> bool {
        self.maximized.get()
    }

    fn restore(&self) {
        self.record("restore");
        self.maximized.set(false);
        if let Some(rect) = self.restored.get() {
            self.rect.set(rect);
        }
    }

    fn move_to(&self, top_left: Point) {
        self.record("move_to");
        let size = self.rect.get().size();
        self.rect.set(Rect::from_origin_size(top_left, size));
    }

    fn screen_to_client(&self, point: Point) -> Point {
        point - self.rect.get().origin()
    }

    fn cursor_position(&self) -> Point {
        self.cursor.get()
    }

    fn capture_mouse(&self) {
        self.record("capture_mouse");
        self.capture.set(true);
    }

    fn release_mouse(&self) {
        self.record("release_mouse");
        self.capture.set(false);
        self.capture_releases.set(self.capture_releases.get() + 1);
    }

    fn nearest_work_area(&self) -> Option<Rect> {
        self.work_area.get()
    }

    fn style(&self) -> u32 {
        self.style.get()
    }

    fn set_style(&self, style: u32) {
        self.record("set_style");
        self.style.set(style);
    }

    fn enable_non_client_rendering(&self) {
        self.record("nc_rendering");
    }

    fn extend_frame_into_client_area(&self) {
        self.record("extend_frame");
    }

    fn notify_frame_changed(&self) {
        self.record("frame_changed");
    }

    fn create_solid_brush(&self, _color: Rgb) -> Option<BrushHandle> {
        self.record("create_brush");
        let handle = self.next_brush.get();
        self.next_brush.set(handle + 1);
        self.brushes_created.set(self.brushes_created.get() + 1);
        Some(BrushHandle(handle))
    }

    fn set_class_background(&self, brush: Option<BrushHandle>) {
        self.record("set_class_background");
        self.class_background.set(brush);
    }

    fn delete_brush(&self, _brush: BrushHandle) {
        self.record("delete_brush");
        self.brushes_deleted.set(self.brushes_deleted.get() + 1);
    }

    fn set_child_content(&self, view: ViewHandle) {
        self.record("set_child_content");
        self.child.set(Some(view));
    }

    fn write_max_info(&self, lparam: isize, target: MaximizeTarget) {
        self.record("write_max_info");
        self.max_info.set(Some((lparam, target)));
    }
}

/// Records power requests into a shared log that outlives the control.
#[derive(Default)]
pub struct FakePower {
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl FakePower {
    pub fn log(&self) -> Rc<RefCell<Vec<&'static str>>> {
        self.log.clone()
    }

    pub fn awake_requests(&self) -> usize {
        self.log.borrow().iter().filter(|e| **e == "keep_awake").count()
    }

    pub fn sleep_restores(&self) -> usize {
        self.log.borrow().iter().filter(|e| **e == "allow_sleep").count()
    }
}

impl PowerControl for FakePower {
    fn keep_awake(&self) {
        self.log.borrow_mut().push("keep_awake");
    }

    fn allow_sleep(&self) {
        self.log.borrow_mut().push("allow_sleep");
    }
}

/// Shared observation point for views created by `FakeFactory`.
#[derive(Clone, Default)]
pub struct ViewProbe {
    pub created: Rc<RefCell<Vec<(Size, ProjectDescriptor)>>>,
    pub seen: Rc<RefCell<Vec<u32>>>,
    pub drops: Rc<Cell<usize>>,
    pub registered: Rc<RefCell<Vec<EngineHandle>>>,
}

impl ViewProbe {
    /// Plugin registrar that records every call into this probe.
    pub fn registrar(&self) -> Box<dyn Fn(EngineHandle)> {
        let registered = self.registered.clone();
        Box::new(move |engine| registered.borrow_mut().push(engine))
    }
}

pub struct FakeView {
    engine: Option<EngineHandle>,
    view: Option<ViewHandle>,
    consumes: Vec<(u32, isize)>,
    probe: ViewProbe,
}

impl EmbeddedView for FakeView {
    fn engine(&self) -> Option<EngineHandle> {
        self.engine
    }

    fn native_view(&self) -> Option<ViewHandle> {
        self.view
    }

    fn handle_top_level_message(&self, msg: &RawMessage) -> Handled {
        self.probe.seen.borrow_mut().push(msg.id);
        self.consumes
            .iter()
            .find(|(id, _)| *id == msg.id)
            .map_or(Handled::NotHandled, |(_, result)| Handled::Consumed(*result))
    }
}

impl Drop for FakeView {
    fn drop(&mut self) {
        self.probe.drops.set(self.probe.drops.get() + 1);
    }
}

/// Builds `FakeView`s with configurable handles and consumed messages.
pub struct FakeFactory {
    pub engine: Option<EngineHandle>,
    pub view: Option<ViewHandle>,
    pub consumes: Vec<(u32, isize)>,
    pub probe: ViewProbe,
}

impl FakeFactory {
    pub fn working() -> Self {
        Self {
            engine: Some(EngineHandle(0x51)),
            view: Some(ViewHandle(0x52)),
            consumes: Vec::new(),
            probe: ViewProbe::default(),
        }
    }

    pub fn consuming(mut self, id: u32, result: isize) -> Self {
        self.consumes.push((id, result));
        self
    }
}

impl ViewFactory for FakeFactory {
    type View = FakeView;

    fn create(&self, size: Size, project: &ProjectDescriptor) -> FakeView {
        self.probe
            .created
            .borrow_mut()
            .push((size, project.clone()));
        FakeView {
            engine: self.engine,
            view: self.view,
            consumes: self.consumes.clone(),
            probe: self.probe.clone(),
        }
    }
}
