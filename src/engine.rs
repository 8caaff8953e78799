//! Embedded view collaborator.
//!
//! The host does not render anything itself. It asks a `ViewFactory` for a view sized to the
//! client area, parents the view's native window into the host window, and gives the view's
//! top-level handler the first look at every window message.

use std::path::{Path, PathBuf};

use crate::geometry::Size;
use crate::message::{Handled, RawMessage};

/// Handle to the running engine behind a view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub isize);

/// Native (child window) handle of a view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub isize);

/// Invoked exactly once after the view is constructed, with its engine handle.
pub type PluginRegistrar = Box<dyn Fn(EngineHandle)>;

pub trait EmbeddedView {
    fn engine(&self) -> Option<EngineHandle>;
    fn native_view(&self) -> Option<ViewHandle>;
    /// Pre-handler for top-level window messages. `Consumed` stops all further routing.
    fn handle_top_level_message(&self, msg: &RawMessage) -> Handled;
}

pub trait ViewFactory {
    type View: EmbeddedView + 'static;

    fn create(&self, size: Size, project: &ProjectDescriptor) -> Self::View;
}

/// Where the embedded runtime finds its bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub assets_dir: PathBuf,
    pub icu_data: PathBuf,
    pub aot_library: PathBuf,
    pub entrypoint_args: Vec<String>,
}

impl ProjectDescriptor {
    const DATA_DIR: &'static str = "data";
    const ASSETS_DIR: &'static str = "assets";
    const ICU_DATA: &'static str = "icudtl.dat";
    const AOT_LIBRARY: &'static str = "app.so";

    /// Standard bundle layout: `<root>/data/{assets, icudtl.dat, app.so}`.
    pub fn from_bundle_root(root: impl AsRef<Path>) -> Self {
        let data = root.as_ref().join(Self::DATA_DIR);
        Self {
            assets_dir: data.join(Self::ASSETS_DIR),
            icu_data: data.join(Self::ICU_DATA),
            aot_library: data.join(Self::AOT_LIBRARY),
            entrypoint_args: Vec::new(),
        }
    }

    pub fn with_entrypoint_args(mut self, args: Vec<String>) -> Self {
        self.entrypoint_args = args;
        self
    }

    /// Bundle paths that do not exist on disk.
    ///
    /// The AOT library is optional (debug bundles run from a snapshot), so it is not reported.
    pub fn missing_paths(&self) -> Vec<&Path> {
        [self.assets_dir.as_path(), self.icu_data.as_path()]
            .into_iter()
            .filter(|p| !p.exists())
            .collect()
    }
}
