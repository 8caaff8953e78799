//! Command line interface and its conversion into runtime settings.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::engine::ProjectDescriptor;
use crate::geometry::{Point, Size};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(
    version,
    about = concat!(
        env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"),
        " - Borderless native window hosting an embedded UI surface.",
    )
)]
pub struct Cli {
    /// Window title.
    #[arg(long, default_value = "hostframe")]
    pub title: String,
    /// Initial width in logical pixels (scaled for the monitor DPI).
    #[arg(long, default_value_t = 1280)]
    pub width: i32,
    /// Initial height in logical pixels (scaled for the monitor DPI).
    #[arg(long, default_value_t = 720)]
    pub height: i32,
    /// Initial left edge in logical pixels.
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub x: i32,
    /// Initial top edge in logical pixels.
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub y: i32,
    /// Application bundle root containing `data/`. Defaults to the executable's directory.
    #[arg(long)]
    pub bundle: Option<PathBuf>,
    /// Argument passed to the embedded entrypoint (repeatable).
    #[arg(long = "entrypoint-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub entrypoint_arg: Vec<String>,
    /// Increase verbosity (-v=debug, -vv=trace). Overrides RUST_LOG.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
    /// Quiet mode: only warnings and errors. Overrides -v and RUST_LOG.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Verbosity selected on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Warn,
    Debug,
    Trace,
}

impl Cli {
    /// `None` means no flag was given and `RUST_LOG` decides.
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.quiet {
            Some(LogLevel::Warn)
        } else if self.verbose > 1 {
            Some(LogLevel::Trace)
        } else if self.verbose == 1 {
            Some(LogLevel::Debug)
        } else {
            None
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Explicit `--bundle`, else the directory holding the executable, else the working directory.
    pub fn bundle_root(&self) -> PathBuf {
        if let Some(bundle) = &self.bundle {
            return bundle.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn project(&self) -> ProjectDescriptor {
        ProjectDescriptor::from_bundle_root(self.bundle_root())
            .with_entrypoint_args(self.entrypoint_arg.clone())
    }
}
