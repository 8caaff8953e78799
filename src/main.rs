//! Borderless native Windows host for an embedded UI surface.
//!
//! The binary creates one top-level window, embeds a child view filling its client area and
//! replaces the system frame with a custom 32 px title-bar region: dragging there moves the
//! window, double-click maximizes, and pressing the max-button region of a maximized window
//! restores it and drags it under the cursor. The system is kept awake while the window lives.
//!
//! High-level flow:
//! 1. Parse CLI (geometry, bundle location, entrypoint args, verbosity).
//! 2. Initialize tracing from the flags or RUST_LOG.
//! 3. Create the host: base window, embedded view, plugin registration, borderless chrome.
//! 4. Run the Win32 message loop until the window closes or Ctrl+C posts WM_QUIT.
//! 5. Tear the host down (view, chrome brush, power request, window).

#![cfg_attr(not(windows), allow(dead_code))]

mod chrome;
mod cli;
mod engine;
mod error;
mod geometry;
mod host;
mod logging;
mod message;
mod power;
#[cfg(windows)]
mod surface;
#[cfg(test)]
mod testing;
mod window;
#[cfg(windows)]
mod winhost;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::Cli;
use engine::EngineHandle;
use logging::configure_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.log_level());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        ?cli,
        "starting hostframe"
    );

    run(&cli)
}

/// Called once with the engine of the freshly created view.
fn register_plugins(engine: EngineHandle) {
    info!(engine = engine.0, "registering plugins");
}

#[cfg(windows)]
fn run(cli: &Cli) -> Result<()> {
    use anyhow::Context;
    use windows::Win32::Foundation::{LPARAM, WPARAM};
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_QUIT};

    use host::WindowHost;
    use power::SystemPower;
    use surface::BlankSurfaceFactory;
    use winhost::{Win32Window, run_message_loop};

    let project = cli.project();
    let host = WindowHost::new(
        Win32Window::new(true),
        BlankSurfaceFactory,
        project,
        Box::new(register_plugins),
        SystemPower,
    );
    host.create(&cli.title, cli.origin(), cli.size())
        .context("failed to create host window")?;

    // Ctrl+C handler -> graceful quit (must post WM_QUIT to the UI thread, PostQuitMessage on the
    // handler thread is ineffective).
    let main_tid = unsafe { GetCurrentThreadId() };
    ctrlc::set_handler(move || {
        tracing::info!("Ctrl+C received, shutting down");
        unsafe {
            let _ = PostThreadMessageW(main_tid, WM_QUIT, WPARAM(0), LPARAM(0));
        }
    })
    .context("failed to install Ctrl+C handler")?;

    let result = run_message_loop();
    host.destroy();
    info!("host window closed");
    result
}

#[cfg(not(windows))]
fn run(_cli: &Cli) -> Result<()> {
    anyhow::bail!("hostframe requires Windows")
}
