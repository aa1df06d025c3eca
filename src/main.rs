// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod error;
mod handler;
mod message;
mod platform;
mod pump;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let code = match platform::native() {
        Ok(mut system) => match config::load() {
            Ok(config) => app::launch(system.as_mut(), &config),
            // Startup failed before the window existed.
            Err(e) => app::report_failure(system.as_mut(), &e),
        },
        Err(e) => {
            // No window system to show a dialog with; the log is all we have.
            log::error!("{e}");
            e.exit_code()
        }
    };

    log::info!("exiting with code {code}");
    std::process::exit(code);
}
