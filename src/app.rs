// ── Application lifecycle ─────────────────────────────────────────────────────
//
// Registration → creation → display → message pump, composed over any
// `WindowSystem`.  The config is built once in `main` and passed down by
// reference; nothing here touches global state.

use crate::{
    config::AppConfig,
    error::{JankError, Result},
    handler::LifecycleHandler,
    platform::{WindowClassDescriptor, WindowSpec, WindowSystem},
    pump::{self, PumpReport},
};

/// Register the window class, create and show the main window, then pump
/// messages until the window is destroyed.
pub(crate) fn run<S>(system: &mut S, config: &AppConfig) -> Result<PumpReport>
where
    S: WindowSystem + ?Sized,
{
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    let class = WindowClassDescriptor::new(&config.window, Box::new(LifecycleHandler::new()));
    system.register_class(class)?;
    log::debug!("registered window class {:?}", config.window.class_name);

    let window = system.create_window(&WindowSpec::from(&config.window))?;
    system.show_window(window);

    log::info!(
        "window {:?} shown ({}x{})",
        config.window.title,
        config.window.width,
        config.window.height
    );
    #[cfg(debug_assertions)]
    log::debug!("window visible in {:.1} ms", t0.elapsed().as_secs_f64() * 1000.0);

    let report = pump::run(system, config.pump)?;
    log::info!(
        "message pump stopped after {} messages, exit code {}",
        report.dispatched,
        report.exit_code
    );
    Ok(report)
}

/// Run the application and turn the result into a process exit code.
pub(crate) fn launch<S>(system: &mut S, config: &AppConfig) -> i32
where
    S: WindowSystem + ?Sized,
{
    match run(system, config) {
        Ok(report) => report.exit_code,
        Err(e) => report_failure(system, &e),
    }
}

/// Log `error`, show it once as a modal alert, and return its exit code.
pub(crate) fn report_failure<S>(system: &mut S, error: &JankError) -> i32
where
    S: WindowSystem + ?Sized,
{
    log::error!("{error}");
    system.alert(&error.to_string());
    error.exit_code()
}
