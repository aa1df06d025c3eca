// ── Message pump ──────────────────────────────────────────────────────────────
//
// Retrieve → translate → dispatch, one message at a time, on the thread that
// owns the window.  Quit is checked right after retrieval and is never
// dispatched.

use crate::{config::PumpMode, error::Result, platform::WindowSystem};

/// How the pump ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PumpReport {
    /// Code carried by the quit message.
    pub(crate) exit_code: i32,
    /// Messages dispatched before quit.
    pub(crate) dispatched: u64,
}

/// Drive `system` until a quit message is retrieved.
pub(crate) fn run<S>(system: &mut S, mode: PumpMode) -> Result<PumpReport>
where
    S: WindowSystem + ?Sized,
{
    let mut dispatched = 0u64;

    loop {
        let Some(message) = system.next_message(mode)? else {
            // Poll mode, empty queue.  Give the time slice back rather than
            // spinning on the queue.
            std::thread::yield_now();
            continue;
        };

        if message.is_quit() {
            log::debug!("quit retrieved after {dispatched} messages");
            return Ok(PumpReport {
                exit_code: message.exit_code(),
                dispatched,
            });
        }

        system.translate(&message);
        system.dispatch(&message);
        dispatched += 1;
    }
}
