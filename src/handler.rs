// ── Message handler ───────────────────────────────────────────────────────────
//
// The window procedure calls into a `HandleMessage` object instead of a
// free function, so the handler owns its state and can be driven directly
// in tests.  Every message still gets default OS processing afterwards.

use crate::message::{Message, MessageKind};

/// What the window system should do after the handler has seen a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Nothing extra; default processing only.
    Forward,
    /// Post a quit message with this exit code, then default processing.
    PostQuit(i32),
}

/// Handles messages delivered to a window.
pub(crate) trait HandleMessage {
    fn handle(&mut self, message: &Message) -> Outcome;
}

/// Lifecycle of the main window as seen by its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleState {
    Running,
    /// Terminal.
    Destroyed,
}

/// Ends the application when the main window is destroyed.
#[derive(Debug)]
pub(crate) struct LifecycleHandler {
    state: LifecycleState,
}

impl LifecycleHandler {
    pub(crate) fn new() -> Self {
        Self {
            state: LifecycleState::Running,
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        self.state
    }
}

impl Default for LifecycleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleMessage for LifecycleHandler {
    fn handle(&mut self, message: &Message) -> Outcome {
        match (self.state, message.kind) {
            (LifecycleState::Running, MessageKind::Destroy) => {
                self.state = LifecycleState::Destroyed;
                log::debug!("main window destroyed, posting quit");
                Outcome::PostQuit(0)
            }
            _ => Outcome::Forward,
        }
    }
}
