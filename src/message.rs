// ── Queue messages ────────────────────────────────────────────────────────────
//
// Platform-neutral view of what the OS hands back from the thread message
// queue.  The Win32 backend converts raw `MSG` records into these.

use std::num::NonZeroUsize;

/// Opaque identifier of an OS-owned window.
///
/// Never null: a failed creation is an error value, not a zero handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WindowHandle(NonZeroUsize);

impl WindowHandle {
    /// Wrap a raw handle value.  Returns `None` for the null handle.
    pub(crate) fn from_raw(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    pub(crate) fn as_raw(self) -> usize {
        self.0.get()
    }
}

/// The message kinds the application distinguishes.  Everything else is
/// carried through untouched as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageKind {
    Create,
    Destroy,
    Quit,
    /// Any other message, by raw identifier.
    Other(u32),
}

/// One record pulled from the queue.  Consumed right after retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Message {
    pub(crate) kind: MessageKind,
    /// `None` for thread messages that target no window.
    pub(crate) window: Option<WindowHandle>,
    pub(crate) param1: usize,
    pub(crate) param2: isize,
}

impl Message {
    /// A parameterless message for `window`.
    pub(crate) fn new(kind: MessageKind, window: Option<WindowHandle>) -> Self {
        Self {
            kind,
            window,
            param1: 0,
            param2: 0,
        }
    }

    /// The thread-level quit message carrying `exit_code`.
    pub(crate) fn quit(exit_code: i32) -> Self {
        Self {
            kind: MessageKind::Quit,
            window: None,
            // Sign-extended like WPARAM; `pump` truncates back to i32.
            param1: exit_code as isize as usize,
            param2: 0,
        }
    }

    pub(crate) fn is_quit(&self) -> bool {
        self.kind == MessageKind::Quit
    }

    /// The exit code a quit message carries.
    pub(crate) fn exit_code(&self) -> i32 {
        self.param1 as i32
    }
}
