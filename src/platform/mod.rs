// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface that the rest of the codebase uses to
// talk to the OS windowing subsystem.  No `unsafe` lives here; all Win32 FFI
// is confined to the `win32` sub-module and never leaks outward.

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod scripted;

use crate::{
    config::{Background, PumpMode, WindowConfig},
    error::Result,
    handler::HandleMessage,
    message::{Message, WindowHandle},
};

// ── Window class ──────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Class styles.  Bit values match the native `CS_*` constants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ClassStyle: u32 {
        /// Redraw the whole window when the height changes.
        const VREDRAW = 0x0001;
        /// Redraw the whole window when the width changes.
        const HREDRAW = 0x0002;
    }
}

/// Where the class icon comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IconSource {
    /// Icon resource bundled in the executable, by numeric id.
    Resource(u16),
    /// The system's generic application icon.
    Stock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cursor {
    Arrow,
}

/// Template of default attributes registered once, then referenced by name.
pub(crate) struct WindowClassDescriptor {
    pub(crate) class_name: String,
    pub(crate) style: ClassStyle,
    pub(crate) icon: IconSource,
    pub(crate) cursor: Cursor,
    pub(crate) background: Background,
    /// Moved into the window system on registration.
    pub(crate) handler: Box<dyn HandleMessage>,
}

impl WindowClassDescriptor {
    pub(crate) fn new(config: &WindowConfig, handler: Box<dyn HandleMessage>) -> Self {
        Self {
            class_name: config.class_name.clone(),
            style: ClassStyle::HREDRAW | ClassStyle::VREDRAW,
            icon: config
                .icon_resource
                .map_or(IconSource::Stock, IconSource::Resource),
            cursor: Cursor::Arrow,
            background: config.background,
            handler,
        }
    }
}

// ── Window instance ───────────────────────────────────────────────────────────

/// Creation request for the single overlapped top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowSpec<'a> {
    pub(crate) class_name: &'a str,
    pub(crate) title: &'a str,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl<'a> From<&'a WindowConfig> for WindowSpec<'a> {
    fn from(config: &'a WindowConfig) -> Self {
        Self {
            class_name: &config.class_name,
            title: &config.title,
            width: config.width,
            height: config.height,
        }
    }
}

// ── OS boundary ───────────────────────────────────────────────────────────────

/// Everything the application needs from the host windowing subsystem.
///
/// All calls happen on the thread that created the implementor.
pub(crate) trait WindowSystem {
    /// Register a window class.  Must precede `create_window` for that class.
    fn register_class(&mut self, class: WindowClassDescriptor) -> Result<()>;

    /// Create a window from a registered class.  Not shown yet.
    fn create_window(&mut self, spec: &WindowSpec<'_>) -> Result<WindowHandle>;

    /// Make `window` visible with default show semantics.
    fn show_window(&mut self, window: WindowHandle);

    /// Remove the next message from the thread queue.
    ///
    /// `PumpMode::Wait` blocks and always yields `Some`.  `PumpMode::Poll`
    /// returns `None` when the queue is empty.
    fn next_message(&mut self, mode: PumpMode) -> Result<Option<Message>>;

    /// Platform-mandated input translation (key-down to character messages).
    fn translate(&mut self, message: &Message);

    /// Route `message` to the handler of its target window.
    fn dispatch(&mut self, message: &Message);

    /// Blocking modal alert.
    fn alert(&mut self, text: &str);
}

/// The window system for the host OS.
#[cfg(windows)]
pub(crate) fn native() -> Result<Box<dyn WindowSystem>> {
    Ok(Box::new(win32::Win32System::new()?))
}

/// The window system for the host OS.
#[cfg(not(windows))]
pub(crate) fn native() -> Result<Box<dyn WindowSystem>> {
    Err(crate::error::JankError::Unsupported)
}
