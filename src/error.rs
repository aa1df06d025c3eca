// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in JANK return `error::Result<T>`.  No panics in
// production paths; errors surface as a single modal alert (see
// `app::report_failure`) and a stage-specific process exit code.

use std::path::PathBuf;

/// Every error that JANK can produce.
#[derive(Debug, thiserror::Error)]
pub(crate) enum JankError {
    /// A standard I/O error (config file read, executable path lookup, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file exists but is not valid JSON for `AppConfig`.
    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The config parsed but holds values the window system cannot accept.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// The window class could not be registered.
    #[error("Failed to register the window class (error {code:#010x})")]
    RegisterClass { code: u32 },

    /// No window instance could be created from the registered class.
    #[error("Failed to create a Window.. (error {code:#010x})")]
    CreateWindow { code: u32 },

    /// Retrieving the next message from the thread queue failed.
    #[error("Failed to retrieve the next message (error {code:#010x})")]
    MessageQueue { code: u32 },

    /// This build has no native window system for the host OS.
    #[error("no native window system is available on this platform")]
    Unsupported,
}

impl JankError {
    /// Process exit code for a run that ended with this error.
    ///
    /// Distinct from the normal-quit code (0) so that launchers and scripts
    /// can tell a failed start from a clean close.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Win32 { .. } | Self::Unsupported => 1,
            Self::Config { .. } | Self::InvalidConfig(_) => 2,
            Self::RegisterClass { .. } => 3,
            Self::CreateWindow { .. } => 4,
            Self::MessageQueue { .. } => 5,
        }
    }
}

// Convert a windows-crate error (HRESULT) directly into a JankError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for JankError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, JankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_codes_never_collide_with_clean_quit() {
        let errors = [
            JankError::Io(std::io::Error::other("boom")),
            JankError::InvalidConfig("width".to_owned()),
            JankError::Win32 { function: "LoadCursorW", code: 5 },
            JankError::RegisterClass { code: 1410 },
            JankError::CreateWindow { code: 1407 },
            JankError::MessageQueue { code: 1400 },
            JankError::Unsupported,
        ];
        for e in &errors {
            assert_ne!(e.exit_code(), 0, "{e} must not exit with the success code");
        }
    }

    #[test]
    fn startup_stages_have_distinct_codes() {
        let register = JankError::RegisterClass { code: 0 }.exit_code();
        let create = JankError::CreateWindow { code: 0 }.exit_code();
        let pump = JankError::MessageQueue { code: 0 }.exit_code();
        let config = JankError::InvalidConfig(String::new()).exit_code();
        assert_eq!((config, register, create, pump), (2, 3, 4, 5));
    }

    #[test]
    fn create_window_message_keeps_alert_text() {
        let text = JankError::CreateWindow { code: 0x57 }.to_string();
        assert!(text.starts_with("Failed to create a Window.."), "{text}");
        assert!(text.contains("0x00000057"), "{text}");
    }
}
