// ── Startup configuration ─────────────────────────────────────────────────────
//
// One `AppConfig` is built at startup and passed by reference through
// registration, creation and the message pump.  There is no global mutable
// state.  Values come from `jank.json` beside the executable when present,
// otherwise from the built-in defaults below.
// No `unsafe` — pure safe Rust + serde_json.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{JankError, Result};

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Name the window class is registered (and later found) under.
pub(crate) const DEFAULT_CLASS_NAME: &str = "JANK WindowClass";

/// Title bar text.
pub(crate) const DEFAULT_TITLE: &str = "JANK WindowTitle";

/// Default window width in logical units.
pub(crate) const DEFAULT_WIDTH: i32 = 1366;

/// Default window height in logical units.
pub(crate) const DEFAULT_HEIGHT: i32 = 768;

/// Resource id of the application icon bundled with the executable.
pub(crate) const DEFAULT_ICON_RESOURCE: u16 = 101;

/// Longest class name / title accepted, in UTF-16 code units.
pub(crate) const MAX_NAME_LEN: usize = 256;

/// File looked up next to the executable.
pub(crate) const CONFIG_FILE_NAME: &str = "jank.json";

// ── Types ─────────────────────────────────────────────────────────────────────

/// How the message pump waits for input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PumpMode {
    /// Block until the next message arrives.
    #[default]
    Wait,
    /// Return immediately when the queue is empty and yield the time slice.
    Poll,
}

/// What the window class paints behind the client area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Background {
    /// Null brush: the background is never erased automatically.
    #[default]
    Null,
    /// Stock white brush.
    White,
}

/// Attributes of the single top-level window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WindowConfig {
    pub(crate) class_name: String,
    pub(crate) title: String,
    pub(crate) width: i32,
    pub(crate) height: i32,
    /// `None` uses the stock application icon.
    pub(crate) icon_resource: Option<u16>,
    pub(crate) background: Background,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            icon_resource: Some(DEFAULT_ICON_RESOURCE),
            background: Background::Null,
        }
    }
}

/// Root of the JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) window: WindowConfig,
    pub(crate) pump: PumpMode,
}

impl AppConfig {
    /// Parse and validate a config from JSON text.  `path` is only used to
    /// label errors.
    pub(crate) fn from_json(text: &str, path: &Path) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|source| JankError::Config {
            path: path.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`.  A missing file yields the defaults; anything else that
    /// goes wrong is an error.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                log::info!("loading config from {}", path.display());
                Self::from_json(&text, path)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check the values against what the window system accepts.
    pub(crate) fn validate(&self) -> Result<()> {
        let w = &self.window;
        if w.class_name.is_empty() {
            return Err(JankError::InvalidConfig("class_name must not be empty".to_owned()));
        }
        if w.class_name.encode_utf16().count() > MAX_NAME_LEN {
            return Err(JankError::InvalidConfig(format!(
                "class_name is longer than {MAX_NAME_LEN} characters"
            )));
        }
        if w.title.encode_utf16().count() > MAX_NAME_LEN {
            return Err(JankError::InvalidConfig(format!(
                "title is longer than {MAX_NAME_LEN} characters"
            )));
        }
        // Win32 takes these as null-terminated strings; an interior NUL would
        // silently cut them short.
        for (field, value) in [("class_name", &w.class_name), ("title", &w.title)] {
            if value.contains('\0') {
                return Err(JankError::InvalidConfig(format!(
                    "{field} must not contain NUL characters"
                )));
            }
        }
        if w.width <= 0 || w.height <= 0 {
            return Err(JankError::InvalidConfig(format!(
                "window size must be positive, got {}x{}",
                w.width, w.height
            )));
        }
        Ok(())
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the config file: `<exe dir>\jank.json`.
pub(crate) fn config_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load the config that sits beside the running executable.
pub(crate) fn load() -> Result<AppConfig> {
    AppConfig::load_from(&config_path()?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
