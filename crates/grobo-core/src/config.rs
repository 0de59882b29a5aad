//! Surface configuration.

use serde::{Deserialize, Serialize};

// ─── Input mode ───────────────────────────────────────────────────────────

/// Which family of native events pointer handlers bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    Touch,
    Mouse,
}

impl InputMode {
    pub fn from_touch_support(touch: bool) -> Self {
        if touch { Self::Touch } else { Self::Mouse }
    }
}

/// How a surface picks its [`InputMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputModePreference {
    /// Probe the environment once, when the surface is created.
    #[default]
    Auto,
    /// Always bind touch events.
    Touch,
    /// Always bind mouse events.
    Mouse,
}

impl InputModePreference {
    /// Resolve against the environment's current touch capability.
    /// `probe` is only called for `Auto`.
    pub fn resolve(self, probe: impl FnOnce() -> bool) -> InputMode {
        match self {
            Self::Auto => InputMode::from_touch_support(probe()),
            Self::Touch => InputMode::Touch,
            Self::Mouse => InputMode::Mouse,
        }
    }
}

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for `Surface::init`.
///
/// The input mode is fixed for the lifetime of the surface, so every
/// `off` detaches exactly the native sources its `on` attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceConfig {
    /// Default: **auto**.
    pub input_mode: InputModePreference,
}

impl SurfaceConfig {
    pub fn with_input_mode(input_mode: InputModePreference) -> Self {
        Self { input_mode }
    }
}
