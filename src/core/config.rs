//! Engine configuration
//!
//! Plain options struct handed to the engine at startup. It can be built in
//! code with the `with_*` methods or loaded from a RON or JSON file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use winit::keyboard::KeyCode;

/// How the fixed-step gate advances its reference time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedStepMode {
    /// Advance on an interval grid. The fixed delta always equals the interval
    /// and the step count over any span matches `floor(span / interval)`.
    Accumulate,
    /// Re-anchor to the current time on every step. The fixed delta is the
    /// real time since the previous step.
    Reanchor,
}

/// What the scheduler does after a lifecycle hook returns an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookErrorPolicy {
    /// Finish the failing phase, then stop the engine and return the errors
    Halt,
    /// Log the errors, report them in the frame report and keep going
    LogAndContinue,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Fixed-step interval in seconds
    pub fixed_step_secs: f64,
    /// Fixed-step gate behaviour
    pub fixed_step_mode: FixedStepMode,
    /// Upper bound of fixed steps run in one frame. Backlog beyond it is
    /// dropped, so after a long stall simulated time skips ahead.
    pub max_fixed_steps: u32,
    /// Reaction to failing lifecycle hooks
    pub hook_error_policy: HookErrorPolicy,
    /// Number of frames averaged for the frame-time readout
    pub frame_time_samples: usize,
    /// Show the debug overlay at startup
    pub show_debug: bool,
    /// Key that toggles the debug overlay
    pub debug_toggle_key: Option<KeyCode>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Vixeria"),
            width: 1280,
            height: 720,
            fixed_step_secs: 0.006,
            fixed_step_mode: FixedStepMode::Accumulate,
            max_fixed_steps: 5,
            hook_error_policy: HookErrorPolicy::Halt,
            frame_time_samples: 10,
            show_debug: cfg!(debug_assertions),
            debug_toggle_key: Some(KeyCode::Backquote),
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set window dimensions
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the fixed-step interval
    pub fn with_fixed_step(mut self, interval: Duration) -> Self {
        self.fixed_step_secs = interval.as_secs_f64();
        self
    }

    /// Set the fixed-step gate mode
    pub fn with_fixed_step_mode(mut self, mode: FixedStepMode) -> Self {
        self.fixed_step_mode = mode;
        self
    }

    /// Set how many fixed steps may run in one frame
    pub fn with_max_fixed_steps(mut self, steps: u32) -> Self {
        self.max_fixed_steps = steps;
        self
    }

    /// Set the hook error policy
    pub fn with_hook_error_policy(mut self, policy: HookErrorPolicy) -> Self {
        self.hook_error_policy = policy;
        self
    }

    /// Show or hide the debug overlay at startup
    pub fn with_debug(mut self, show: bool) -> Self {
        self.show_debug = show;
        self
    }

    /// Fixed-step interval as a [`Duration`]
    pub fn fixed_step(&self) -> Duration {
        Duration::try_from_secs_f64(self.fixed_step_secs).unwrap_or(Duration::ZERO)
    }

    /// Check values the engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-positive fixed step or an
    /// empty frame-time window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_step().is_zero() {
            return Err(ConfigError::Invalid(format!(
                "fixed_step_secs must be positive, got {}",
                self.fixed_step_secs
            )));
        }
        if self.frame_time_samples == 0 {
            return Err(ConfigError::Invalid(
                "frame_time_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid RON for this struct
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for this struct
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the format from the extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or fails to parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::from_ron_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save the config, choosing the format from the extension
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported file extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value the engine cannot run with
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.fixed_step(), Duration::from_millis(6));
        assert_eq!(config.fixed_step_mode, FixedStepMode::Accumulate);
        assert_eq!(config.max_fixed_steps, 5);
        assert_eq!(config.frame_time_samples, 10);
        assert_eq!(config.debug_toggle_key, Some(KeyCode::Backquote));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = EngineConfig::from_ron_str(
            "(title: \"Test\", fixed_step_secs: 0.01, hook_error_policy: LogAndContinue)",
        )
        .unwrap();
        assert_eq!(config.title, "Test");
        assert_eq!(config.fixed_step(), Duration::from_millis(10));
        assert_eq!(config.hook_error_policy, HookErrorPolicy::LogAndContinue);
        assert_eq!(config.width, 1280);
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");

        let config = EngineConfig::default()
            .with_title("Saved")
            .with_size(640, 480)
            .with_fixed_step_mode(FixedStepMode::Reanchor);
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.title, "Saved");
        assert_eq!(loaded.width, 640);
        assert_eq!(loaded.fixed_step_mode, FixedStepMode::Reanchor);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, "title: x").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_zero_step_is_invalid() {
        let result = EngineConfig::from_ron_str("(fixed_step_secs: 0.0)");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
