//! Configuration system
//!
//! Engine settings are plain serde structs. Any type implementing [`Config`] can
//! be loaded from or saved to `.toml` and `.ron` files.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Load configuration from file, falling back to defaults if it is missing
    fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        match Self::load_from_file(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
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

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Window configuration
    pub window: WindowConfig,

    /// Physics stepping configuration
    pub physics: PhysicsConfig,

    /// Main loop pacing configuration
    pub frame: FrameConfig,
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Check value ranges the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!("size {}x{} has a zero dimension", self.window.width, self.window.height),
            });
        }
        if !(self.physics.time_step.is_finite() && self.physics.time_step > 0.0) {
            return Err(ConfigError::Invalid {
                field: "physics.time_step",
                reason: format!("{} is not a positive number of seconds", self.physics.time_step),
            });
        }
        if !(self.frame.max_frame_delta.is_finite() && self.frame.max_frame_delta > 0.0) {
            return Err(ConfigError::Invalid {
                field: "frame.max_frame_delta",
                reason: format!("{} is not a positive number of seconds", self.frame.max_frame_delta),
            });
        }
        Ok(())
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width
    pub width: u32,

    /// Window height
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Kestrel Engine".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Physics stepping configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed integration step in seconds
    pub time_step: f32,

    /// Most integration steps run in a single frame
    pub max_steps_per_frame: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            max_steps_per_frame: 8,
        }
    }
}

/// Main loop pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound on the frame delta handed to subsystems, in seconds
    pub max_frame_delta: f32,

    /// Sleep between presents while the window is unfocused
    pub unfocused_sleep_ms: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: 0.25,
            unfocused_sleep_ms: 10,
        }
    }
}
