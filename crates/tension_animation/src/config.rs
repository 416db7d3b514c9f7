//! Named animations loaded from TOML
//!
//! ```toml
//! [animations.press]
//! kind = "snappy"
//! duration = 0.3
//! extra_bounce = 0.05
//!
//! [animations.fade]
//! kind = "timing"
//! duration = 0.2
//! curve = "ease_out"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::animation::Animation;
use crate::easing::Easing;

/// Errors produced while loading animation configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse animation config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize animation config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No animation named '{0}'")]
    UnknownAnimation(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A set of named animations (animations.toml)
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnimationConfig {
    #[serde(default)]
    pub animations: BTreeMap<String, AnimationSpec>,
}

/// One animation as written in a config file
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationSpec {
    Smooth {
        #[serde(default = "default_duration")]
        duration: f64,
        #[serde(default)]
        extra_bounce: f64,
    },
    Snappy {
        #[serde(default = "default_duration")]
        duration: f64,
        #[serde(default)]
        extra_bounce: f64,
    },
    Bouncy {
        #[serde(default = "default_duration")]
        duration: f64,
        #[serde(default)]
        extra_bounce: f64,
    },
    /// Retargetable spring from duration and bounce
    Spring {
        #[serde(default = "default_duration")]
        duration: f64,
        #[serde(default)]
        bounce: f64,
        #[serde(default)]
        blend_duration: f64,
    },
    /// Retargetable spring from response and damping fraction
    Fluid {
        #[serde(default = "default_duration")]
        response: f64,
        #[serde(default = "default_damping_fraction")]
        damping_fraction: f64,
        #[serde(default)]
        blend_duration: f64,
    },
    Interactive {
        #[serde(default = "default_interactive_response")]
        response: f64,
        #[serde(default = "default_interactive_damping_fraction")]
        damping_fraction: f64,
        #[serde(default = "default_interactive_blend_duration")]
        blend_duration: f64,
    },
    /// Analytic spring from physical parameters
    Interpolating {
        #[serde(default = "default_mass")]
        mass: f64,
        #[serde(default = "default_stiffness")]
        stiffness: f64,
        #[serde(default = "default_damping")]
        damping: f64,
        #[serde(default)]
        initial_velocity: f64,
    },
    Timing {
        #[serde(default = "default_timing_duration")]
        duration: f64,
        #[serde(default)]
        curve: Easing,
    },
}

fn default_duration() -> f64 {
    0.5
}

fn default_damping_fraction() -> f64 {
    0.825
}

fn default_interactive_response() -> f64 {
    0.15
}

fn default_interactive_damping_fraction() -> f64 {
    0.86
}

fn default_interactive_blend_duration() -> f64 {
    0.25
}

fn default_mass() -> f64 {
    1.0
}

fn default_stiffness() -> f64 {
    100.0
}

fn default_damping() -> f64 {
    20.0
}

fn default_timing_duration() -> f64 {
    0.35
}

impl AnimationSpec {
    pub fn to_animation(&self) -> Animation {
        match *self {
            AnimationSpec::Smooth {
                duration,
                extra_bounce,
            } => Animation::smooth_with(duration, extra_bounce),
            AnimationSpec::Snappy {
                duration,
                extra_bounce,
            } => Animation::snappy_with(duration, extra_bounce),
            AnimationSpec::Bouncy {
                duration,
                extra_bounce,
            } => Animation::bouncy_with(duration, extra_bounce),
            AnimationSpec::Spring {
                duration,
                bounce,
                blend_duration,
            } => Animation::spring_with(duration, bounce, blend_duration),
            AnimationSpec::Fluid {
                response,
                damping_fraction,
                blend_duration,
            } => Animation::spring_response(response, damping_fraction, blend_duration),
            AnimationSpec::Interactive {
                response,
                damping_fraction,
                blend_duration,
            } => {
                Animation::interactive_spring_response(response, damping_fraction, blend_duration)
            }
            AnimationSpec::Interpolating {
                mass,
                stiffness,
                damping,
                initial_velocity,
            } => Animation::interpolating_spring(mass, stiffness, damping, initial_velocity),
            AnimationSpec::Timing { duration, curve } => Animation::timing(duration, curve),
        }
    }
}

impl AnimationConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Build the animation registered under `name`
    pub fn animation(&self, name: &str) -> Result<Animation> {
        self.animations
            .get(name)
            .map(AnimationSpec::to_animation)
            .ok_or_else(|| ConfigError::UnknownAnimation(name.to_string()))
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: AnimationSpec) {
        self.animations.insert(name.into(), spec);
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
