//! Runtime settings, layered with the `config` crate.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `POOLWATCH_*` environment variables, then command-line overrides.
//!
//! ```toml
//! interval_ms = 250
//! scale = 1.5
//! alert = 0.9
//! warning = 0.8
//! grid_spacing = 20
//! orientation = "horizontal"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::data::Orientation;
use crate::monitor::{MonitorOptions, DEFAULT_GRID_SPACING};

/// Environment variable prefix, e.g. `POOLWATCH_INTERVAL_MS`.
pub const ENV_PREFIX: &str = "POOLWATCH";

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between reconciliation ticks.
    pub interval_ms: u64,
    /// Axis ceiling as a multiple of pool capacity.
    pub scale: f64,
    /// Alert cut point as a fraction of the axis ceiling.
    pub alert: Option<f64>,
    /// Warning cut point as a fraction of the axis ceiling.
    pub warning: Option<f64>,
    /// Grid spacing in sample units. 0 disables the grid.
    pub grid_spacing: u32,
    pub orientation: Orientation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            scale: 1.0,
            alert: None,
            warning: None,
            grid_spacing: DEFAULT_GRID_SPACING,
            orientation: Orientation::Vertical,
        }
    }
}

/// Values given explicitly on the command line. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interval_ms: Option<u64>,
    pub scale: Option<f64>,
    pub alert: Option<f64>,
    pub warning: Option<f64>,
    pub grid_spacing: Option<u32>,
    pub orientation: Option<Orientation>,
}

impl Settings {
    /// Resolve settings from every layer and validate the result.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(path, overrides, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, overrides: &Overrides, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder
            .add_source(env.try_parsing(true))
            .set_override_option("interval_ms", overrides.interval_ms)?
            .set_override_option("scale", overrides.scale)?
            .set_override_option("alert", overrides.alert)?
            .set_override_option("warning", overrides.warning)?
            .set_override_option("grid_spacing", overrides.grid_spacing.map(u64::from))?
            .set_override_option(
                "orientation",
                overrides.orientation.map(|o| o.as_str().to_string()),
            )?;

        let settings: Settings = builder
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the monitors cannot work with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.interval_ms > 0, "interval_ms must be greater than 0");
        ensure!(
            self.scale > 0.0 && self.scale.is_finite(),
            "scale must be a positive number, got {}",
            self.scale
        );
        for (name, fraction) in [("alert", self.alert), ("warning", self.warning)] {
            if let Some(f) = fraction {
                ensure!(f > 0.0 && f <= 1.0, "{name} must be within (0, 1], got {f}");
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Policy handed to the registry for every monitor.
    pub fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            scale: self.scale,
            alert: self.alert,
            warning: self.warning,
            grid_spacing: Some(self.grid_spacing).filter(|s| *s > 0),
            orientation: self.orientation,
        }
    }
}
