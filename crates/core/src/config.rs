//! Layered configuration for the dataset builder.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (current-directory paths, 600 s horizon)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `LOB_DS_`, nested with `__`)
//!
//! CLI flags are applied on top by the binary after loading.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

// ── Default value functions ────────────────────────────────────────────

/// Default forward labeling horizon: 600 s (10 minutes).
fn default_horizon_secs() -> u32 {
    600
}

/// Default zero-price handling: substitute with the day mean.
fn default_substitute_zero_prices() -> bool {
    true
}

/// Default input-file year component.
fn default_year() -> u32 {
    2014
}

/// Default worker threads: 0 lets rayon size its pool.
fn default_threads() -> usize {
    0
}

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level application configuration.
///
/// Aggregates data locations, feature-computation parameters, and
/// runtime settings into a single loadable unit.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Input/output locations and file-name parameters.
    pub data: DataConfig,
    /// Feature and label computation parameters.
    pub features: FeatureConfig,
    /// Batch-run runtime settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Data location configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory containing the raw `order_book_3_*.csv` day files.
    pub input_dir: PathBuf,
    /// Directory where the `_UP` / `_DOWN` matrices are written.
    pub output_dir: PathBuf,
    /// Year component of the day-file naming convention.
    #[serde(default = "default_year")]
    pub year: u32,
}

/// Feature and label computation parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureConfig {
    /// Forward-looking labeling window, in seconds.
    #[serde(default = "default_horizon_secs")]
    pub horizon_secs: u32,
    /// Replace zero ask prices with the day mean before computing rise
    /// ratios. When `false`, a zero baseline price is a hard error.
    #[serde(default = "default_substitute_zero_prices")]
    pub substitute_zero_prices: bool,
}

/// Batch-run runtime settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Worker threads for the day-level parallel run. 0 = rayon default.
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults.
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `LOB_DS_` and `__`
    ///    as the nesting separator
    ///    (e.g., `LOB_DS_FEATURES__HORIZON_SECS=300`).
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("data.input_dir", "./data")?
            .set_default("data.output_dir", "./out")?
            .set_default("data.year", 2014i64)?
            .set_default("features.horizon_secs", 600i64)?
            .set_default("features.substitute_zero_prices", true)?
            .set_default("runtime.threads", 0i64)?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides (LOB_DS_ prefix) ────────────
        // The prefix separator must be set explicitly to `_` because the
        // `config` crate defaults it to the nesting separator when one
        // is provided.
        builder = builder.add_source(
            Environment::with_prefix("LOB_DS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// The horizon must fit inside the afternoon session half, and the
    /// year must be plausible for the day-file naming convention. Run
    /// by [`AppConfig::load`], and again by callers that mutate the
    /// config afterwards (CLI overrides).
    pub fn validate(&self) -> Result<()> {
        if self.features.horizon_secs == 0 || self.features.horizon_secs > 10_800 {
            bail!(
                "features.horizon_secs must be in [1, 10800], got {}",
                self.features.horizon_secs
            );
        }
        if self.data.year < 1970 {
            bail!("data.year must be >= 1970, got {}", self.data.year);
        }
        Ok(())
    }
}
