use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::crypto::KdfParams;
use crate::error::Result;

const ENV_PREFIX: &str = "CYCLECAST";

/// Process-level settings. Per-user preferences live in the vault as
/// [`AppSettings`](crate::models::AppSettings).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Cycles forecast for a freshly initialized vault.
    pub forecast_cycles: u32,
    pub kdf: KdfParams,
}

impl Settings {
    /// Defaults, then the optional config file, then `CYCLECAST_*`
    /// environment variables (nested keys use `__`, e.g.
    /// `CYCLECAST_KDF__ITERATIONS`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = Self::builder(path)?
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    fn builder(path: Option<&Path>) -> Result<ConfigBuilder<DefaultState>> {
        let kdf = KdfParams::default();
        let mut builder = Config::builder()
            .set_default("log_level", "info")?
            .set_default("forecast_cycles", 5_i64)?
            .set_default("kdf.memory_kib", i64::from(kdf.memory_kib))?
            .set_default("kdf.iterations", i64::from(kdf.iterations))?
            .set_default("kdf.parallelism", i64::from(kdf.parallelism))?;

        if let Some(dir) = dirs::data_local_dir() {
            builder = builder.set_default("data_dir", dir.join("cyclecast").to_string_lossy().into_owned())?;
        }
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        Ok(builder)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
