use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{CapacityError, Result};

/// Where the pipeline reads its inputs from and writes its output to.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub orp_codebook_file: String,
    pub district_codebook_file: String,
    pub capacities_file: String,
    pub output: PathBuf,
    pub log_dir: Option<PathBuf>,
}

/// On-disk shape of the optional TOML config. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    orp_codebook_file: Option<String>,
    district_codebook_file: Option<String>,
    capacities_file: Option<String>,
    output: Option<PathBuf>,
    log_dir: Option<PathBuf>,
}

/// Paths hang off the crate directory captured at build time, so a binary
/// copied to another machine still looks under the original build tree.
/// Pass `--data-dir`/`--output` or a config file to run it elsewhere.
impl Default for Config {
    fn default() -> Self {
        Self::with_base_dir(Path::new(constants::program_dir()))
    }
}

impl Config {
    /// Default layout: `<base>/data/*.csv` in, `<base>/public/capacities.json` out.
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            data_dir: base.join(constants::DATA_DIR),
            orp_codebook_file: constants::ORP_CODEBOOK_FILE.to_string(),
            district_codebook_file: constants::DISTRICT_CODEBOOK_FILE.to_string(),
            capacities_file: constants::CAPACITIES_FILE.to_string(),
            output: base.join(constants::OUTPUT_FILE),
            log_dir: None,
        }
    }

    /// Loads a TOML config on top of the defaults.
    ///
    /// Relative paths inside the file are resolved against the file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CapacityError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let file: ConfigFile = toml::from_str(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut config = Self::default();
        if let Some(dir) = file.data_dir {
            config.data_dir = base.join(dir);
        }
        if let Some(name) = file.orp_codebook_file {
            config.orp_codebook_file = name;
        }
        if let Some(name) = file.district_codebook_file {
            config.district_codebook_file = name;
        }
        if let Some(name) = file.capacities_file {
            config.capacities_file = name;
        }
        if let Some(output) = file.output {
            config.output = base.join(output);
        }
        config.log_dir = file.log_dir.map(|dir| base.join(dir));

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, name) in [
            ("orp_codebook_file", &self.orp_codebook_file),
            ("district_codebook_file", &self.district_codebook_file),
            ("capacities_file", &self.capacities_file),
        ] {
            if name.trim().is_empty() {
                return Err(CapacityError::Config(format!("'{}' must not be empty", key)));
            }
        }
        Ok(())
    }

    pub fn orp_codebook_path(&self) -> PathBuf {
        self.data_dir.join(&self.orp_codebook_file)
    }

    pub fn district_codebook_path(&self) -> PathBuf {
        self.data_dir.join(&self.district_codebook_file)
    }

    pub fn capacities_path(&self) -> PathBuf {
        self.data_dir.join(&self.capacities_file)
    }
}
