use std::{path::Path, sync::Arc};

use crate::arch::AMDArchitecture;

/// Static mutex holding the global configuration, initialized as `None`.
static MFMA_GLOBAL_CONFIG: spin::Mutex<Option<Arc<MfmaConfig>>> = spin::Mutex::new(None);

/// Configuration of the MFMA operand lowering.
///
/// Read from the `[mfma]` table of `cubecl.toml`, other tables of the file are ignored.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MfmaConfig {
    /// Target used when the caller doesn't provide an architecture, e.g. `gfx90a`.
    #[serde(default = "arch_default")]
    pub arch: String,

    /// Verify every computed offset lies inside the tile before reading shared memory.
    #[serde(default)]
    pub check_bounds: bool,

    /// Logging of the lowering.
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Logger settings, messages go through the `log` crate.
#[derive(Default, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub level: LoadLogLevel,
}

/// Verbosity of the operand load logs.
#[derive(
    Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum LoadLogLevel {
    /// Nothing is logged.
    #[default]
    #[serde(rename = "disabled")]
    Disabled,
    /// One message per operand load.
    #[serde(rename = "basic")]
    Basic,
    /// Also logs the wave and lane decomposition of each thread.
    #[serde(rename = "full")]
    Full,
}

impl LoadLogLevel {
    /// Parse the value of `CUBECL_MFMA_LOG`.
    pub fn parse(val: &str) -> Option<Self> {
        match val {
            "0" | "false" | "disabled" => Some(LoadLogLevel::Disabled),
            "1" | "true" | "basic" => Some(LoadLogLevel::Basic),
            "full" => Some(LoadLogLevel::Full),
            _ => None,
        }
    }
}

fn arch_default() -> String {
    "gfx90a".into()
}

impl Default for MfmaConfig {
    fn default() -> Self {
        Self {
            arch: arch_default(),
            check_bounds: false,
            logger: LoggerConfig::default(),
        }
    }
}

#[derive(Default, serde::Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mfma: MfmaConfig,
}

impl MfmaConfig {
    /// Retrieves the current global configuration, loading it from the current directory if not set.
    pub fn get() -> Arc<Self> {
        let mut state = MFMA_GLOBAL_CONFIG.lock();
        let config =
            state.get_or_insert_with(|| Arc::new(Self::from_current_dir().override_from_env()));

        config.clone()
    }

    /// Sets the global configuration to the provided value.
    ///
    /// # Panics
    /// Panics if the configuration has already been set or read, as it cannot be overridden.
    pub fn set(config: Self) {
        let mut state = MFMA_GLOBAL_CONFIG.lock();
        if state.is_some() {
            panic!("Cannot set the global configuration multiple times.");
        }
        *state = Some(Arc::new(config));
    }

    /// Parse the `[mfma]` table of a `cubecl.toml` file.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.mfma)
    }

    /// Overrides configuration fields based on environment variables.
    pub fn override_from_env(self) -> Self {
        self.override_with(|name| std::env::var(name).ok())
    }

    /// Overrides configuration fields with the values returned by `var` for
    /// `CUBECL_MFMA_ARCH` and `CUBECL_MFMA_LOG`.
    ///
    /// Unknown log levels leave the level unchanged.
    pub fn override_with(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = var("CUBECL_MFMA_ARCH") {
            self.arch = val;
        }

        if let Some(level) = var("CUBECL_MFMA_LOG").and_then(|val| LoadLogLevel::parse(&val)) {
            self.logger.level = level;
        }

        self
    }

    pub fn architecture(&self) -> AMDArchitecture {
        AMDArchitecture::parse(&self.arch)
    }

    // Loads configuration from `cubecl.toml` or `CubeCL.toml` in the current directory or its parents.
    fn from_current_dir() -> Self {
        let Ok(mut dir) = std::env::current_dir() else {
            return Self::default();
        };

        loop {
            for name in ["cubecl.toml", "CubeCL.toml"] {
                if let Some(config) = Self::from_file_path(dir.join(name)) {
                    return config;
                }
            }

            if !dir.pop() {
                break;
            }
        }

        Self::default()
    }

    fn from_file_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let content = std::fs::read_to_string(path.as_ref()).ok()?;
        match Self::from_toml(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                log::warn!(
                    "Ignoring malformed config file {}: {err}",
                    path.as_ref().display()
                );
                None
            }
        }
    }
}
