use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::MarkataConfig;
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{ConfigError, Result};
use crate::file;
use crate::ops::{self, ConfigResult};
use crate::persist;
use crate::resolve::{self, ResolveInput};
use crate::types::ConfigAction;
use crate::validate::{self, ValidationFinding};

/// Builder for loading layered markata-go configuration.
///
/// Every load starts from the compiled-in defaults, merges the requested
/// files on top and finishes with `MARKATA_GO_*` environment overrides.
///
/// ```no_run
/// use markata_go_config::ConfigLoader;
///
/// let config = ConfigLoader::new().search_dir("site").load_discovered()?;
/// println!("building into {}", config.output_dir);
/// # Ok::<(), markata_go_config::ConfigError>(())
/// ```
pub struct ConfigLoader {
    search_dir: Option<PathBuf>,
    env: Option<Box<dyn EnvSource>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader that searches the current directory and reads the process
    /// environment.
    pub fn new() -> Self {
        Self {
            search_dir: None,
            env: Some(Box::new(ProcessEnv)),
        }
    }

    /// Directory [`load_discovered`](Self::load_discovered) searches
    /// (default: the current working directory).
    pub fn search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    /// Read overrides from `env` instead of the process environment.
    pub fn env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Some(Box::new(env));
        self
    }

    /// Disable environment overrides entirely.
    pub fn no_env(mut self) -> Self {
        self.env = None;
        self
    }

    /// Load a single file over the defaults.
    pub fn load(&self, path: &Path) -> Result<MarkataConfig> {
        self.resolve_paths(&[path])
    }

    /// Load `base`, then each of `overrides` in order; later files win.
    ///
    /// An empty `base` path skips the base layer.
    pub fn load_with_merge(&self, base: &Path, overrides: &[PathBuf]) -> Result<MarkataConfig> {
        let mut paths: Vec<&Path> = Vec::with_capacity(overrides.len() + 1);
        if !base.as_os_str().is_empty() {
            paths.push(base);
        }
        paths.extend(overrides.iter().map(PathBuf::as_path));
        self.resolve_paths(&paths)
    }

    /// Load the config file found in the search directory, or the defaults
    /// when there is none.
    pub fn load_discovered(&self) -> Result<MarkataConfig> {
        let dir = self.effective_search_dir()?;
        match file::discover(&dir) {
            Some(source) => self.load(&source.path),
            None => self.resolve_paths(&[]),
        }
    }

    /// [`load_discovered`](Self::load_discovered), then validate the result.
    ///
    /// Findings are returned alongside the config; an error finding does not
    /// fail the load.
    pub fn load_validated(&self) -> Result<(MarkataConfig, Vec<ValidationFinding>)> {
        let config = self.load_discovered()?;
        let findings = validate::validate(&config);
        Ok((config, findings))
    }

    /// Run a [`ConfigAction`] against the config file at `file`.
    ///
    /// `Get` and `Set` address the file's own contents. `List` shows the fully
    /// resolved config, defaults and environment included.
    pub fn handle(&self, file: &Path, action: &ConfigAction) -> Result<ConfigResult> {
        match action {
            ConfigAction::Get { key } => {
                let value = persist::get_value_in_file(file, key)?;
                Ok(ConfigResult::KeyValue {
                    key: key.clone(),
                    value,
                })
            }
            ConfigAction::Set { key, value } => {
                let value = ops::parse_raw_value(value);
                persist::set_value_in_file(file, key, value.clone())?;
                Ok(ConfigResult::ValueSet {
                    key: key.clone(),
                    value,
                })
            }
            ConfigAction::List => {
                let config = self.load(file)?;
                ops::list_values(&config)
            }
        }
    }

    fn effective_search_dir(&self) -> Result<PathBuf> {
        match &self.search_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|e| ConfigError::io(".", e)),
        }
    }

    fn resolve_paths(&self, paths: &[&Path]) -> Result<MarkataConfig> {
        let files = paths
            .iter()
            .map(|path| -> Result<(PathBuf, Vec<u8>)> {
                Ok((path.to_path_buf(), file::read_file(path)?))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(files = files.len(), "loading configuration");
        resolve::resolve(ResolveInput {
            files,
            env: self.env.as_deref(),
        })
    }
}
