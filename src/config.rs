use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, interpreter::value::core::Value};

/// Highest verbosity level understood by [`crate::logging::init_tracing`].
pub const MAX_VERBOSITY: u8 = 4;

/// Interpreter settings, read from a JSON file.
///
/// Every field is optional in the file.
///
/// # Example
/// ```
/// use nepa::config::Config;
///
/// let config: Config = serde_json::from_str(r#"{ "tolerante": true, "variables": { "n": 3 } }"#).unwrap();
/// assert!(config.tolerante);
/// assert_eq!(config.verbosidad, 0);
/// assert_eq!(config.globals()["n"].to_string(), "3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log verbosity, `0` to [`MAX_VERBOSITY`].
    pub verbosidad: u8,
    /// Run programs with parse errors, leaving the failing lines inert.
    pub tolerante:  bool,
    /// Extra directories searched for sub-programs.
    pub rutas:      Vec<PathBuf>,
    /// Values pre-seeded into the global scope.
    pub variables:  BTreeMap<String, serde_json::Value>,
}

impl Config {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    /// `Error::Config` when the file cannot be read, is not valid JSON or
    /// has an out-of-range verbosity.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let invalid = |details: String| Error::Config { path: path.to_path_buf(),
                                                        details };
        let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
        if config.verbosidad > MAX_VERBOSITY {
            return Err(invalid(format!("verbosidad {} fuera de rango (0 a {MAX_VERBOSITY})",
                                       config.verbosidad)));
        }
        Ok(config)
    }

    /// The configured variables as runtime values.
    #[must_use]
    pub fn globals(&self) -> BTreeMap<String, Value> {
        self.variables
            .iter()
            .map(|(name, json)| (name.clone(), Value::from_json(json)))
            .collect()
    }
}
