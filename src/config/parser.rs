use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;
use toml::Value;

/// Settings that may be absent from the file and are cleared with an empty value
const OPTIONAL_KEYS: [&str; 3] = ["browser.executable", "auth.username", "auth.password"];

/// Loads and parses a configuration file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use job_harvest::config::load_config;
///
/// let config = load_config(Path::new("job-harvest.toml")).unwrap();
/// println!("Detail level: {}", config.crawler.detail_level);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration, creating the file with defaults when it does not exist
pub fn load_or_init(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    let config = Config::default();
    save_config(path, &config)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(config)
}

/// Writes the configuration back to disk
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    validate(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Updates one `section.key` setting from its textual form
///
/// The value is coerced to the type the setting already has. The config is
/// only modified when the updated whole still validates.
///
/// # Arguments
///
/// * `config` - The configuration to update
/// * `key` - Dotted setting name, e.g. `crawler.detail-level`
/// * `value` - New value; empty clears an optional setting
///
/// # Returns
///
/// * `Ok(())` - The setting was applied
/// * `Err(ConfigError::UnknownKey)` - No such setting
/// * `Err(ConfigError::InvalidValue)` - The value has the wrong type
/// * `Err(ConfigError::Validation)` or `Err(ConfigError::InvalidUrl)` - The resulting configuration is invalid
pub fn set_setting(config: &mut Config, key: &str, value: &str) -> Result<(), ConfigError> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let mut document = Value::try_from(&*config)?;
    let table = document
        .get_mut(section)
        .and_then(Value::as_table_mut)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

    let optional = OPTIONAL_KEYS.contains(&key);
    let current = table.get(field);
    if current.is_none() && !optional {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    match coerce(key, current, value, optional)? {
        Some(new_value) => {
            table.insert(field.to_string(), new_value);
        }
        None => {
            table.remove(field);
        }
    }

    let updated: Config = document
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.message().to_string(),
        })?;
    validate(&updated)?;

    *config = updated;
    Ok(())
}

/// Converts `raw` into a TOML value of the same kind as `current`
///
/// Returns `None` when an optional setting is being cleared.
fn coerce(
    key: &str,
    current: Option<&Value>,
    raw: &str,
    optional: bool,
) -> Result<Option<Value>, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let raw = raw.trim();

    match current {
        _ if optional && raw.is_empty() => Ok(None),
        None | Some(Value::String(_)) => Ok(Some(Value::String(raw.to_string()))),
        Some(Value::Boolean(_)) => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Some(Value::Boolean(true))),
            "false" | "no" | "off" | "0" => Ok(Some(Value::Boolean(false))),
            _ => Err(invalid(format!("expected a boolean, got '{}'", raw))),
        },
        Some(Value::Integer(_)) => raw
            .parse::<i64>()
            .map(|n| Some(Value::Integer(n)))
            .map_err(|_| invalid(format!("expected an integer, got '{}'", raw))),
        Some(other) => Err(invalid(format!(
            "cannot set a {} value from the command line",
            other.type_str()
        ))),
    }
}
