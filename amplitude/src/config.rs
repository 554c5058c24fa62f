use std::path::Path;

use amplitude_core::AmplitudeError;
use amplitude_types::AmplitudeConfig;

/// Load a JSON configuration file.
///
/// Missing keys take their defaults. Relative folders are resolved against
/// the directory holding the file, and the analysis section is validated.
///
/// # Errors
/// `NotFound` if the file does not exist, `Io` if it cannot be read and
/// `Config` if it is not valid JSON for [`AmplitudeConfig`] or fails validation.
pub fn load_config(path: &Path) -> Result<AmplitudeConfig, AmplitudeError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AmplitudeError::not_found(format!("config file {}", path.display()))
        } else {
            AmplitudeError::io(path, e)
        }
    })?;
    let mut cfg: AmplitudeConfig = serde_json::from_str(&text)
        .map_err(|e| AmplitudeError::Config(format!("{}: {e}", path.display())))?;
    cfg.analysis.validate()?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    cfg.locations = cfg.locations.resolved_against(base);
    Ok(cfg)
}

/// Render a configuration as pretty JSON (e.g. to seed a new config file).
///
/// # Errors
/// Returns `Config` if serialization fails.
pub fn config_to_json(cfg: &AmplitudeConfig) -> Result<String, AmplitudeError> {
    serde_json::to_string_pretty(cfg).map_err(|e| AmplitudeError::Config(e.to_string()))
}
