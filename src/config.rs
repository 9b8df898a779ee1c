// src/config.rs

use std::path::PathBuf;

use crate::constants::{APP_DIR, CONFIG_FILENAME};

/// Devuelve la ruta al directorio de configuración de dis-cli.
/// No lo crea: sólo `--init-config` escribe en él.
pub fn get_config_dir() -> Result<PathBuf, String> {
    let config_path = dirs::config_dir()
        .ok_or("No se pudo encontrar el directorio de configuración del sistema.")?
        .join(APP_DIR);
    log::debug!("Directorio de config: {:?}", config_path);
    Ok(config_path)
}

/// Devuelve la ruta al archivo config.toml.
pub fn get_config_path() -> Result<PathBuf, String> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Expande `~` y `~/...` con el directorio personal del usuario.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
