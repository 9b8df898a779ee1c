// src/core/config.rs

use crate::config as global_paths;
use crate::constants::{DEFAULT_PAGER, NO_COLOR_ENV, PAGER_ENV};
use crate::models::{ColorChoice, ConfigFile, DisplayMode};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error de Ficheros en '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error al parsear TOML en '{path}': {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Error al serializar a formato TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Error de rutas: {0}")]
    Path(String),
    #[error("El archivo de configuración '{0}' no existe.")]
    NotFound(String),
    #[error("El archivo de configuración '{0}' ya existe; no se sobrescribe.")]
    AlreadyExists(String),
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Valores que llegan desde la línea de comandos; `None` deja decidir al archivo.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub mode: Option<DisplayMode>,
    pub source: Option<bool>,
    pub instructions: Option<bool>,
    pub color: Option<bool>,
    pub width: Option<usize>,
    pub line_numbers: Option<bool>,
    pub extra_paths: Vec<PathBuf>,
    pub isolated: bool,
    pub paging: Option<bool>,
}

/// Representa la vista fusionada de los valores por defecto, el archivo y la CLI.
/// El resto del programa interactuará con esta struct.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub mode: DisplayMode,
    pub color: bool,
    /// Ancho explícito; si falta, se detecta la terminal.
    pub width: Option<usize>,
    pub line_numbers: bool,
    pub tab_size: usize,
    /// Intérprete que importa los objetivos.
    pub interpreter: String,
    /// Raíces que se anteponen a `sys.path`: primero las de `--path`,
    /// luego las del archivo.
    pub roots: Vec<PathBuf>,
    /// El intérprete ignora `PYTHONPATH` y el resto de su entorno.
    pub isolated: bool,
    /// `None` pagina sólo si la salida no cabe en la terminal.
    pub paging: Option<bool>,
    /// Comando del paginador, partido por espacios al ejecutarlo.
    pub pager: String,
}

/// Carga el archivo de configuración. Con `--isolated` se ignora por completo;
/// el archivo por defecto puede no existir, uno explícito sí debe existir.
pub fn load_config_file(explicit: Option<&Path>, isolated: bool) -> ConfigResult<ConfigFile> {
    if isolated {
        log::debug!("Modo aislado: se ignora el archivo de configuración.");
        return Ok(ConfigFile::default());
    }
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            path.to_path_buf()
        }
        None => {
            let path = global_paths::get_config_path().map_err(ConfigError::Path)?;
            if !path.is_file() {
                return Ok(ConfigFile::default());
            }
            path
        }
    };
    log::info!("Cargando configuración desde: {:?}", path);
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.display().to_string(),
        source,
    })
}

/// Fusiona archivo y CLI. La CLI siempre tiene prioridad.
pub fn resolve_config(file: ConfigFile, overrides: &ConfigOverrides, stdout_is_tty: bool) -> ResolvedConfig {
    let display = file.display;
    let python = file.python;

    let mode = overrides
        .mode
        .unwrap_or(display.mode)
        .with_overrides(overrides.source, overrides.instructions);

    let color = overrides.color.unwrap_or_else(|| match display.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => stdout_is_tty && std::env::var_os(NO_COLOR_ENV).is_none(),
    });

    ResolvedConfig {
        mode,
        color,
        width: overrides.width.or(display.width).filter(|w| *w > 0),
        line_numbers: overrides.line_numbers.unwrap_or(display.line_numbers),
        tab_size: display.tab_size.max(1),
        interpreter: python.interpreter,
        roots: overrides
            .extra_paths
            .iter()
            .cloned()
            .chain(python.search_paths.iter().map(|p| global_paths::expand_home(p)))
            .collect(),
        isolated: overrides.isolated,
        paging: overrides.paging,
        pager: pick_pager(display.pager, std::env::var(PAGER_ENV).ok()),
    }
}

/// El del archivo, luego `$PAGER`, luego `less -R`. Los vacíos no cuentan.
fn pick_pager(configured: Option<String>, env: Option<String>) -> String {
    configured
        .into_iter()
        .chain(env)
        .find(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PAGER.to_string())
}

/// Escribe un `config.toml` con los valores por defecto y devuelve su ruta.
pub fn init_config_file(explicit: Option<&Path>) -> ConfigResult<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => global_paths::get_config_path().map_err(ConfigError::Path)?,
    };
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.display().to_string()));
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.display().to_string(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(&ConfigFile::default())?;
    fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Configuración por defecto escrita en {:?}", path);
    Ok(path)
}
