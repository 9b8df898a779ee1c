// src/constants.rs

/// El nombre del directorio de configuración de dis-cli (en ~/.config/).
pub const APP_DIR: &str = "dis-cli";

/// El nombre del archivo de configuración (dentro de APP_DIR).
pub const CONFIG_FILENAME: &str = "config.toml";

/// Variables de entorno que se consultan.
pub const NO_COLOR_ENV: &str = "NO_COLOR";
pub const COLUMNS_ENV: &str = "COLUMNS";
pub const PAGER_ENV: &str = "PAGER";

/// Intérprete que importa los objetivos si no se configura otro.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Script embebido (en `data/`) que se pasa al intérprete con `-c`.
pub const INSPECTOR_SCRIPT: &str = "inspector.py";

/// Paginador si no hay ni configuración ni `$PAGER`.
pub const DEFAULT_PAGER: &str = "less -R";

/// Filas de la terminal que se reservan antes de decidir paginar.
pub const PAGING_MARGIN: usize = 5;

/// Ancho cuando no se puede detectar la terminal ni leer COLUMNS.
pub const DEFAULT_WIDTH: usize = 80;

pub const DEFAULT_TAB_SIZE: usize = 4;

/// Separador entre la columna de código y la de instrucciones.
pub const COLUMN_SEPARATOR: &str = " │ ";

/// Cabeceras de la tabla de instrucciones.
pub const INSTRUCTION_HEADERS: [&str; 3] = ["OFF", "OPERATION", "ARGS"];
