// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

use crate::core::config::ConfigOverrides;
use crate::models::DisplayMode;

#[derive(Parser, Debug, Default)]
#[command(
    name = "dis",
    author,
    version,
    about = "dis: muestra el código fuente de una función Python junto a sus instrucciones compiladas.",
    long_about = None
)]
pub struct Cli {
    /// Rutas con puntos a inspeccionar (p. ej. 'json.dumps').
    pub targets: Vec<String>,

    /// Qué mostrar: ambos paneles, sólo la fuente o sólo las instrucciones.
    #[arg(short, long, value_enum)]
    pub mode: Option<DisplayMode>,

    /// Mostrar el código fuente.
    #[arg(long, overrides_with = "no_source")]
    pub source: bool,
    /// Ocultar el código fuente.
    #[arg(long, overrides_with = "source")]
    pub no_source: bool,

    /// Mostrar las instrucciones.
    #[arg(long, overrides_with = "no_instructions")]
    pub instructions: bool,
    /// Ocultar las instrucciones.
    #[arg(long, overrides_with = "instructions")]
    pub no_instructions: bool,

    /// Forzar colores (por defecto: sólo en terminal y sin NO_COLOR).
    #[arg(long, overrides_with = "no_color")]
    pub color: bool,
    /// Desactivar los colores.
    #[arg(long, overrides_with = "color")]
    pub no_color: bool,

    /// Ancho de salida en columnas.
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Numerar las líneas de código fuente.
    #[arg(long, overrides_with = "no_line_numbers")]
    pub line_numbers: bool,
    /// Sin números de línea.
    #[arg(long, overrides_with = "line_numbers")]
    pub no_line_numbers: bool,

    /// Paginar la salida siempre.
    #[arg(short = 'p', long, visible_alias = "pager", overrides_with = "no_paging")]
    pub paging: bool,
    /// No paginar nunca (por defecto se pagina si no cabe en la terminal).
    #[arg(short = 'P', long, alias = "no-pager", overrides_with = "paging")]
    pub no_paging: bool,

    /// Directorio que se antepone a sys.path (se puede repetir).
    #[arg(long = "path", value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Ignorar el archivo de configuración y el entorno de Python (PYTHONPATH...).
    #[arg(long)]
    pub isolated: bool,

    /// Archivo de configuración alternativo.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mostrar el árbol de miembros en lugar del código.
    #[arg(long)]
    pub tree: bool,

    /// Elegir un miembro de forma interactiva si el objetivo es un módulo o clase.
    #[arg(short = 'i', long)]
    pub pick: bool,

    /// Escribir un archivo de configuración con los valores por defecto y salir.
    #[arg(long)]
    pub init_config: bool,
}

/// `--x` da `Some(true)`, `--no-x` da `Some(false)` y ninguno deja decidir a la configuración.
fn paired(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mode: self.mode,
            source: paired(self.source, self.no_source),
            instructions: paired(self.instructions, self.no_instructions),
            color: paired(self.color, self.no_color),
            width: self.width,
            line_numbers: paired(self.line_numbers, self.no_line_numbers),
            extra_paths: self.paths.clone(),
            isolated: self.isolated,
            paging: paired(self.paging, self.no_paging),
        }
    }
}
