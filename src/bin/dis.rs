// src/bin/dis.rs

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;

use dis_cli::cli::Cli;
use dis_cli::core::config::{ResolvedConfig, init_config_file, load_config_file, resolve_config};
use dis_cli::core::graph_display::{outline, render_outline};
use dis_cli::core::inspector::Interpreter;
use dis_cli::core::target_path::TargetPath;
use dis_cli::core::{context_resolver, extractor, resolver};
use dis_cli::render::{self, RenderOptions, terminal};
use dis_cli::system::io::{page, should_page, write_stdout};

/// El punto de entrada principal de la aplicación.
fn main() {
    // Para ver los logs, ejecuta con `RUST_LOG=debug dis ...`
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        eprintln!("\nError: {:?}", e);
        std::process::exit(1);
    }
}

/// El despachador principal de la aplicación.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    if cli.init_config {
        let path = init_config_file(cli.config.as_deref())?;
        println!("✔ Configuración por defecto escrita en {}", path.display());
        return Ok(());
    }

    // Sin objetivos se muestra la ayuda, como `dis` sin argumentos.
    if cli.targets.is_empty() {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    let stdout_is_tty = std::io::stdout().is_terminal();
    let file = load_config_file(cli.config.as_deref(), cli.isolated)?;
    let config = resolve_config(file, &cli.overrides(), stdout_is_tty);
    log::debug!("Configuración resuelta: {:?}", config);

    let interpreter = Interpreter::new(&config.interpreter, config.roots.clone(), config.isolated);
    let options = RenderOptions {
        mode: config.mode,
        width: terminal::detect_width(config.width),
        line_numbers: config.line_numbers,
        tab_size: config.tab_size,
    };

    // Todo se genera antes de escribir: un fallo no deja salida a medias.
    let mut text = String::new();
    for (n, target) in cli.targets.iter().enumerate() {
        if n > 0 {
            text.push('\n');
        }
        text.push_str(&render_target(&cli, &config, &interpreter, &options, target)?);
    }

    let line_count = text.lines().count();
    if should_page(config.paging, stdout_is_tty, line_count, terminal::terminal_rows()) {
        page(&text, &config.pager).context("No se pudo escribir la salida paginada.")?;
    } else {
        write_stdout(&text).context("No se pudo escribir en la salida estándar.")?;
    }
    Ok(())
}

fn render_target(
    cli: &Cli,
    config: &ResolvedConfig,
    interpreter: &Interpreter,
    options: &RenderOptions,
    target: &str,
) -> Result<String> {
    let mut path = TargetPath::parse(target)?;
    if cli.pick {
        let (_, root) = outline(&path, interpreter)?;
        path = TargetPath::parse(&context_resolver::pick_target(&root)?)?;
    }

    if cli.tree {
        let (resolved, root) = outline(&path, interpreter)?;
        return Ok(render_outline(&resolved, &root));
    }

    let inspection = resolver::resolve(&path, interpreter)?;
    let extraction = extractor::extract(inspection);
    let lines = render::render(&extraction, options)?;
    Ok(terminal::paint_lines(&lines, config.color))
}
