// src/system/executor.rs

use std::io::{self, Write};
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("El comando '{0}' no se pudo ejecutar: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("El comando '{0}' finalizó con un código de error: {1:?}")]
    NonZeroExitStatus(String, Option<i32>),
    #[error("La salida del comando '{0}' no es UTF-8 válido.")]
    InvalidOutput(String),
}

/// Línea de comando para los mensajes. Los argumentos de varias líneas
/// (scripts en línea) se abrevian.
fn display_line(program: &str, args: &[&str]) -> String {
    let shown: Vec<&str> = args
        .iter()
        .map(|a| if a.contains('\n') { "<script>" } else { *a })
        .collect();
    format!("{} {}", program, shown.join(" "))
}

/// Ejecuta un programa sin shell y devuelve su salida estándar.
/// La entrada se cierra; stderr sólo se registra si el programa falla.
pub fn capture_output(program: &str, args: &[&str]) -> Result<String, ExecutionError> {
    let command_line = display_line(program, args);
    log::info!("Ejecutando comando: '{}'", command_line);

    let output = StdCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

    if !output.status.success() {
        log::debug!(
            "stderr de '{}':\n{}",
            command_line,
            String::from_utf8_lossy(&output.stderr)
        );
        return Err(ExecutionError::NonZeroExitStatus(
            command_line,
            output.status.code(),
        ));
    }

    String::from_utf8(output.stdout).map_err(|_| ExecutionError::InvalidOutput(command_line))
}

/// Ejecuta un programa con `input` en su entrada estándar y espera a que
/// termine. Stdout y stderr se heredan. Que el programa cierre la entrada
/// antes de leerla toda (el usuario sale del paginador) no es un error.
pub fn pipe_into(program: &str, args: &[&str], input: &str) -> Result<(), ExecutionError> {
    let command_line = display_line(program, args);
    log::info!("Ejecutando comando: '{}'", command_line);

    let mut child = StdCommand::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(input.as_bytes()) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("'{}' cerró su entrada antes de tiempo.", command_line);
            }
            Err(e) => return Err(ExecutionError::CommandFailed(command_line, e)),
        }
    }

    let status = child
        .wait()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus(
            command_line,
            status.code(),
        ));
    }

    Ok(())
}
