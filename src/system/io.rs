// src/system/io.rs

use std::io::{self, Write};

use crate::constants::PAGING_MARGIN;
use crate::system::executor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// El lector cerró la tubería (`dis ... | head`).
    Closed,
}

/// Escribe en stdout. Una tubería rota no es un error.
pub fn write_stdout(text: &str) -> io::Result<WriteOutcome> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_to(&mut handle, text)
}

pub fn write_to<W: Write>(writer: &mut W, text: &str) -> io::Result<WriteOutcome> {
    match writer.write_all(text.as_bytes()).and_then(|_| writer.flush()) {
        Ok(()) => Ok(WriteOutcome::Written),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            log::debug!("Salida cerrada por el lector.");
            Ok(WriteOutcome::Closed)
        }
        Err(e) => Err(e),
    }
}

/// Decide si la salida pasa por el paginador. Una petición explícita manda;
/// si no, se pagina sólo en una terminal y cuando el texto no cabe en ella.
pub fn should_page(
    requested: Option<bool>,
    stdout_is_tty: bool,
    line_count: usize,
    terminal_rows: Option<usize>,
) -> bool {
    match requested {
        Some(choice) => choice,
        None => {
            stdout_is_tty
                && terminal_rows
                    .is_some_and(|rows| line_count > rows.saturating_sub(PAGING_MARGIN))
        }
    }
}

/// Envía el texto al paginador (`less -R`, `$PAGER`...). Si el paginador no
/// arranca o falla, se avisa y el texto se escribe en stdout.
pub fn page(text: &str, command_line: &str) -> io::Result<WriteOutcome> {
    let mut parts = command_line.split_whitespace();
    let Some(program) = parts.next() else {
        return write_stdout(text);
    };
    let args: Vec<&str> = parts.collect();
    match executor::pipe_into(program, &args, text) {
        Ok(()) => Ok(WriteOutcome::Written),
        Err(e) => {
            log::warn!("No se pudo usar el paginador: {}", e);
            write_stdout(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_pipes_are_quiet() {
        assert_eq!(write_to(&mut ClosedPipe, "x").expect("ok"), WriteOutcome::Closed);
        let mut buffer = Vec::new();
        assert_eq!(write_to(&mut buffer, "hola").expect("ok"), WriteOutcome::Written);
        assert_eq!(buffer, b"hola");
    }

    #[test]
    fn paging_follows_the_request_first() {
        assert!(should_page(Some(true), false, 1, None));
        assert!(!should_page(Some(false), true, 500, Some(24)));
    }

    #[test]
    fn automatic_paging_needs_a_tall_output_on_a_terminal() {
        assert!(should_page(None, true, 20, Some(24)));
        assert!(!should_page(None, true, 19, Some(24)));
        assert!(!should_page(None, false, 500, Some(24)));
        assert!(!should_page(None, true, 500, None));
    }
}
