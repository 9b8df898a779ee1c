// tests/cli.rs

//! Pruebas de extremo a extremo del binario. Las que importan módulos
//! necesitan `python3`; sin él se saltan.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const PYTHON: &str = "python3";

const MINIJSON_INIT: &str = r#""""Paquete json reducido para las pruebas."""
from .encoder import JSONEncoder

_default_encoder = JSONEncoder()


def dumps(obj, *, indent=None, **kw):
    """Serializa ``obj`` a texto."""
    if indent is None and not kw:
        return _default_encoder.encode(obj)
    return JSONEncoder(indent=indent, **kw).encode(obj)
"#;

const MINIJSON_ENCODER: &str = r#"class JSONEncoder:
    def __init__(self, indent=None, sort_keys=False):
        self.indent = indent
        self.sort_keys = sort_keys

    def encode(self, o):
        if isinstance(o, str):
            return '"' + o + '"'
        return ''.join(map(lambda part: str(part), self.iterencode(o)))

    def iterencode(self, o):
        try:
            for key in sorted(o) if self.sort_keys else o:
                yield key
        except TypeError:
            yield repr(o)
"#;

const CHATTY: &str = "import sys\n\nprint('ruido-de-importacion')\nprint('ruido-de-importacion', file=sys.stderr)\n\n\ndef quiet():\n    return 42\n";

const BOOM: &str = "raise RuntimeError('boom at import')\n\n\ndef f():\n    return 1\n";

const COMPAT: &str = r#"import sys

if sys.version_info < (3, 0):
    def g():
        return 'py2'
else:
    def g():
        return 'py3'


def make():
    def inner(x):
        return x * 2
    return inner


h = make()
"#;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("mkdir");
    }
    fs::write(path, text).expect("write");
}

fn module_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "minijson/__init__.py", MINIJSON_INIT);
    write(dir.path(), "minijson/encoder.py", MINIJSON_ENCODER);
    write(dir.path(), "chatty.py", CHATTY);
    write(dir.path(), "boom.py", BOOM);
    write(dir.path(), "compat.py", COMPAT);
    dir
}

fn python_available() -> bool {
    let found = Command::new(PYTHON)
        .args(["-c", "import dis, inspect"])
        .output()
        .is_ok_and(|o| o.status.success());
    if !found {
        eprintln!("'{}' no está disponible; se salta la prueba.", PYTHON);
    }
    found
}

fn dis_with(root: &Path, env: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dis"))
        .current_dir(root)
        .env_remove("PYTHONPATH")
        .env_remove("RUST_LOG")
        .env_remove("PAGER")
        .envs(env.iter().copied())
        .arg("--isolated")
        .arg("--no-color")
        .arg("--path")
        .arg(root)
        .args(args)
        .output()
        .expect("ejecutar dis")
}

fn dis(root: &Path, args: &[&str]) -> Output {
    dis_with(root, &[], args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Nombres de operación de la tabla principal (sin los listados anidados).
fn table_opnames(text: &str) -> Vec<String> {
    text.lines()
        .skip_while(|l| !l.contains("OPERATION"))
        .skip(1)
        .take_while(|l| !l.trim().is_empty() && !l.starts_with("ExceptionTable:"))
        .filter_map(|l| {
            let mut words = l.split_whitespace().skip_while(|w| *w == ">>");
            words.next()?;
            words.next().map(str::to_string)
        })
        .collect()
}

#[test]
fn no_target_prints_help() {
    let dir = module_tree();
    let output = Command::new(env!("CARGO_BIN_EXE_dis"))
        .current_dir(dir.path())
        .output()
        .expect("ejecutar dis");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn module_paths_resolve_to_modules() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["minijson"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("module minijson  —  minijson/__init__.py:1"), "{}", text);
    assert!(text.contains("`minijson.dumps`"), "falta la sugerencia: {}", text);
}

#[test]
fn missing_module_names_the_first_segment() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["nonexistent.module.path"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("'nonexistent'"), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn missing_attribute_names_the_segment() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["minijson.encoder.JSONEncoder.decode"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("'decode'"), "{}", stderr(&output));
}

#[test]
fn import_exceptions_surface_with_their_traceback() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["boom.f"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Traceback (most recent call last):"), "{}", err);
    assert!(err.contains("boom.py"), "{}", err);
    assert!(err.contains("RuntimeError: boom at import"), "{}", err);
    assert!(stdout(&output).is_empty());
}

#[test]
fn module_level_output_is_silenced() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["chatty.quiet"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(!stdout(&output).contains("ruido-de-importacion"));
    assert!(!stderr(&output).contains("ruido-de-importacion"));
    assert!(stdout(&output).contains("def quiet():"));
}

#[test]
fn the_branch_that_ran_is_the_one_shown() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["--mode", "source", "compat.g"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("function compat.g  —  compat.py:7"), "{}", text);
    assert!(text.contains("return 'py3'"), "{}", text);
    assert!(!text.contains("'py2'"), "{}", text);
}

#[test]
fn names_bound_by_calls_resolve_to_the_returned_function() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["--width", "200", "compat.h"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("function compat.make.<locals>.inner"), "{}", text);
    assert!(text.contains("def inner(x):"), "{}", text);
    assert!(text.contains("return x * 2"), "{}", text);
}

#[test]
fn source_mode_contains_every_line() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["--mode", "source", "minijson.dumps"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    for line in MINIJSON_INIT.lines().skip(6).filter(|l| !l.trim().is_empty()) {
        assert!(text.contains(line.trim()), "falta {:?} en\n{}", line, text);
    }
    assert!(!text.contains("OPERATION"));
}

#[test]
fn instructions_mode_lists_rows_in_program_order() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["--no-source", "minijson.encoder.JSONEncoder.encode"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("function minijson.encoder.JSONEncoder.encode"), "{}", text);
    let resume = text.find("RESUME").expect("RESUME");
    let call = text.find("CALL").expect("CALL");
    let ret = text.rfind("RETURN_VALUE").expect("RETURN_VALUE");
    assert!(resume < call && call < ret);
    assert!(text.contains("Disassembly of <code object <lambda>"), "{}", text);
    assert!(!text.contains("isinstance(o, str)"));
}

#[test]
fn rows_match_the_host_disassembler() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let script = format!(
        "import sys, dis; sys.path.insert(0, {:?}); import minijson.encoder as m\n\
         for i in dis.get_instructions(m.JSONEncoder.iterencode): print(i.opname)",
        dir.path().display().to_string()
    );
    let host = Command::new(PYTHON)
        .args(["-E", "-c", &script])
        .output()
        .expect("ejecutar python");
    assert!(host.status.success(), "{}", stderr(&host));
    let expected: Vec<String> = stdout(&host).lines().map(str::to_string).collect();

    let output = dis(
        dir.path(),
        &["--mode", "instructions", "--width", "200", "minijson.encoder.JSONEncoder.iterencode"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert_eq!(table_opnames(&text), expected, "{}", text);
    assert!(text.contains("ExceptionTable:"), "{}", text);
}

#[test]
fn output_is_deterministic() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let args = ["--color", "--width", "160", "minijson.encoder.JSONEncoder.iterencode"];
    let first = dis(dir.path(), &args);
    let second = dis(dir.path(), &args);
    assert!(first.status.success(), "{}", stderr(&first));
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn width_decides_between_columns_and_stacking() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let wide = stdout(&dis(dir.path(), &["--width", "200", "minijson.dumps"]));
    let narrow = stdout(&dis(dir.path(), &["--width", "40", "minijson.dumps"]));

    assert!(wide.lines().any(|l| l.contains("def dumps") && l.contains(" │ ")), "{}", wide);
    assert!(!narrow.contains(" │ "));
    let source_at = narrow.find("def dumps").expect("fuente");
    let header_at = narrow.find("OPERATION").expect("cabecera");
    assert!(source_at < header_at);
}

#[test]
fn standard_library_functions_render_side_by_side() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["--width", "220", "json.dumps"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("function json.dumps  —  "), "{}", text);
    assert!(text.lines().next().is_some_and(|l| l.contains("json")));
    assert!(text.lines().any(|l| l.contains("def dumps(") && l.contains(" │ ")), "{}", text);
}

#[test]
fn builtins_have_nothing_to_render() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["math.floor"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("math.floor"), "{}", err);
}

#[test]
fn tree_lists_members() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let output = dis(dir.path(), &["--tree", "minijson.encoder"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("module minijson.encoder\n"), "{}", text);
    assert!(text.contains("└─ class JSONEncoder"), "{}", text);
    assert!(text.contains("├─ def __init__"));
    assert!(text.contains("└─ def iterencode"));
}

#[test]
fn paging_pipes_through_the_pager() {
    if !python_available() {
        return;
    }
    let dir = module_tree();
    let paged = dis_with(dir.path(), &[("PAGER", "cat")], &["--paging", "chatty.quiet"]);
    assert!(paged.status.success(), "{}", stderr(&paged));
    assert!(stdout(&paged).starts_with("function chatty.quiet"), "{}", stdout(&paged));

    // Un paginador que falla deja la salida en stdout.
    let broken = dis_with(dir.path(), &[("PAGER", "false")], &["-p", "chatty.quiet"]);
    assert!(broken.status.success(), "{}", stderr(&broken));
    assert!(stdout(&broken).starts_with("function chatty.quiet"));

    let unpaged = dis_with(dir.path(), &[("PAGER", "false")], &["--pager", "--no-pager", "chatty.quiet"]);
    assert_eq!(unpaged.stdout, paged.stdout);
}

#[test]
fn init_config_writes_once() {
    let dir = module_tree();
    let config = dir.path().join("conf").join("config.toml");
    let config_arg = config.to_string_lossy().into_owned();
    let first = dis(dir.path(), &["--init-config", "--config", &config_arg]);
    assert!(first.status.success(), "{}", stderr(&first));
    let written = fs::read_to_string(&config).expect("escrito");
    assert!(written.contains("[display]"));
    let second = dis(dir.path(), &["--init-config", "--config", &config_arg]);
    assert_eq!(second.status.code(), Some(1));
}
