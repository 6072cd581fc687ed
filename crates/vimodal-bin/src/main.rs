//! vimodal entrypoint: replay a key sequence against a file and print the result.
//!
//! Keys are fed through the same `ModalEditor` a terminal host would drive, so
//! everything typed on the command line behaves as if typed very quickly (a
//! scripted `jk` always leaves Insert mode). The file itself is never written.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::ModalEditor;
use core_config::load_from;
use core_events::parse_keys;
use core_model::EditorModel;
use core_state::{EditorState, Mode};
use core_text::Buffer;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vimodal", version, about = "Headless modal command interpreter")]
struct Args {
    /// File to edit. A missing file starts as an empty buffer with that name.
    pub path: Option<PathBuf>,
    /// Keys to replay in Vim notation, e.g. `dw`, `ihello<Esc>`, `<C-r>`.
    #[arg(long = "keys", default_value = "")]
    pub keys: String,
    /// Optional configuration file path (overrides discovery of `vimodal.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Print the `:reg` listing after the buffer.
    #[arg(long = "registers")]
    pub registers: bool,
}

/// State left behind by a replay.
#[derive(Debug)]
struct Outcome {
    text: String,
    registers: String,
    command_bar: String,
    mode: Mode,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("vimodal.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "vimodal.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_buffer(path: Option<&Path>) -> Result<Buffer> {
    let Some(path) = path else {
        return Buffer::from_str("", "");
    };
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    if !path.exists() {
        debug!(target: "io", file = %path.display(), "file_missing_new_buffer");
        return Buffer::from_str(name, "");
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(
        target: "io",
        file = %path.display(),
        size_bytes = content.len(),
        "file_read_ok"
    );
    Buffer::from_str(name, &content)
}

fn run(args: &Args) -> Result<Outcome> {
    let config = load_from(args.config.clone())?;
    let buffer = load_buffer(args.path.as_deref())?;
    let keys = parse_keys(&args.keys)
        .with_context(|| format!("invalid key notation: {:?}", args.keys))?;

    let model = EditorModel::new(EditorState::new(buffer), config.file.view.visible_lines);
    let mut editor = ModalEditor::with_system_clock(model, &config.file.insert);
    editor.begin();
    info!(target: "runtime", keys = keys.len(), "replay_start");
    editor.add_keys(keys);

    let state = editor.model().state();
    let outcome = Outcome {
        text: state.active_buffer().text(),
        registers: state.registers.dump(),
        command_bar: state.command_line.text().to_string(),
        mode: editor.mode(),
    };
    info!(
        target: "runtime",
        mode = ?outcome.mode,
        len = outcome.text.len(),
        undo_depth = state.undo_depth(),
        "replay_complete"
    );
    Ok(outcome)
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let outcome = run(&args)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(outcome.text.as_bytes())?;
    if args.registers {
        stdout.write_all(outcome.registers.as_bytes())?;
    }
    stdout.flush()?;
    if !outcome.command_bar.is_empty() && !outcome.command_bar.starts_with(':') {
        eprintln!("{}", outcome.command_bar);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(path: Option<PathBuf>, keys: &str) -> Args {
        Args {
            path,
            keys: keys.to_string(),
            // Point at a file that does not exist so discovery never picks up a local config.
            config: Some(PathBuf::from("/nonexistent/vimodal.toml")),
            registers: false,
        }
    }

    #[test]
    fn replays_keys_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "one two\nthree\n").unwrap();
        let outcome = run(&args(Some(path.clone()), "dwjA!<Esc>")).unwrap();
        assert_eq!(outcome.text, "two\nthree!\n");
        assert_eq!(outcome.mode, Mode::Normal);
        assert!(outcome.registers.contains("\"1   one "));
        // The file on disk is untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one two\nthree\n");
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run(&args(Some(dir.path().join("new.txt")), "ihi")).unwrap();
        assert_eq!(outcome.text, "hi");
        assert_eq!(outcome.mode, Mode::Insert);
    }

    #[test]
    fn scripted_escape_sequence_is_fast() {
        let outcome = run(&args(None, "iabjk")).unwrap();
        assert_eq!(outcome.text, "ab");
        assert_eq!(outcome.mode, Mode::Normal);
    }

    #[test]
    fn ex_output_is_reported() {
        let outcome = run(&args(None, ":nope<CR>")).unwrap();
        assert_eq!(outcome.command_bar, "Not a command");
    }

    #[test]
    fn invalid_notation_is_an_error() {
        let err = run(&args(None, "<Nope>")).unwrap_err();
        assert!(err.to_string().contains("invalid key notation"));
    }
}
