use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes tracing/logging.
///
/// `RUST_LOG` wins when set; otherwise `debug` selects the default level.
/// With a `log_file`, every line also goes to that file (appended, created if missing).
pub fn init_tracing(debug: bool, json: bool, log_file: Option<&Path>) -> std::io::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        // No colour codes in the file
        .with_ansi(log_file.is_none())
        .with_writer(log_writer(log_file)?);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    Ok(())
}

/// Stdout alone, or stdout plus the given file.
pub fn log_writer(log_file: Option<&Path>) -> std::io::Result<BoxMakeWriter> {
    match log_file {
        Some(path) => {
            let file: File = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(BoxMakeWriter::new(std::io::stdout.and(Arc::new(file))))
        }
        None => Ok(BoxMakeWriter::new(std::io::stdout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn log_file_receives_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "earlier\n").unwrap();

        let writer = log_writer(Some(&path)).unwrap();
        writer.make_writer().write_all(b"server started\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier\nserver started\n");
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(log_writer(Some(&dir.path().join("missing").join("app.log"))).is_err());
    }
}
