use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

/// Initialise an INFO `Subscriber` writing to `path`
///
/// The terminal belongs to the dashboard, so logs go to a file.
pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Initialise an INFO `Subscriber` writing to stderr (stdout carries output)
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(cfg!(debug_assertions))
        .with_writer(io::stderr)
        .init()
}
