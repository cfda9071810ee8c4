use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;

/// Send log records to `path`. The terminal belongs to the UI, so nothing is
/// ever written to stdout or stderr. `RUST_LOG` overrides the `info` default.
pub fn init_file_logger(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {}: {} - {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(LevelFilter::Info)
        .parse_default_env();

    builder.try_init().context("logger already initialised")?;
    Ok(())
}
