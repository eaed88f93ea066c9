// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing` subscriber setup (spec §6's `--log-level`/`--log-name`/
//! `--log-filter`/`--output-dir` and the persisted `matrix.log`).

use mtx_core::Config;
use std::io;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub(crate) fn build_filter(log_level: &str, log_filter: Option<&str>) -> EnvFilter {
    let mut directive = log_level.to_string();
    if let Some(extra) = log_filter {
        directive.push(',');
        directive.push_str(extra);
    }
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global `tracing` subscriber. When `config.output_dir` is
/// set, log lines also go to a rotation-free file named `{log_name}.log`
/// there (spec §6's `matrix.log`); the returned guard must be held for the
/// lifetime of the process so the non-blocking writer flushes on exit.
pub fn init(config: &Config, log_level: &str, log_name: &str, log_filter: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = build_filter(log_level, log_filter);

    match &config.output_dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("warning: could not create output dir {}: {e}", dir.display());
            }
            let file_appender = tracing_appender::rolling::never(dir, format!("{log_name}.log"));
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr).with_ansi(true))
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(io::stderr)).init();
            None
        }
    }
}

/// Gzip-compresses `{log_name}.log` in `dir` to `{log_name}.log.gz` and
/// removes the plaintext copy (spec §6: "matrix.log (optionally gzipped)").
/// Writing uncompressed logs throughout the run and compressing once at
/// exit avoids holding a second file handle open across the whole run.
pub fn compress_log(dir: &std::path::Path, log_name: &str) -> io::Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Read, Write};

    let plain_path = dir.join(format!("{log_name}.log"));
    if !plain_path.exists() {
        return Ok(());
    }
    let mut contents = Vec::new();
    std::fs::File::open(&plain_path)?.read_to_end(&mut contents)?;

    let gz_path = dir.join(format!("{log_name}.log.gz"));
    let gz_file = std::fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(gz_file, Compression::default());
    encoder.write_all(&contents)?;
    encoder.finish()?;

    std::fs::remove_file(&plain_path)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
