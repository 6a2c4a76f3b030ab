//! This module provides observability and diagnostics for the codec.
//!
//! Everything goes through the `log` facade. The host decides where records
//! end up; `enable_verbose_logging` is a convenience for hosts that have no
//! logger of their own.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use crate::error::HuffmanError;

/// Logs a structured key-value metric at `debug` level, only in debug builds.
///
/// # Example
/// ```
/// use huffman_core::log_metric;
/// let distinct = 42;
/// log_metric!("event"="build_tree", "distinct_symbols"=&distinct);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            $crate::__log::debug!(target: "huffman_metric", "HUFFMAN_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` backend at `level`, once per process.
///
/// Records are printed as `[LEVEL] message`. When `log_file` is given they are
/// appended to that file instead of stderr. Later calls are no-ops, as is a
/// call made after the host already installed another logger.
pub fn enable_verbose_logging(
    level: LevelFilter,
    log_file: Option<&Path>,
) -> Result<(), HuffmanError> {
    // Open the file up front so a bad path is reported instead of panicking
    // inside the `Once`.
    let file = match log_file {
        Some(path) => Some(
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|source| HuffmanError::OutputUnwritable {
                    path: path.to_path_buf(),
                    source,
                })?,
        ),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
