use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Target prefix shared by the library and the binary.
const OWN_TARGET: &str = "netpharm";

/// Filter directives for the given verbosity. Dependencies stay at `warn`; each
/// `-v` raises only our own targets.
pub fn log_directives(verbosity: u8, quiet: bool) -> String {
    if quiet {
        return "off".to_string();
    }
    let own = match verbosity {
        0 => return "warn".to_string(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,{}={}", OWN_TARGET, own)
}

/// `RUST_LOG` wins over the verbosity flags unless `--quiet` was given.
fn env_filter(verbosity: u8, quiet: bool) -> Result<EnvFilter> {
    if !quiet {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(log_directives(verbosity, quiet))
        .map_err(|e| CliError::Config(format!("invalid log filter: {}", e)))
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .compact();

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            Some(fmt::layer().with_writer(file).with_ansi(false).with_target(true))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter(verbosity, quiet)?)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, info, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_raises_only_our_targets() {
        assert_eq!(log_directives(0, false), "warn");
        assert_eq!(log_directives(1, false), "warn,netpharm=info");
        assert_eq!(log_directives(2, false), "warn,netpharm=debug");
        assert_eq!(log_directives(7, false), "warn,netpharm=trace");
        assert_eq!(log_directives(3, true), "off");
        for verbosity in 0..4 {
            assert!(EnvFilter::try_new(log_directives(verbosity, false)).is_ok());
        }
    }

    #[test]
    #[serial]
    fn dependency_chatter_is_filtered_at_high_verbosity() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("filtered.log");

        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(log_directives(2, false)))
            .with(fmt::layer().with_writer(file).with_ansi(false));

        tracing::subscriber::with_default(subscriber, || {
            debug!(target: "netpharm::workflows::pipeline", "Stage started.");
            info!(target: "netpharm_cli::commands::run", "Loaded sources.");
            info!(target: "hyper::client", "Connection pooled.");
            warn!(target: "hyper::client", "Connection reset.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Stage started."));
        assert!(content.contains("Loaded sources."));
        assert!(!content.contains("Connection pooled."));
        assert!(content.contains("Connection reset."));
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        warn!(stage = "pathways", "This is a warning");
        info!(nodes = 5, "This is info");
        debug!("This is debug");
    }

    #[test]
    #[serial]
    fn file_layer_writes_structured_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("run.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer().with_writer(file).with_ansi(false);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!(pathway = "R-HSA-168256", "Skipping pathway.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Skipping pathway."));
        assert!(content.contains("pathway=\"R-HSA-168256\""));
        assert!(content.contains("DEBUG"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
