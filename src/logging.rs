use flexi_logger::{opt_format, Cleanup, Criterion, FileSpec, Logger, Naming};

use crate::{MocoVelhaError, Result};

/// Colored console logging, the default for interactive runs.
pub fn setup_console_logging() -> Result<()> {
    Logger::try_with_env_or_str("info")
        .map_err(|e| MocoVelhaError::Server(e.to_string()))?
        .format(flexi_logger::colored_default_format)
        .start()
        .map_err(|e| MocoVelhaError::Server(e.to_string()))?;
    Ok(())
}

/// Rotating file logging for deployments.
pub fn setup_file_logging(directory: &str) -> Result<()> {
    Logger::try_with_env_or_str("info")
        .map_err(|e| MocoVelhaError::Server(e.to_string()))?
        .log_to_file(FileSpec::default().directory(directory))
        .format(opt_format)
        .rotate(
            Criterion::Size(10 * 1024 * 1024), // Rotate logs after they reach 10 MB
            Naming::Numbers,
            Cleanup::KeepLogFiles(7),
        )
        .start()
        .map_err(|e| MocoVelhaError::Server(e.to_string()))?;
    Ok(())
}
