use anyhow::{Context, Result};

use crate::config::ServerConfig;

/// Install the global logger.
///
/// Output goes to stderr because stdout carries the MCP protocol.
pub fn init_logging(config: &ServerConfig) -> Result<()> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.log_level)
        .chain(std::io::stderr());

    if let Some(path) = &config.log_file {
        let file = fern::log_file(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().context("Logger already initialized")?;
    Ok(())
}
