use anyhow::Result;
use tokio::runtime::Runtime;
use workbook_extractor_mcp::{ServerConfig, logging, start_server};

fn main() -> Result<()> {
    let config = ServerConfig::from_env();
    logging::init_logging(&config)?;
    log::info!("Starting Workbook Extractor MCP Server...");

    // Create a Tokio runtime for async operations
    let rt = Runtime::new()?;

    // Run the RMCP server in the Tokio runtime
    rt.block_on(start_server(config))?;

    Ok(())
}
