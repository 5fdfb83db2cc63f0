use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, schemars, tool, tool_handler, tool_router};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::document_parser::{Document, process_excel_content};
use crate::error::ExtractError;
use crate::session::{AppendOutcome, WorkbookSession};
use crate::shared_utils::{file_display_name, read_workbook_file};

/// Workbook extractor exposed as MCP tools.
///
/// Clones share the same session.
#[derive(Clone)]
pub struct WorkbookReader {
    config: Arc<ServerConfig>,
    session: Arc<Mutex<WorkbookSession>>,
    tool_router: ToolRouter<Self>,
}

/// Input for the tools that take a workbook path
#[derive(Serialize, Deserialize, Debug, schemars::JsonSchema)]
pub struct WorkbookPathInput {
    #[schemars(description = "Path to the workbook file (.xlsx or .xlsm)")]
    pub file_path: String,
}

impl WorkbookReader {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(Mutex::new(WorkbookSession::new())),
            tool_router: Self::tool_router(),
        }
    }

    fn session(&self) -> MutexGuard<'_, WorkbookSession> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read and extract a workbook from disk on the blocking pool
    pub async fn extract_file(&self, file_path: &str) -> Result<Document> {
        let file_path = file_path.to_string();
        let max_file_size_bytes = self.config.max_file_size_bytes;

        tokio::task::spawn_blocking(move || {
            let (file_name, bytes) = read_workbook_file(&file_path, max_file_size_bytes)?;
            process_excel_content(&bytes, &file_name)
                .with_context(|| format!("Failed to extract workbook: {}", file_path))
        })
        .await
        .context("Extraction task panicked")?
    }

    /// Document JSON for a single file; the session is not touched
    pub async fn read_workbook_json(&self, file_path: &str) -> Result<String> {
        let document = self.extract_file(file_path).await?;
        Ok(document.to_json_pretty()?)
    }

    /// Extract a file into the session unless its name is already loaded
    pub async fn load_into_session(&self, file_path: &str) -> Result<String> {
        let file_name = file_display_name(file_path);
        let already_loaded = self.session().contains(&file_name);
        if already_loaded {
            return Ok(format!("'{}' is already loaded", file_name));
        }

        let document = match self.extract_file(file_path).await {
            Ok(document) => document,
            Err(e) => {
                log::warn!("Could not load '{}': {:#}", file_path, e);
                return Err(e);
            }
        };
        let total_sheets = document.metadata.total_sheets;
        let cells = document.cell_count();

        let mut session = self.session();
        let message = match session.append(document) {
            AppendOutcome::Added => format!(
                "Loaded '{}': {} visible sheets, {} cells ({} files loaded)",
                file_name,
                total_sheets,
                cells,
                session.len()
            ),
            AppendOutcome::AlreadyLoaded => format!("'{}' is already loaded", file_name),
        };
        Ok(message)
    }

    pub fn loaded_files_listing(&self) -> String {
        let session = self.session();
        if session.is_empty() {
            return "No workbooks loaded".to_string();
        }
        session
            .file_names()
            .iter()
            .enumerate()
            .map(|(idx, name)| format!("{}. {}", idx + 1, name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Combined `files_data` payload for every loaded workbook
    pub fn context_json(&self) -> Result<String> {
        let session = self.session();
        Ok(serde_json::to_string_pretty(&session.combined_context())?)
    }

    /// Empty the session, returning how many workbooks were dropped
    pub fn clear_session(&self) -> usize {
        let mut session = self.session();
        let dropped = session.len();
        session.clear();
        dropped
    }

    pub fn loaded_count(&self) -> usize {
        self.session().len()
    }
}

/// Caller mistakes become invalid params, decoding failures internal errors
fn to_mcp_error(error: anyhow::Error) -> McpError {
    let message = format!("{:#}", error);
    if error.downcast_ref::<ExtractError>().is_some() {
        McpError::internal_error(message, None)
    } else {
        McpError::invalid_params(message, None)
    }
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

#[tool_router]
impl WorkbookReader {
    #[tool(description = "Extract a workbook (xlsx/xlsm) into JSON: visible sheets, populated cells with coordinates and typed values")]
    async fn read_workbook(
        &self,
        Parameters(WorkbookPathInput { file_path }): Parameters<WorkbookPathInput>,
    ) -> Result<CallToolResult, McpError> {
        self.read_workbook_json(&file_path)
            .await
            .map(text_result)
            .map_err(to_mcp_error)
    }

    #[tool(description = "Extract a workbook and add it to the set of loaded workbooks (skipped if a file with the same name is already loaded)")]
    async fn load_workbook(
        &self,
        Parameters(WorkbookPathInput { file_path }): Parameters<WorkbookPathInput>,
    ) -> Result<CallToolResult, McpError> {
        self.load_into_session(&file_path)
            .await
            .map(text_result)
            .map_err(to_mcp_error)
    }

    #[tool(description = "List the file names of the loaded workbooks")]
    async fn list_loaded_workbooks(&self) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.loaded_files_listing()))
    }

    #[tool(description = "Return all loaded workbooks as one JSON payload with a files_data list")]
    async fn get_workbooks_context(&self) -> Result<CallToolResult, McpError> {
        self.context_json().map(text_result).map_err(to_mcp_error)
    }

    #[tool(description = "Remove all loaded workbooks")]
    async fn clear_workbooks(&self) -> Result<CallToolResult, McpError> {
        let dropped = self.clear_session();
        Ok(text_result(format!("Cleared {} workbooks", dropped)))
    }
}

#[tool_handler]
impl ServerHandler for WorkbookReader {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "This server extracts Excel workbooks (xlsx, xlsm) into structured JSON. Hidden sheets and empty cells are left out.".to_string()
            ),
            ..Default::default()
        }
    }
}

/// Serve the workbook tools over stdio until the client disconnects
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let reader = WorkbookReader::new(config);

    let server = reader.serve(rmcp::transport::stdio()).await?;
    log::info!("Workbook extractor MCP server started");

    let quit_reason = server.waiting().await?;
    log::info!("Server stopped: {:?}", quit_reason);

    Ok(())
}
