//! Good First Issues MCP Server implementation
//!
//! Tools are thin wrappers over the read endpoints of the issues API. API
//! failures come back as tool errors so the calling agent can see them.

use crate::client::{GfiClient, SearchResult, TagsResult};
use anyhow::Result;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    handler::server::tool::ToolRouter,
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

/// Issues shown in one search reply
const MAX_LISTED_ISSUES: usize = 25;

/// Good First Issues MCP Server
#[derive(Clone)]
pub struct GfiServer {
    client: GfiClient,
    tool_router: ToolRouter<Self>,
}

impl GfiServer {
    pub fn from_env() -> Result<Self> {
        let client = GfiClient::from_env()?;
        Ok(Self {
            client,
            tool_router: Self::tool_router(),
        })
    }
}

// --- Tool Parameter Types ---

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Tags to filter by, e.g. ["ethereum", "rust"]. Tags from different
    /// categories must all match; tags from the same category are alternatives.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Case-insensitive text matched against issue titles and repository names
    #[serde(default)]
    pub query: Option<String>,
    /// Sort by creation date: "asc" (oldest first) or "desc" (newest first)
    #[serde(default)]
    pub order: Option<String>,
}

#[tool_router]
impl GfiServer {
    #[tool(
        description = "Search open good-first-issues across blockchain repositories by tags and text."
    )]
    async fn search_issues(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        match self
            .client
            .search_issues(&params.tags, params.query.as_deref(), params.order.as_deref())
            .await
        {
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(
                render_issues(&result),
            )])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "List every tag in the current issue snapshot, grouped by category.")]
    async fn list_tags(&self) -> Result<CallToolResult, McpError> {
        match self.client.list_tags().await {
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(render_tags(
                &result,
            ))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "Show when the issue snapshot was last refreshed from GitHub.")]
    async fn last_updated(&self) -> Result<CallToolResult, McpError> {
        match self.client.last_updated().await {
            Ok(at) => Ok(CallToolResult::success(vec![Content::text(
                render_last_updated(at.as_deref()),
            )])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}

#[tool_handler]
impl ServerHandler for GfiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "good-first-issues".into(),
                title: Some("Good First Issues MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"Good First Issues - beginner-friendly tickets from blockchain open source projects

WORKFLOW:
1. 'list_tags' - See which chains, languages and domains are covered
2. 'search_issues' - Filter by tags and/or text, optionally sorted by date
3. 'last_updated' - Check how fresh the snapshot is

FILTERING:
- Tags in the same category widen the search (ethereum OR solana)
- Tags in different categories narrow it (ethereum AND rust)"#
                    .into(),
            ),
        }
    }
}

// --- Rendering ---

fn render_issues(result: &SearchResult) -> String {
    if result.issues.is_empty() {
        return "No matching issues.".to_string();
    }

    let mut out = format!("{} matching issue(s)", result.total);
    if result.total > MAX_LISTED_ISSUES {
        out.push_str(&format!(", showing the first {}", MAX_LISTED_ISSUES));
    }
    out.push_str(":\n");

    for issue in result.issues.iter().take(MAX_LISTED_ISSUES) {
        out.push_str(&format!("\n- {} ({})\n", issue.title, issue.repository));
        out.push_str(&format!("  {}\n", issue.url));

        let mut meta = format!("  tags: {}", issue.tags.join(", "));
        if let Some(date) = issue.created_at.get(..10) {
            meta.push_str(&format!(" | opened {}", date));
        }
        if let Some(stars) = issue.stars {
            meta.push_str(&format!(" | {} stars", stars));
        }
        out.push_str(&meta);
        out.push('\n');
    }

    out
}

fn render_tags(result: &TagsResult) -> String {
    if result.tags.is_empty() {
        return "No tags yet. The issue snapshot is empty.".to_string();
    }

    result
        .categories
        .iter()
        .map(|group| format!("{}: {}", group.name, group.tags.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_last_updated(at: Option<&str>) -> String {
    match at {
        Some(at) => format!("Issues last updated at {}", at),
        None => "Issues have not been fetched yet.".to_string(),
    }
}
