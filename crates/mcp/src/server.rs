use std::sync::Arc;

use anyhow::{anyhow, Result};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
        Implementation, ListPromptsResult, ListResourcesResult, PaginatedRequestParam, Prompt,
        PromptMessage, PromptMessageRole, ProtocolVersion, RawResource, ReadResourceRequestParam,
        ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo,
    },
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use stand_core::{config::AppConfig, dispatch, dispatch::GET_GAME_STATE, SessionRegistry};
use tracing::{debug, info};

use crate::error::to_mcp_error;

pub const SERVER_NAME: &str = "lemonade-stand";
pub const GAMES_URI: &str = "lemonade://games";
const GAME_URI_PREFIX: &str = "lemonade://games/";
pub const HOW_TO_PLAY_PROMPT: &str = "how_to_play";

const INSTRUCTIONS: &str = "Run a lemonade stand for 14 days. Each day: buy_supplies, set_price, \
sell_lemonade, then next_day. Start with start_game and pass the returned gameId to every other tool.";

const HOW_TO_PLAY: &str = "\
You are running a lemonade stand for 14 days, starting with $20.00.

Every day follows the same four steps, in order:
1. buy_supplies: purchase cups ($0.05), lemons ($0.10), sugar ($0.08) and ice ($0.02).
2. set_price: choose the price per cup.
3. sell_lemonade: open the stand and see the day's results.
4. next_day: move on to tomorrow's weather.

One pitcher makes 10 cups from 4 lemons, 4 sugar and 15 ice. Ice melts overnight, so buy only what you can use.
Hot, sunny days bring more customers; rain keeps them away. Prices of $0.15 or less attract extra buyers,
and every 3 cents above $0.50 turns roughly one customer away.

Call start_game to begin, then use the gameId it returns for every other tool.";

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameIdRequest {
    /// The game ID
    pub game_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuySuppliesRequest {
    /// The game ID
    pub game_id: String,
    /// Number of cups to buy
    #[serde(default)]
    pub cups: u32,
    /// Number of lemons to buy
    #[serde(default)]
    pub lemons: u32,
    /// Amount of sugar to buy
    #[serde(default)]
    pub sugar: u32,
    /// Amount of ice to buy
    #[serde(default)]
    pub ice: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPriceRequest {
    /// The game ID
    pub game_id: String,
    /// Price per cup in dollars
    pub price: f64,
}

/// MCP surface for the lemonade stand game.
///
/// Every tool forwards to [`stand_core::dispatch`] so the MCP layer and the CLI
/// share one argument format and one error taxonomy.
#[derive(Clone)]
pub struct LemonadeStandServer {
    registry: Arc<SessionRegistry>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LemonadeStandServer {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Arc::new(SessionRegistry::with_seed(config.weather_seed)))
    }

    #[tool(description = "Start a new lemonade stand game")]
    async fn start_game(&self) -> Result<CallToolResult, McpError> {
        let value = self.invoke("start_game", Value::Null).await?;
        Ok(text_result(&value))
    }

    #[tool(description = "Get the current state of the game")]
    async fn get_game_state(
        &self,
        Parameters(request): Parameters<GameIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let value = self.invoke(GET_GAME_STATE, arguments(&request)?).await?;
        Ok(text_result(&value))
    }

    #[tool(description = "Purchase supplies for the lemonade stand")]
    async fn buy_supplies(
        &self,
        Parameters(request): Parameters<BuySuppliesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let value = self.invoke("buy_supplies", arguments(&request)?).await?;
        Ok(text_result(&value))
    }

    #[tool(description = "Set the price per cup of lemonade")]
    async fn set_price(
        &self,
        Parameters(request): Parameters<SetPriceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let value = self.invoke("set_price", arguments(&request)?).await?;
        Ok(text_result(&value))
    }

    #[tool(description = "Open for business and see today's results")]
    async fn sell_lemonade(
        &self,
        Parameters(request): Parameters<GameIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let value = self.invoke("sell_lemonade", arguments(&request)?).await?;
        Ok(text_result(&value))
    }

    #[tool(description = "Advance to the next day")]
    async fn next_day(
        &self,
        Parameters(request): Parameters<GameIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let value = self.invoke("next_day", arguments(&request)?).await?;
        Ok(text_result(&value))
    }
}

impl LemonadeStandServer {
    async fn invoke(&self, operation: &str, arguments: Value) -> Result<Value, McpError> {
        info!(tool = operation, "tool call received");
        dispatch(&*self.registry, operation, arguments)
            .await
            .map_err(to_mcp_error)
    }

    async fn resources(&self) -> Vec<Resource> {
        let mut resources = vec![json_resource(
            GAMES_URI,
            "games",
            "Every game started on this server",
        )];
        for summary in self.registry.list().await {
            let uri = format!("{GAME_URI_PREFIX}{}", summary.game_id);
            let description = format!("Day {} ({})", summary.day, summary.status);
            resources.push(json_resource(&uri, &summary.game_id, &description));
        }
        resources
    }

    async fn read_game_resource(&self, uri: &str) -> Result<Value, McpError> {
        if uri == GAMES_URI {
            return Ok(json!({ "games": self.registry.list().await }));
        }

        let game_id = uri
            .strip_prefix(GAME_URI_PREFIX)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                McpError::resource_not_found("resource_not_found", Some(json!({ "uri": uri })))
            })?;

        let session = self.registry.get(game_id).await.map_err(to_mcp_error)?;
        Ok(json!({ "gameId": game_id, "gameState": session }))
    }

    /// Run the server over stdio transport and wait until the peer disconnects.
    pub async fn serve_stdio(self) -> Result<()> {
        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|err| anyhow!(err))?;

        info!("Lemonade Stand MCP server running on stdio");

        service.waiting().await.map_err(|err| anyhow!(err))?;

        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for LemonadeStandServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = SERVER_NAME.to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info,
            instructions: Some(INSTRUCTIONS.into()),
            ..ServerInfo::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        debug!("listing resources");
        Ok(ListResourcesResult::with_all_items(self.resources().await))
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri, .. }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let value = self.read_game_resource(&uri).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(value.to_string(), uri)],
        })
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(vec![Prompt::new(
            HOW_TO_PLAY_PROMPT,
            Some("Rules and daily routine for the lemonade stand game"),
            None,
        )]))
    }

    async fn get_prompt(
        &self,
        GetPromptRequestParam { name, .. }: GetPromptRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        if name != HOW_TO_PLAY_PROMPT {
            return Err(McpError::invalid_params(
                format!("unknown prompt: {name}"),
                None,
            ));
        }

        Ok(GetPromptResult {
            description: Some("How to play Lemonade Stand".to_string()),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                HOW_TO_PLAY,
            )],
        })
    }
}

fn arguments<T: Serialize>(request: &T) -> Result<Value, McpError> {
    serde_json::to_value(request).map_err(|err| McpError::internal_error(err.to_string(), None))
}

fn text_result(value: &Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(value.to_string())])
}

fn json_resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut resource = RawResource::new(uri, name.to_string());
    resource.description = Some(description.to_string());
    resource.mime_type = Some("application/json".to_string());
    resource.no_annotation()
}
