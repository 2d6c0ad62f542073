//! MCP server implementation.

use super::protocol::*;
use super::tools::{get_resource_templates, get_tools, STYLE_URI_PREFIX};
use crate::config::Settings;
use crate::style::StyleStore;
use crate::surface::{ProgressReporter, ToolSurface};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const SERVER_NAME: &str = "speil";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Serializes messages onto the single stdout writer.
#[derive(Clone)]
struct Outbound(mpsc::UnboundedSender<String>);

impl Outbound {
    fn send<T: Serialize>(&self, message: &T) {
        match serde_json::to_string(message) {
            Ok(line) => {
                if self.0.send(line).is_err() {
                    warn!("Output closed, dropping message");
                }
            }
            Err(e) => warn!("Failed to serialize message: {}", e),
        }
    }
}

/// Forwards analysis progress as `notifications/progress`.
struct NotificationProgress {
    token: Value,
    outbound: Outbound,
}

impl ProgressReporter for NotificationProgress {
    fn report(&self, progress: u32, total: u32, message: &str) {
        let params = ProgressParams {
            progress_token: self.token.clone(),
            progress,
            total,
            message: Some(message.to_string()),
        };
        match serde_json::to_value(params) {
            Ok(params) => self.outbound.send(&JsonRpcRequest::notification(
                "notifications/progress",
                Some(params),
            )),
            Err(e) => warn!("Failed to encode progress: {}", e),
        }
        debug!("[{}/{}] {}", progress, total, message);
    }
}

/// Extract a required string argument.
fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolCallResult> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolCallResult::error(format!("Missing '{}' argument", key)))
}

/// MCP Server for Speil.
pub struct McpServer {
    surface: Arc<ToolSurface>,
}

impl McpServer {
    /// Create a new MCP server around an existing tool surface.
    pub fn new(surface: Arc<ToolSurface>) -> Self {
        Self { surface }
    }

    /// Create a server with a fresh, empty style store.
    pub fn from_settings(settings: &Settings) -> crate::Result<Self> {
        let store = Arc::new(StyleStore::new());
        let surface = ToolSurface::from_settings(settings, store)?;
        Ok(Self::new(Arc::new(surface)))
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited JSON-RPC from `reader`, answering on `output`.
    ///
    /// Each request runs as its own task; a single writer task owns the output.
    /// Returns once the input is closed and every in-flight request answered.
    pub async fn run_with<R, W>(self, reader: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                output.write_all(line.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
            Ok::<_, std::io::Error>(())
        });

        info!("Speil MCP server starting...");

        let server = Arc::new(self);
        let outbound = Outbound(tx);
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    outbound.send(&JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"));
                    continue;
                }
            };

            let server = server.clone();
            let outbound = outbound.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_request(request, &outbound).await {
                    outbound.send(&response);
                }
            });
        }

        info!("Input closed, waiting for in-flight requests");
        drop(outbound);
        writer.await??;

        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications get no response.
    async fn handle_request(
        &self,
        request: JsonRpcRequest,
        outbound: &Outbound,
    ) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        let id = request.id;
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::from_result(id, &ToolsListResult { tools: get_tools() }),
            "tools/call" => self.handle_tools_call(id, request.params, outbound).await,
            "resources/list" => self.handle_resources_list(id),
            "resources/templates/list" => JsonRpcResponse::from_result(
                id,
                &ResourceTemplatesListResult {
                    resource_templates: get_resource_templates(),
                },
            ),
            "resources/read" => self.handle_resources_read(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Handle tools/call request.
    async fn handle_tools_call(
        &self,
        id: Option<Value>,
        params: Option<Value>,
        outbound: &Outbound,
    ) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let args = params.arguments.unwrap_or_else(|| json!({}));
        let progress_token = params.meta.and_then(|m| m.progress_token);

        info!("Tool call: {}", params.name);

        let result = match params.name.as_str() {
            "analyze_youtube_style" => self.tool_analyze(&args, progress_token, outbound).await,
            "mirror_style" => self.tool_mirror(&args).await,
            "save_style" => self.tool_save(&args),
            "list_saved_styles" => ToolCallResult::text(self.surface.list_styles()),
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Analyze style tool.
    async fn tool_analyze(
        &self,
        args: &Value,
        progress_token: Option<Value>,
        outbound: &Outbound,
    ) -> ToolCallResult {
        let url = match required_str(args, "url") {
            Ok(u) => u,
            Err(e) => return e,
        };
        let lang = args.get("lang").and_then(Value::as_str);

        let text = match progress_token {
            Some(token) => {
                let progress = NotificationProgress {
                    token,
                    outbound: outbound.clone(),
                };
                self.surface.analyze_style(url, lang, &progress).await
            }
            None => {
                self.surface
                    .analyze_style(url, lang, &crate::surface::LogProgress)
                    .await
            }
        };

        ToolCallResult::text(text)
    }

    /// Mirror style tool.
    async fn tool_mirror(&self, args: &Value) -> ToolCallResult {
        let (text, style_id) = match (required_str(args, "text"), required_str(args, "style_id")) {
            (Ok(t), Ok(s)) => (t, s),
            (Err(e), _) | (_, Err(e)) => return e,
        };

        ToolCallResult::text(self.surface.mirror_style(text, style_id).await)
    }

    /// Save style tool.
    fn tool_save(&self, args: &Value) -> ToolCallResult {
        let (style_id, description) =
            match (required_str(args, "style_id"), required_str(args, "description")) {
                (Ok(s), Ok(d)) => (s, d),
                (Err(e), _) | (_, Err(e)) => return e,
            };

        ToolCallResult::text(self.surface.save_style(style_id, description))
    }

    /// Handle resources/list request.
    fn handle_resources_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let resources = self
            .surface
            .store()
            .list()
            .into_iter()
            .map(|style_id| Resource {
                uri: format!("{}{}", STYLE_URI_PREFIX, style_id),
                name: style_id,
                mime_type: "text/plain".to_string(),
            })
            .collect();

        JsonRpcResponse::from_result(id, &ResourcesListResult { resources })
    }

    /// Handle resources/read request.
    fn handle_resources_read(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ResourceReadParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
            }
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let style_id = match params.uri.strip_prefix(STYLE_URI_PREFIX) {
            Some(style_id) => style_id,
            None => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    &format!("Unknown resource: {}", params.uri),
                )
            }
        };

        let result = ResourceReadResult {
            contents: vec![ResourceContents {
                uri: params.uri.clone(),
                mime_type: "text/plain".to_string(),
                text: self.surface.get_style(style_id),
            }],
        };

        JsonRpcResponse::from_result(id, &result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockModel;
    use crate::transcript::mock::StubFetcher;

    fn server(model: Arc<MockModel>) -> McpServer {
        let surface = ToolSurface::new(
            Arc::new(StyleStore::new()),
            Arc::new(StubFetcher::returning("Right, so, basically, yeah.")),
            model,
            "en",
        );
        McpServer::new(Arc::new(surface))
    }

    fn outbound() -> (Outbound, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Outbound(tx), rx)
    }

    fn request(id: u64, method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest::new(id, method, params)
    }

    fn tool_text(response: &JsonRpcResponse) -> &str {
        response.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
    }

    async fn call(server: &McpServer, id: u64, name: &str, arguments: Value) -> JsonRpcResponse {
        let (out, _rx) = outbound();
        server
            .handle_request(
                request(id, "tools/call", json!({"name": name, "arguments": arguments})),
                &out,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server(Arc::new(MockModel::replying("")));
        let (out, _rx) = outbound();

        let response = server
            .handle_request(request(1, "initialize", json!({})), &out)
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "speil");
        assert!(result["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let server = server(Arc::new(MockModel::replying("")));
        let (out, _rx) = outbound();

        let response = server
            .handle_request(
                JsonRpcRequest::notification("notifications/initialized", None),
                &out,
            )
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = server(Arc::new(MockModel::replying("")));
        let (out, _rx) = outbound();

        let response = server
            .handle_request(request(2, "tools/list", json!({})), &out)
            .await
            .unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 4);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server(Arc::new(MockModel::replying("")));
        let (out, _rx) = outbound();

        let response = server
            .handle_request(request(3, "sampling/createMessage", json!({})), &out)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_list_and_mirror() {
        let model = Arc::new(MockModel::replying("Good evening."));
        let server = server(model.clone());

        let saved = call(&server, 1, "save_style", json!({"style_id": "formal", "description": "Stiff."})).await;
        assert_eq!(tool_text(&saved), "Successfully saved style with ID: formal");

        let listed = call(&server, 2, "list_saved_styles", json!({})).await;
        assert_eq!(tool_text(&listed), "Saved styles:\n\n- formal\n");

        let mirrored = call(&server, 3, "mirror_style", json!({"text": "yo", "style_id": "formal"})).await;
        assert_eq!(tool_text(&mirrored), "Good evening.");
        assert!(model.last_request().unwrap().system.contains("Stiff."));
    }

    #[tokio::test]
    async fn test_mirror_unknown_style_is_error_text() {
        let model = Arc::new(MockModel::replying("unused"));
        let server = server(model.clone());

        let response = call(&server, 1, "mirror_style", json!({"text": "yo", "style_id": "nobody"})).await;
        let result = response.result.as_ref().unwrap();
        assert!(result.get("isError").is_none());
        assert!(tool_text(&response).starts_with("Error: Style with ID 'nobody' not found"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_argument_flags_error() {
        let server = server(Arc::new(MockModel::replying("")));

        let response = call(&server, 1, "save_style", json!({"style_id": "x"})).await;
        let result = response.result.as_ref().unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(tool_text(&response), "Missing 'description' argument");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let server = server(Arc::new(MockModel::replying("")));

        let response = call(&server, 1, "get_transcript", json!({})).await;
        assert_eq!(response.result.as_ref().unwrap()["isError"], true);
    }

    #[tokio::test]
    async fn test_analyze_sends_progress_notifications() {
        let server = server(Arc::new(MockModel::replying("Casual.")));
        let (out, mut rx) = outbound();

        let response = server
            .handle_request(
                request(
                    7,
                    "tools/call",
                    json!({
                        "name": "analyze_youtube_style",
                        "arguments": {"url": "https://www.youtube.com/watch?v=ABCDEFGHIJK"},
                        "_meta": {"progressToken": "tok-1"}
                    }),
                ),
                &out,
            )
            .await
            .unwrap();
        assert_eq!(tool_text(&response), "Casual.");

        let mut notifications = Vec::new();
        while let Ok(line) = rx.try_recv() {
            notifications.push(serde_json::from_str::<Value>(&line).unwrap());
        }
        assert_eq!(notifications.len(), 3);
        assert_eq!(notifications[0]["method"], "notifications/progress");
        assert_eq!(notifications[0]["params"]["progressToken"], "tok-1");
        assert_eq!(notifications[2]["params"]["progress"], 3);
        assert!(notifications.iter().all(|n| n.get("id").is_none()));
    }

    #[tokio::test]
    async fn test_resources() {
        let server = server(Arc::new(MockModel::replying("")));
        let (out, _rx) = outbound();
        call(&server, 1, "save_style", json!({"style_id": "pirate", "description": "Arr."})).await;

        let listed = server
            .handle_request(request(2, "resources/list", json!({})), &out)
            .await
            .unwrap();
        assert_eq!(listed.result.unwrap()["resources"][0]["uri"], "style://pirate");

        let read = server
            .handle_request(request(3, "resources/read", json!({"uri": "style://pirate"})), &out)
            .await
            .unwrap();
        assert_eq!(read.result.unwrap()["contents"][0]["text"], "Arr.");

        let missing = server
            .handle_request(request(4, "resources/read", json!({"uri": "style://ghost"})), &out)
            .await
            .unwrap();
        assert_eq!(
            missing.result.unwrap()["contents"][0]["text"],
            "Style with ID 'ghost' not found."
        );

        let foreign = server
            .handle_request(request(5, "resources/read", json!({"uri": "file:///etc/passwd"})), &out)
            .await
            .unwrap();
        assert_eq!(foreign.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_call_bad_params() {
        let server = server(Arc::new(MockModel::replying("")));
        let (out, _rx) = outbound();

        let missing = server
            .handle_request(
                JsonRpcRequest {
                    params: None,
                    ..request(1, "tools/call", json!({}))
                },
                &out,
            )
            .await
            .unwrap();
        assert_eq!(missing.error.unwrap().code, INVALID_PARAMS);

        let invalid = server
            .handle_request(request(2, "tools/call", json!({"name": 5})), &out)
            .await
            .unwrap();
        assert_eq!(invalid.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_run_over_stream() {
        use tokio::io::AsyncReadExt;

        let server = server(Arc::new(MockModel::replying("")));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"save_style","arguments":{"style_id":"calm","description":"Slow."}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#,
            "\n",
        );

        let (mut client, server_end) = tokio::io::duplex(64 * 1024);
        server.run_with(input.as_bytes(), server_end).await.unwrap();

        let mut written = String::new();
        client.read_to_string(&mut written).await.unwrap();
        let messages: Vec<Value> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(messages.len(), 4);

        let by_id = |id: u64| {
            messages
                .iter()
                .find(|m| m["id"] == json!(id))
                .unwrap_or_else(|| panic!("no response for id {}", id))
        };
        assert_eq!(by_id(1)["result"], json!({}));
        assert_eq!(
            by_id(2)["result"]["content"][0]["text"],
            "Successfully saved style with ID: calm"
        );
        assert_eq!(by_id(3)["result"]["tools"].as_array().unwrap().len(), 4);

        let parse_errors: Vec<&Value> = messages.iter().filter(|m| m["id"].is_null()).collect();
        assert_eq!(parse_errors.len(), 1);
        assert_eq!(parse_errors[0]["error"]["code"], PARSE_ERROR);
    }
}
