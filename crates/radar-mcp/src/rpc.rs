//! Newline-delimited JSON-RPC 2.0 over stdin/stdout.
//!
//! One request per line in, one response per line out. Notifications get no
//! response. The loop ends when stdin closes.

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use radar_analysis::AnalysisService;

use crate::tools::{call_tool, list_tools};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn result_response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

/// Handle one request, returning the response to emit — or `None` for
/// notifications, which never get one.
pub async fn handle_request(service: &AnalysisService, request: JsonRpcRequest) -> Option<Value> {
    // Requests without an id are notifications; nothing is ever written back
    // for them, whatever the method.
    let id = request.id?;

    let response = match request.method.as_str() {
        "initialize" => result_response(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "vibesradar-mcp",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        ),
        "ping" => result_response(id, json!({})),
        "tools/list" => result_response(id, json!({ "tools": list_tools() })),
        "tools/call" => {
            let Some(name) = request.params.get("name").and_then(Value::as_str) else {
                return Some(error_response(id, INVALID_PARAMS, "missing tool name"));
            };
            let default_args = json!({});
            let arguments = request.params.get("arguments").unwrap_or(&default_args);

            match call_tool(service, name, arguments).await {
                Ok(result) => {
                    // ToolCallResult serialization is infallible in practice;
                    // fall back to a protocol error rather than panicking.
                    match serde_json::to_value(&result) {
                        Ok(value) => result_response(id, value),
                        Err(e) => error_response(
                            id,
                            INVALID_PARAMS,
                            &format!("failed to encode result: {e}"),
                        ),
                    }
                }
                Err(unknown) => error_response(
                    id,
                    INVALID_PARAMS,
                    &format!("Unknown tool: {}", unknown.0),
                ),
            }
        }
        other => error_response(id, METHOD_NOT_FOUND, &format!("Method not found: {other}")),
    };

    Some(response)
}

/// Serve requests from stdin until it closes.
///
/// # Errors
///
/// Returns an [`std::io::Error`] if reading stdin or writing stdout fails.
pub async fn serve_stdio(service: &AnalysisService) -> std::io::Result<()> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => {
                tracing::debug!(method = %request.method, "handling request");
                handle_request(service, request).await
            }
            Err(e) => Some(error_response(
                Value::Null,
                PARSE_ERROR,
                &format!("Parse error: {e}"),
            )),
        };

        if let Some(response) = response {
            let mut payload = serde_json::to_vec(&response).map_err(std::io::Error::other)?;
            payload.push(b'\n');
            stdout.write_all(&payload).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_analysis::MemoryReportStore;
    use std::sync::Arc;

    fn empty_service() -> AnalysisService {
        AnalysisService::new(vec![], Arc::new(MemoryReportStore::new()))
    }

    fn request(id: i64, method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            id: Some(json!(id)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn initialize_reports_tool_capability() {
        let service = empty_service();
        let response = handle_request(&service, request(1, "initialize", json!({})))
            .await
            .unwrap();

        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "vibesradar-mcp");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn tools_list_returns_all_three() {
        let service = empty_service();
        let response = handle_request(&service, request(2, "tools/list", json!({})))
            .await
            .unwrap();

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0]["name"], "analyze_brand_perception");
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let service = empty_service();
        let notification = JsonRpcRequest {
            id: None,
            method: "notifications/initialized".to_string(),
            params: json!({}),
        };
        assert!(handle_request(&service, notification).await.is_none());
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let service = empty_service();
        let response = handle_request(&service, request(3, "resources/list", json!({})))
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn tools_call_without_name_is_invalid_params() {
        let service = empty_service();
        let response = handle_request(&service, request(4, "tools/call", json!({})))
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn tools_call_with_unknown_tool_is_invalid_params() {
        let service = empty_service();
        let response = handle_request(
            &service,
            request(5, "tools/call", json!({"name": "no_such_tool"})),
        )
        .await
        .unwrap();
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
        assert_eq!(response["error"]["message"], "Unknown tool: no_such_tool");
    }

    #[tokio::test]
    async fn tools_call_dispatches_and_wraps_result() {
        let service = empty_service();
        let response = handle_request(
            &service,
            request(
                6,
                "tools/call",
                json!({
                    "name": "get_brand_reports",
                    "arguments": { "brand_name": "Acme" }
                }),
            ),
        )
        .await
        .unwrap();

        assert_eq!(response["result"]["isError"], false);
        assert_eq!(response["result"]["content"][0]["type"], "text");
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["brand_name"], "Acme");
        assert_eq!(payload["total_reports"], 0);
    }
}
