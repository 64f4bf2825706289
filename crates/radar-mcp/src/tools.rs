//! Tool definitions and dispatch.
//!
//! Each tool mirrors one HTTP endpoint and returns the same payload the HTTP
//! façade would put under `data`, serialized as text content. Failures set
//! `isError` instead of an HTTP status code.

use serde::Serialize;
use serde_json::{json, Value};

use radar_analysis::{AnalysisError, AnalysisService};
use radar_core::{AnalysisDepth, AnalysisRequest};

/// A tool exposed over the protocol.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One block of tool output. Only text content is produced here.
#[derive(Debug, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// The result of a `tools/call`.
#[derive(Debug, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolCallResult {
    fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string_pretty(payload) {
            Ok(text) => Self {
                content: vec![ToolContent { kind: "text", text }],
                is_error: false,
            },
            Err(e) => Self::error(format!("failed to serialize result: {e}")),
        }
    }

    fn error(message: String) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text",
                text: message,
            }],
            is_error: true,
        }
    }
}

/// The caller named a tool this server does not expose.
#[derive(Debug)]
pub struct UnknownTool(pub String);

/// The three tools, with JSON-Schema argument definitions.
#[must_use]
pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "analyze_brand_perception",
            description: "Run a fresh multi-model brand perception analysis and \
                          return the consensus score",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "brand_name": {
                        "type": "string",
                        "description": "Brand to analyze"
                    },
                    "competitors": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Competitor brands for positioning context"
                    },
                    "depth": {
                        "type": "string",
                        "enum": ["quick", "standard", "deep"],
                        "description": "Requested analysis thoroughness"
                    }
                },
                "required": ["brand_name"]
            }),
        },
        ToolDefinition {
            name: "get_brand_reports",
            description: "Fetch stored analysis reports for a brand, most recent first",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "brand_name": {
                        "type": "string",
                        "description": "Brand to fetch reports for"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of reports (default 10)"
                    }
                },
                "required": ["brand_name"]
            }),
        },
        ToolDefinition {
            name: "compare_brands",
            description: "Compare the latest consensus scores of two brands",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "brand1": { "type": "string", "description": "First brand" },
                    "brand2": { "type": "string", "description": "Second brand" }
                },
                "required": ["brand1", "brand2"]
            }),
        },
    ]
}

fn string_arg(arguments: &Value, key: &str) -> Option<String> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

fn tool_result(result: Result<ToolCallResult, AnalysisError>) -> ToolCallResult {
    result.unwrap_or_else(|e| match e {
        AnalysisError::Validation(msg) => ToolCallResult::error(msg.to_string()),
        AnalysisError::Store(e) => {
            tracing::error!(error = %e, "store operation failed");
            ToolCallResult::error(e.to_string())
        }
    })
}

/// Dispatch one `tools/call` to the shared service.
///
/// Validation and store failures come back as `isError` results; only an
/// unknown tool name is a protocol-level error.
///
/// # Errors
///
/// Returns [`UnknownTool`] when `name` matches none of the exposed tools.
pub async fn call_tool(
    service: &AnalysisService,
    name: &str,
    arguments: &Value,
) -> Result<ToolCallResult, UnknownTool> {
    match name {
        "analyze_brand_perception" => {
            let brand_name = string_arg(arguments, "brand_name").unwrap_or_default();
            let competitors = arguments
                .get("competitors")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(ToOwned::to_owned)
                        .collect()
                })
                .unwrap_or_default();
            let depth = arguments
                .get("depth")
                .and_then(|v| serde_json::from_value::<AnalysisDepth>(v.clone()).ok())
                .unwrap_or_default();

            let result = service
                .analyze(AnalysisRequest {
                    brand_name,
                    competitors,
                    depth,
                })
                .await
                .map(|run| ToolCallResult::ok(&run));
            Ok(tool_result(result))
        }
        "get_brand_reports" => {
            let brand_name = string_arg(arguments, "brand_name").unwrap_or_default();
            let limit = arguments.get("limit").and_then(Value::as_i64);

            let result = service
                .reports(&brand_name, limit)
                .await
                .map(|listing| ToolCallResult::ok(&listing));
            Ok(tool_result(result))
        }
        "compare_brands" => {
            let brand1 = string_arg(arguments, "brand1").unwrap_or_default();
            let brand2 = string_arg(arguments, "brand2").unwrap_or_default();

            let result = service
                .compare(&brand1, &brand2)
                .await
                .map(|outcome| ToolCallResult::ok(&outcome));
            Ok(tool_result(result))
        }
        other => Err(UnknownTool(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_analysis::MemoryReportStore;
    use std::sync::Arc;

    fn empty_service() -> AnalysisService {
        AnalysisService::new(vec![], Arc::new(MemoryReportStore::new()))
    }

    #[test]
    fn three_tools_are_exposed() {
        let tools = list_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "analyze_brand_perception",
                "get_brand_reports",
                "compare_brands"
            ]
        );
    }

    #[test]
    fn tool_definitions_serialize_with_camel_case_schema_key() {
        let json = serde_json::to_value(list_tools()).unwrap();
        assert!(json[0].get("inputSchema").is_some());
        assert_eq!(json[0]["inputSchema"]["required"][0], "brand_name");
    }

    #[tokio::test]
    async fn unknown_tool_is_a_protocol_error() {
        let service = empty_service();
        let result = call_tool(&service, "summon_brand_demon", &json!({})).await;
        assert!(matches!(result, Err(UnknownTool(ref name)) if name == "summon_brand_demon"));
    }

    #[tokio::test]
    async fn missing_brand_name_sets_error_flag() {
        let service = empty_service();
        let result = call_tool(&service, "analyze_brand_perception", &json!({}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(result.content[0].text, "brand_name is required");
    }

    #[tokio::test]
    async fn analyze_with_no_providers_returns_zeroed_consensus_text() {
        let service = empty_service();
        let result = call_tool(
            &service,
            "analyze_brand_perception",
            &json!({"brand_name": "Acme"}),
        )
        .await
        .unwrap();

        assert!(!result.is_error);
        let payload: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(payload["consensus"]["overall_score"], 0);
        assert_eq!(payload["consensus"]["message"], "No valid model responses");
    }

    #[tokio::test]
    async fn reports_for_unknown_brand_is_an_empty_listing() {
        let service = empty_service();
        let result = call_tool(&service, "get_brand_reports", &json!({"brand_name": "Acme"}))
            .await
            .unwrap();

        assert!(!result.is_error);
        let payload: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(payload["total_reports"], 0);
    }

    #[tokio::test]
    async fn compare_without_history_reports_partial() {
        let service = empty_service();
        let result = call_tool(
            &service,
            "compare_brands",
            &json!({"brand1": "Acme", "brand2": "Globex"}),
        )
        .await
        .unwrap();

        assert!(!result.is_error);
        let payload: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(payload["status"], "partial");
        assert_eq!(payload["available"]["Acme"], false);
    }

    #[tokio::test]
    async fn compare_with_one_name_missing_sets_error_flag() {
        let service = empty_service();
        let result = call_tool(&service, "compare_brands", &json!({"brand1": "Acme"}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(result.content[0].text, "brand1 and brand2 are required");
    }
}
