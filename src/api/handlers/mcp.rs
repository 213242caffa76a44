use crate::AppState;
use crate::api::error::{RpcError, RpcResponse};
use crate::api::tools::{self, ToolCall};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::{debug, info};

pub const SERVER_NAME: &str = "S3 File Manager";
pub const PROTOCOL_VERSION: &str = "2025-03-26";

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    /// `None` only when the member is absent; `"id": null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    protocol_version: Option<String>,
}

pub async fn handle_rpc(
    State(state): State<AppState>,
    payload: Result<Json<RpcRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        // Well-formed JSON that is not a request object
        Err(JsonRejection::JsonDataError(e)) => {
            return RpcResponse::failure(Value::Null, RpcError::InvalidRequest(e.body_text()))
                .into_response();
        }
        Err(rejection) => {
            return RpcResponse::failure(Value::Null, RpcError::Parse(rejection.body_text()))
                .into_response();
        }
    };

    // Notifications carry no id and get no reply
    let Some(id) = request.id else {
        debug!("🔔 Notification '{}'", request.method);
        return StatusCode::ACCEPTED.into_response();
    };

    if request.jsonrpc != "2.0" {
        return RpcResponse::failure(
            id,
            RpcError::InvalidRequest(format!("unsupported jsonrpc version '{}'", request.jsonrpc)),
        )
        .into_response();
    }

    match dispatch(&state, &request.method, request.params).await {
        Ok(result) => RpcResponse::success(id, result),
        Err(e) => RpcResponse::failure(id, e),
    }
    .into_response()
}

async fn dispatch(state: &AppState, method: &str, params: Value) -> Result<Value, RpcError> {
    match method {
        "initialize" => {
            let requested = serde_json::from_value::<InitializeParams>(params)
                .ok()
                .and_then(|p| p.protocol_version);
            Ok(json!({
                "protocolVersion": requested.as_deref().unwrap_or(PROTOCOL_VERSION),
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }))
        }
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": tools::tool_definitions() })),
        "tools/call" => {
            let params: CallParams = serde_json::from_value(params)?;
            info!("🔧 Tool call '{}'", params.name);
            let call = ToolCall::parse(&params.name, params.arguments)?;
            let result = tools::call_tool(&state.file_manager, call).await;
            Ok(json!(result))
        }
        other => Err(RpcError::MethodNotFound(other.to_string())),
    }
}
