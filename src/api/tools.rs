//! Tool registry: descriptors, argument parsing, execution and text rendering.
//!
//! Every tool returns human-readable text. Operation failures become a result
//! with `isError` set and text prefixed with `❌`.

use crate::api::error::RpcError;
use crate::error::AppError;
use crate::services::file_manager::FileManager;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;

pub const NO_FILES: &str = "No files found.";

#[derive(Debug, Deserialize)]
pub struct BucketArgs {
    pub bucket_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ObjectArgs {
    pub bucket_name: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadTextArgs {
    pub bucket_name: String,
    pub key: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadFileArgs {
    pub bucket_name: String,
    pub file_path: String,
    #[serde(default)]
    pub s3_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportArgs {
    pub bucket_name: String,
    pub key: String,
    pub lines: Vec<String>,
}

#[derive(Debug)]
pub enum ToolCall {
    ListFiles(BucketArgs),
    DeleteFile(ObjectArgs),
    UploadText(UploadTextArgs),
    UploadFile(UploadFileArgs),
    DownloadAndPreview(ObjectArgs),
    UploadReport(ReportArgs),
}

impl ToolCall {
    pub fn parse(name: &str, arguments: Value) -> Result<Self, RpcError> {
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        Ok(match name {
            "list_files" => ToolCall::ListFiles(serde_json::from_value(arguments)?),
            "delete_file" => ToolCall::DeleteFile(serde_json::from_value(arguments)?),
            "upload_text" => ToolCall::UploadText(serde_json::from_value(arguments)?),
            "upload_file" => ToolCall::UploadFile(serde_json::from_value(arguments)?),
            "download_and_preview" => {
                ToolCall::DownloadAndPreview(serde_json::from_value(arguments)?)
            }
            "upload_report" => ToolCall::UploadReport(serde_json::from_value(arguments)?),
            other => return Err(RpcError::InvalidParams(format!("Unknown tool: {other}"))),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self::lines(vec![text.into()])
    }

    pub fn lines(lines: Vec<String>) -> Self {
        Self {
            content: lines
                .into_iter()
                .map(|text| TextContent { kind: "text", text })
                .collect(),
            is_error: false,
        }
    }

    pub fn failure(context: &str, err: AppError) -> Self {
        error!(kind = err.kind(), "{}: {}", context, err);
        Self {
            content: vec![TextContent {
                kind: "text",
                text: format!("❌ {context}: {err}"),
            }],
            is_error: true,
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.content.iter().map(|c| c.text.as_str()).collect()
    }
}

/// An empty bucket is reported with a single sentinel line.
pub fn render_listing(keys: Vec<String>) -> Vec<String> {
    if keys.is_empty() {
        vec![NO_FILES.to_string()]
    } else {
        keys
    }
}

pub async fn call_tool(manager: &FileManager, call: ToolCall) -> ToolResult {
    match call {
        ToolCall::ListFiles(args) => match manager.list_files(&args.bucket_name).await {
            Ok(keys) => ToolResult::lines(render_listing(keys)),
            Err(e) => ToolResult::failure("List failed", e),
        },
        ToolCall::DeleteFile(args) => {
            match manager.delete_file(&args.bucket_name, &args.key).await {
                Ok(()) => ToolResult::text(format!(
                    "🗑️ Deleted '{}' from '{}'.",
                    args.key.trim(),
                    args.bucket_name.trim()
                )),
                Err(e) => ToolResult::failure("Delete failed", e),
            }
        }
        ToolCall::UploadText(args) => {
            match manager
                .upload_text(&args.bucket_name, &args.key, &args.content)
                .await
            {
                Ok(()) => ToolResult::text(format!(
                    "✅ Uploaded text content as '{}'.",
                    args.key.trim()
                )),
                Err(e) => ToolResult::failure("Upload failed", e),
            }
        }
        ToolCall::UploadFile(args) => {
            match manager
                .upload_file(&args.bucket_name, &args.file_path, args.s3_key.as_deref())
                .await
            {
                Ok(key) => ToolResult::text(format!(
                    "✅ Uploaded '{}' as '{}'",
                    args.file_path.trim(),
                    key
                )),
                Err(e) => ToolResult::failure("Upload failed", e),
            }
        }
        ToolCall::DownloadAndPreview(args) => {
            match manager
                .download_and_preview(&args.bucket_name, &args.key)
                .await
            {
                Ok(preview) => ToolResult::text(preview.into_text()),
                Err(e) => ToolResult::failure("Error during file preview", e),
            }
        }
        ToolCall::UploadReport(args) => {
            match manager
                .upload_report(&args.bucket_name, &args.key, &args.lines)
                .await
            {
                Ok(()) => ToolResult::text(format!("✅ Uploaded report as '{}'", args.key.trim())),
                Err(e) => ToolResult::failure("Upload failed", e),
            }
        }
    }
}

pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "list_files",
            "description": "List all objects in a given S3 bucket.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "bucket_name": { "type": "string" }
                },
                "required": ["bucket_name"]
            }
        }),
        json!({
            "name": "delete_file",
            "description": "Delete a file from a bucket.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "bucket_name": { "type": "string" },
                    "key": { "type": "string" }
                },
                "required": ["bucket_name", "key"]
            }
        }),
        json!({
            "name": "upload_text",
            "description": "Upload string content as a text file to S3.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "bucket_name": { "type": "string" },
                    "key": { "type": "string" },
                    "content": { "type": "string" }
                },
                "required": ["bucket_name", "key", "content"]
            }
        }),
        json!({
            "name": "upload_file",
            "description": "Upload a local file to S3. The key defaults to the file's base name.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "bucket_name": { "type": "string" },
                    "file_path": { "type": "string" },
                    "s3_key": { "type": ["string", "null"] }
                },
                "required": ["bucket_name", "file_path"]
            }
        }),
        json!({
            "name": "download_and_preview",
            "description": "Download and return preview of .txt or .pdf file from S3.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "bucket_name": { "type": "string" },
                    "key": { "type": "string" }
                },
                "required": ["bucket_name", "key"]
            }
        }),
        json!({
            "name": "upload_report",
            "description": "Upload a multi-line report as a .txt file to S3.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "bucket_name": { "type": "string" },
                    "key": { "type": "string" },
                    "lines": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["bucket_name", "key", "lines"]
            }
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_listing() {
        assert_eq!(render_listing(vec![]), vec![NO_FILES.to_string()]);
        assert_eq!(
            render_listing(vec!["a.txt".into(), "b.pdf".into()]),
            vec!["a.txt".to_string(), "b.pdf".to_string()]
        );
    }

    #[test]
    fn test_parse_known_tools() {
        let call = ToolCall::parse("list_files", json!({ "bucket_name": "docs" })).unwrap();
        assert!(matches!(call, ToolCall::ListFiles(BucketArgs { ref bucket_name }) if bucket_name == "docs"));

        let call = ToolCall::parse(
            "upload_file",
            json!({ "bucket_name": "docs", "file_path": "/tmp/a.pdf" }),
        )
        .unwrap();
        assert!(matches!(call, ToolCall::UploadFile(UploadFileArgs { s3_key: None, .. })));

        let call = ToolCall::parse(
            "upload_report",
            json!({ "bucket_name": "docs", "key": "r.txt", "lines": ["a", "b"] }),
        )
        .unwrap();
        assert!(matches!(call, ToolCall::UploadReport(ReportArgs { ref lines, .. }) if lines.len() == 2));
    }

    #[test]
    fn test_parse_rejects_unknown_tool() {
        let err = ToolCall::parse("rename_file", json!({})).unwrap_err();
        assert_eq!(err.code(), -32602);
        assert!(err.to_string().contains("rename_file"));
    }

    #[test]
    fn test_parse_rejects_missing_arguments() {
        let err = ToolCall::parse("delete_file", json!({ "bucket_name": "docs" })).unwrap_err();
        assert!(matches!(err, RpcError::InvalidParams(_)));

        let err = ToolCall::parse("list_files", Value::Null).unwrap_err();
        assert!(matches!(err, RpcError::InvalidParams(_)));
    }

    #[test]
    fn test_failure_is_marked() {
        let result = ToolResult::failure("Upload failed", AppError::store("upload_file", "denied"));
        assert!(result.is_error);
        assert_eq!(
            result.texts(),
            vec!["❌ Upload failed: Store error during upload_file: denied"]
        );
    }

    #[test]
    fn test_result_serializes_as_tool_content() {
        let value = serde_json::to_value(ToolResult::text("hi")).unwrap();
        assert_eq!(
            value,
            json!({ "content": [{ "type": "text", "text": "hi" }], "isError": false })
        );
    }

    #[test]
    fn test_definitions_cover_every_tool() {
        let names: Vec<String> = tool_definitions()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "list_files",
                "delete_file",
                "upload_text",
                "upload_file",
                "download_and_preview",
                "upload_report"
            ]
        );
        for name in &names {
            assert!(ToolCall::parse(name, json!({})).is_err());
        }
    }
}
