//! Presigned URL tool.

use std::sync::Arc;
use std::time::Duration;

use mcp_server::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{bucket_name, object_key};
use crate::storage::{HttpMethod, StorageClient};

/// Expiry used when the caller does not choose one.
pub const DEFAULT_EXPIRES_SECS: u64 = 3600;

#[derive(Debug, Deserialize)]
struct PresignedUrlInput {
    bucket_name: String,
    object_key: String,
    method: String,
    expires: u64,
}

#[derive(Debug, Serialize)]
struct PresignedUrlOutput {
    url: String,
    method: HttpMethod,
    expires_in: u64,
    bucket: String,
    key: String,
}

/// Signs a time-limited URL for one object and method.
pub struct PresignedUrlTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl PresignedUrlTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_presigned_url",
                "Generate a presigned URL",
                ParameterSchema::new(vec![
                    bucket_name(),
                    object_key("Object key"),
                    ParameterSpec::string("method")
                        .describe("HTTP method")
                        .allowed(HttpMethod::ALL.map(|m| m.as_str()))
                        .default_value(HttpMethod::default().as_str()),
                    ParameterSpec::integer("expires")
                        .describe("Expiry in seconds")
                        .default_value(DEFAULT_EXPIRES_SECS),
                ]),
            ),
        }
    }
}

#[async_trait]
impl Tool for PresignedUrlTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to generate presigned URL"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: PresignedUrlInput = typed_arguments(arguments)?;
        let method: HttpMethod = input.method.parse().map_err(ToolError::execution)?;

        let url = self
            .client
            .presign(
                method,
                &input.bucket_name,
                &input.object_key,
                Duration::from_secs(input.expires),
            )
            .await
            .map_err(ToolError::execution)?;

        ToolResult::json(&PresignedUrlOutput {
            url,
            method,
            expires_in: input.expires,
            bucket: input.bucket_name,
            key: input.object_key,
        })
    }
}
