//! Object Management Tools
//!
//! - tos_put_object - Upload text or base64 content
//! - tos_get_object - Download content as UTF-8 or base64
//! - tos_list_objects - List one page of objects
//! - tos_delete_object - Delete an object

use std::sync::Arc;

use mcp_server::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::encoding::{self, Encoding};
use super::{bucket_name, object_key};
use crate::storage::{ListObjectsRequest, StorageClient};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
struct ObjectInput {
    bucket_name: String,
    object_key: String,
}

// =============================================================================
// tos_put_object
// =============================================================================

#[derive(Debug, Deserialize)]
struct PutObjectInput {
    bucket_name: String,
    object_key: String,
    content: String,
    content_type: String,
    is_base64: bool,
}

/// Uploads an object from text or base64 content.
pub struct PutObjectTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl PutObjectTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_put_object",
                "Upload an object to TOS",
                ParameterSchema::new(vec![
                    bucket_name(),
                    object_key("Object key"),
                    ParameterSpec::string("content")
                        .describe("Object content, plain text or base64 encoded")
                        .required(),
                    ParameterSpec::string("content_type")
                        .describe("Content type")
                        .default_value(DEFAULT_CONTENT_TYPE),
                    ParameterSpec::boolean("is_base64")
                        .describe("Whether content is base64 encoded")
                        .default_value(false),
                ]),
            ),
        }
    }
}

#[async_trait]
impl Tool for PutObjectTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to upload object"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: PutObjectInput = typed_arguments(arguments)?;
        let data = encoding::decode(&input.content, input.is_base64).map_err(|e| {
            ToolError::InvalidArguments(format!("content is not valid base64: {e}"))
        })?;
        debug!(bucket = %input.bucket_name, key = %input.object_key, size = data.len(), "uploading object");

        let output = self
            .client
            .put_object(&input.bucket_name, &input.object_key, data, &input.content_type)
            .await
            .map_err(ToolError::execution)?;

        Ok(ToolResult::text(format!(
            "Uploaded object: {} (ETag: {})",
            input.object_key,
            output.etag.as_deref().unwrap_or("unknown")
        )))
    }
}

// =============================================================================
// tos_get_object
// =============================================================================

#[derive(Debug, Deserialize)]
struct GetObjectInput {
    bucket_name: String,
    object_key: String,
    return_as_base64: bool,
}

#[derive(Debug, Serialize)]
struct GetObjectOutput {
    content: String,
    content_type: Option<String>,
    content_length: u64,
    encoding: Encoding,
}

/// Downloads an object as UTF-8 text, or base64 when requested or needed.
pub struct GetObjectTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl GetObjectTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_get_object",
                "Download an object from TOS",
                ParameterSchema::new(vec![
                    bucket_name(),
                    object_key("Object key"),
                    ParameterSpec::boolean("return_as_base64")
                        .describe("Return the content base64 encoded")
                        .default_value(false),
                ]),
            ),
        }
    }
}

#[async_trait]
impl Tool for GetObjectTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to download object"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: GetObjectInput = typed_arguments(arguments)?;
        let body = self
            .client
            .get_object(&input.bucket_name, &input.object_key)
            .await
            .map_err(ToolError::execution)?;

        let encoded = encoding::encode(body.data, input.return_as_base64);
        ToolResult::json(&GetObjectOutput {
            content: encoded.content,
            content_type: body.content_type,
            content_length: body.content_length,
            encoding: encoded.encoding,
        })
    }
}

// =============================================================================
// tos_list_objects
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListObjectsInput {
    bucket_name: String,
    prefix: String,
    delimiter: String,
    max_keys: u32,
}

/// Lists one page of objects.
pub struct ListObjectsTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl ListObjectsTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_list_objects",
                "List objects in a TOS bucket",
                ParameterSchema::new(vec![
                    bucket_name(),
                    ParameterSpec::string("prefix")
                        .describe("Key prefix")
                        .default_value(""),
                    ParameterSpec::string("delimiter")
                        .describe("Delimiter used to group keys")
                        .default_value(""),
                    ParameterSpec::integer("max_keys")
                        .describe("Maximum number of entries to return")
                        .default_value(ListObjectsRequest::DEFAULT_MAX_KEYS),
                ]),
            ),
        }
    }
}

#[async_trait]
impl Tool for ListObjectsTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to list objects"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: ListObjectsInput = typed_arguments(arguments)?;
        let request = ListObjectsRequest::new(input.bucket_name)
            .prefix(input.prefix)
            .delimiter(input.delimiter)
            .max_keys(input.max_keys);

        let listing = self
            .client
            .list_objects(request)
            .await
            .map_err(ToolError::execution)?;
        ToolResult::json(&listing)
    }
}

// =============================================================================
// tos_delete_object
// =============================================================================

/// Deletes an object.
pub struct DeleteObjectTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl DeleteObjectTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_delete_object",
                "Delete an object from TOS",
                ParameterSchema::new(vec![bucket_name(), object_key("Object key")]),
            ),
        }
    }
}

#[async_trait]
impl Tool for DeleteObjectTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to delete object"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: ObjectInput = typed_arguments(arguments)?;
        self.client
            .delete_object(&input.bucket_name, &input.object_key)
            .await
            .map_err(ToolError::execution)?;

        Ok(ToolResult::text(format!("Deleted object: {}", input.object_key)))
    }
}
