//! Bucket Management Tools
//!
//! - tos_create_bucket - Create a bucket with a canned ACL
//! - tos_list_buckets - List buckets
//! - tos_get_bucket_meta - Bucket region and storage class
//! - tos_delete_bucket - Delete an empty bucket

use std::sync::Arc;

use mcp_server::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::bucket_name;
use crate::storage::{Acl, BucketSummary, StorageClient};

// =============================================================================
// tos_create_bucket
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateBucketInput {
    bucket_name: String,
    acl: Acl,
}

pub struct CreateBucketTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl CreateBucketTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        let acl_names = Acl::ALL.map(|acl| acl.as_str());
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_create_bucket",
                "Create a TOS bucket",
                ParameterSchema::new(vec![
                    bucket_name(),
                    ParameterSpec::string("acl")
                        .describe("Access control")
                        .allowed(acl_names)
                        .default_value(Acl::default().as_str()),
                ]),
            ),
        }
    }
}

#[async_trait]
impl Tool for CreateBucketTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to create bucket"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: CreateBucketInput = typed_arguments(arguments)?;
        debug!(bucket = %input.bucket_name, acl = %input.acl, "creating bucket");

        self.client
            .create_bucket(&input.bucket_name, input.acl)
            .await
            .map_err(ToolError::execution)?;

        Ok(ToolResult::text(format!("Created bucket: {}", input.bucket_name)))
    }
}

// =============================================================================
// tos_list_buckets
// =============================================================================

pub struct ListBucketsTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl ListBucketsTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_list_buckets",
                "List TOS buckets",
                ParameterSchema::empty(),
            ),
        }
    }
}

#[async_trait]
impl Tool for ListBucketsTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to list buckets"
    }

    async fn execute(&self, _arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let buckets: Vec<BucketSummary> =
            self.client.list_buckets().await.map_err(ToolError::execution)?;
        ToolResult::json(&buckets)
    }
}

// =============================================================================
// tos_get_bucket_meta
// =============================================================================

#[derive(Debug, Deserialize)]
struct BucketInput {
    bucket_name: String,
}

#[derive(Debug, Serialize)]
struct BucketMetaOutput {
    bucket_name: String,
    region: Option<String>,
    storage_class: Option<String>,
}

pub struct GetBucketMetaTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl GetBucketMetaTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_get_bucket_meta",
                "Get bucket metadata",
                ParameterSchema::new(vec![bucket_name()]),
            ),
        }
    }
}

#[async_trait]
impl Tool for GetBucketMetaTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to get bucket metadata"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: BucketInput = typed_arguments(arguments)?;
        let meta = self
            .client
            .head_bucket(&input.bucket_name)
            .await
            .map_err(ToolError::execution)?;

        ToolResult::json(&BucketMetaOutput {
            bucket_name: input.bucket_name,
            region: meta.region,
            storage_class: meta.storage_class,
        })
    }
}

// =============================================================================
// tos_delete_bucket
// =============================================================================

pub struct DeleteBucketTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl DeleteBucketTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_delete_bucket",
                "Delete a TOS bucket",
                ParameterSchema::new(vec![bucket_name()]),
            ),
        }
    }
}

#[async_trait]
impl Tool for DeleteBucketTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to delete bucket"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: BucketInput = typed_arguments(arguments)?;
        self.client
            .delete_bucket(&input.bucket_name)
            .await
            .map_err(ToolError::execution)?;

        Ok(ToolResult::text(format!("Deleted bucket: {}", input.bucket_name)))
    }
}
