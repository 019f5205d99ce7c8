//! TOS storage tools.
//!
//! Thirteen tools in four groups:
//!
//! **Buckets ([`bucket`]):**
//! - tos_create_bucket
//! - tos_list_buckets
//! - tos_get_bucket_meta
//! - tos_delete_bucket
//!
//! **Objects ([`object`]):**
//! - tos_put_object
//! - tos_get_object
//! - tos_list_objects
//! - tos_delete_object
//!
//! **Presigned URLs ([`presign`]):**
//! - tos_presigned_url
//!
//! **Media processing ([`media`]):**
//! - tos_image_info
//! - tos_image_process
//! - tos_video_snapshot
//! - tos_video_info
//!
//! Every tool holds the shared [`StorageClient`] and reports failures as
//! text prefixed with its own failure message.

pub mod bucket;
pub mod encoding;
pub mod media;
pub mod object;
pub mod presign;

use std::sync::Arc;

use mcp_server::prelude::*;

use crate::storage::StorageClient;

pub use bucket::{CreateBucketTool, DeleteBucketTool, GetBucketMetaTool, ListBucketsTool};
pub use media::{
    ImageInfoTool, ImageProcessTool, SETTLE_DELAY, VideoInfoTool, VideoSnapshotTool,
};
pub use object::{DeleteObjectTool, GetObjectTool, ListObjectsTool, PutObjectTool};
pub use presign::PresignedUrlTool;

/// Name reported to clients during the handshake.
pub const SERVER_NAME: &str = "tos-mcp";

const INSTRUCTIONS: &str = "Tools for TOS object storage: manage buckets and objects, \
    generate presigned URLs, inspect images and videos, and persist processed media.";

/// Every tool, in catalog order.
pub fn default_tools(client: Arc<dyn StorageClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(CreateBucketTool::new(client.clone())),
        Arc::new(ListBucketsTool::new(client.clone())),
        Arc::new(GetBucketMetaTool::new(client.clone())),
        Arc::new(DeleteBucketTool::new(client.clone())),
        Arc::new(PutObjectTool::new(client.clone())),
        Arc::new(GetObjectTool::new(client.clone())),
        Arc::new(ListObjectsTool::new(client.clone())),
        Arc::new(DeleteObjectTool::new(client.clone())),
        Arc::new(PresignedUrlTool::new(client.clone())),
        Arc::new(ImageInfoTool::new(client.clone())),
        Arc::new(ImageProcessTool::new(client.clone())),
        Arc::new(VideoSnapshotTool::new(client.clone())),
        Arc::new(VideoInfoTool::new(client)),
    ]
}

/// Server exposing [`default_tools`] over `client`.
pub fn build_server(client: Arc<dyn StorageClient>) -> mcp_server::Result<McpServer> {
    McpServer::builder()
        .name(SERVER_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .instructions(INSTRUCTIONS)
        .tools(default_tools(client))
        .build()
}

// =============================================================================
// Shared parameters
// =============================================================================

fn bucket_name() -> ParameterSpec {
    ParameterSpec::string("bucket_name").describe("Bucket name").required()
}

fn object_key(description: &str) -> ParameterSpec {
    ParameterSpec::string("object_key").describe(description).required()
}
