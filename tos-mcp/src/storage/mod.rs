//! Object storage adapter.
//!
//! [`StorageClient`] is the boundary between the tools and the object
//! storage service. Two implementations exist:
//!
//! - [`TosClient`]: the TOS service through its S3-compatible endpoint
//! - [`MemoryStorage`]: an in-process backend with the same observable
//!   behavior, used by tests
//!
//! Clients are built once at startup and shared read-only across sessions
//! behind an `Arc<dyn StorageClient>`.
//!
//! ```rust
//! use tos_mcp::storage::{Acl, MemoryStorage, StorageClient};
//!
//! # tokio_test::block_on(async {
//! let storage = MemoryStorage::new();
//! storage.create_bucket("photos", Acl::Private).await.unwrap();
//! storage
//!     .put_object("photos", "cat.txt", b"meow".to_vec(), "text/plain")
//!     .await
//!     .unwrap();
//!
//! let body = storage.get_object("photos", "cat.txt").await.unwrap();
//! assert_eq!(body.data, b"meow");
//! # });
//! ```

mod error;
mod memory;
mod tos;
mod types;

use std::time::Duration;

use async_trait::async_trait;

pub use error::{Result, StorageError, UnsupportedAcl, UnsupportedMethod};
pub use memory::{MemoryStorage, StorageCall};
pub use tos::TosClient;
pub use types::{
    Acl, BucketMeta, BucketSummary, HttpMethod, ListObjectsRequest, ObjectBody, ObjectListing,
    ObjectSummary, PutObjectOutput, SaveTarget,
};

/// Operations the tools need from an object storage service.
///
/// Every failure is a [`StorageError`] with a readable message.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Create a bucket with a canned ACL
    async fn create_bucket(&self, bucket: &str, acl: Acl) -> Result<()>;

    /// List buckets owned by the credentials
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>>;

    /// Fetch bucket metadata
    async fn head_bucket(&self, bucket: &str) -> Result<BucketMeta>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Upload an object, replacing any existing one
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<PutObjectOutput>;

    /// Download an object in full
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody>;

    /// List one page of objects
    async fn list_objects(&self, request: ListObjectsRequest) -> Result<ObjectListing>;

    /// Delete an object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Sign a URL granting `method` on `bucket`/`key` for `expires`
    async fn presign(
        &self,
        method: HttpMethod,
        bucket: &str,
        key: &str,
        expires: Duration,
    ) -> Result<String>;

    /// Download an object through the media processing pipeline.
    ///
    /// `process` is a processing instruction such as `image/resize,w_100`.
    /// With a `save` target the service also writes the processed result
    /// there; the returned body is the processed output either way.
    async fn get_object_with_process(
        &self,
        bucket: &str,
        key: &str,
        process: &str,
        save: Option<&SaveTarget>,
    ) -> Result<ObjectBody>;
}
