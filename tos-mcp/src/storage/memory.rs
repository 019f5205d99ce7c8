//! In-memory storage backend for testing
//!
//! [`MemoryStorage`] keeps buckets and objects in process memory and mimics
//! the service closely enough for the tools to be exercised end to end:
//! bucket existence checks, prefix/delimiter listing with truncation,
//! deterministic presigned URLs, `image/info` and `video/info` metadata
//! renditions, and processing that writes the derived object back.
//!
//! Tests can script the backend with [`MemoryStorage::set_process_response`]
//! and [`MemoryStorage::fail_next`], and inspect every request through
//! [`MemoryStorage::calls`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::{Result, StorageError};
use super::types::{
    Acl, BucketMeta, BucketSummary, HttpMethod, ListObjectsRequest, ObjectBody, ObjectListing,
    ObjectSummary, PutObjectOutput, SaveTarget,
};
use super::StorageClient;

const DEFAULT_REGION: &str = "memory";
const STORAGE_CLASS: &str = "STANDARD";

/// A request received by [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    CreateBucket { bucket: String, acl: Acl },
    ListBuckets,
    HeadBucket { bucket: String },
    DeleteBucket { bucket: String },
    PutObject { bucket: String, key: String, content_type: String, size: usize },
    GetObject { bucket: String, key: String },
    ListObjects(ListObjectsRequest),
    DeleteObject { bucket: String, key: String },
    Presign { method: HttpMethod, bucket: String, key: String, expires: Duration },
    Process { bucket: String, key: String, process: String, save: Option<SaveTarget> },
}

struct StoredObject {
    data: Vec<u8>,
    content_type: String,
    etag: String,
    last_modified: DateTime<Utc>,
}

struct Bucket {
    acl: Acl,
    created: DateTime<Utc>,
    objects: BTreeMap<String, StoredObject>,
}

#[derive(Default)]
struct State {
    buckets: BTreeMap<String, Bucket>,
    process_responses: HashMap<String, Vec<u8>>,
    pending_failure: Option<StorageError>,
    calls: Vec<StorageCall>,
}

/// In-process object store.
///
/// Clones share state.
#[derive(Clone)]
pub struct MemoryStorage {
    region: String,
    state: Arc<Mutex<State>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Empty store.
    pub fn new() -> Self {
        Self::with_region(DEFAULT_REGION)
    }

    /// Empty store reporting `region` as bucket location.
    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Store an object directly, creating the bucket if needed.
    ///
    /// Not journaled.
    pub fn insert_object(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>, content_type: &str) {
        let mut state = self.state.lock();
        let bucket = state
            .buckets
            .entry(bucket.to_string())
            .or_insert_with(|| Bucket::new(Acl::Private));
        bucket.objects.insert(key.to_string(), StoredObject::new(data.into(), content_type));
    }

    /// Create an empty bucket directly. Not journaled.
    pub fn insert_bucket(&self, bucket: &str) {
        self.state
            .lock()
            .buckets
            .entry(bucket.to_string())
            .or_insert_with(|| Bucket::new(Acl::Private));
    }

    /// Bytes stored under `bucket`/`key`.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let state = self.state.lock();
        state
            .buckets
            .get(bucket)
            .and_then(|b| b.objects.get(key))
            .map(|o| o.data.clone())
    }

    /// Content type stored under `bucket`/`key`.
    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        let state = self.state.lock();
        state
            .buckets
            .get(bucket)
            .and_then(|b| b.objects.get(key))
            .map(|o| o.content_type.clone())
    }

    /// Whether the bucket exists.
    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.state.lock().buckets.contains_key(bucket)
    }

    /// ACL the bucket was created with.
    pub fn bucket_acl(&self, bucket: &str) -> Option<Acl> {
        self.state.lock().buckets.get(bucket).map(|b| b.acl)
    }

    /// Answer `process` instructions with `body` instead of the default
    /// rendition. Matched against the exact instruction string.
    pub fn set_process_response(&self, process: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.state.lock().process_responses.insert(process.into(), body.into());
    }

    /// Fail the next request with `error`. The request is still journaled.
    pub fn fail_next(&self, error: StorageError) {
        self.state.lock().pending_failure = Some(error);
    }

    /// Every request received so far, oldest first.
    pub fn calls(&self) -> Vec<StorageCall> {
        self.state.lock().calls.clone()
    }

    /// Forget journaled requests.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn begin(&self, call: StorageCall) -> Result<MutexGuard<'_, State>> {
        debug!(?call, "memory storage request");
        let mut state = self.state.lock();
        state.calls.push(call);
        match state.pending_failure.take() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }

    fn presigned_url(method: HttpMethod, bucket: &str, key: &str, expires: Duration) -> String {
        let path = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "https://{bucket}.memory.invalid/{path}?X-Tos-Method={method}&X-Tos-Expires={}",
            expires.as_secs()
        )
    }
}

impl Bucket {
    fn new(acl: Acl) -> Self {
        Self {
            acl,
            created: Utc::now(),
            objects: BTreeMap::new(),
        }
    }
}

impl StoredObject {
    fn new(data: Vec<u8>, content_type: &str) -> Self {
        let etag = etag(&data);
        Self {
            data,
            content_type: content_type.to_string(),
            etag,
            last_modified: Utc::now(),
        }
    }

    fn body(&self) -> ObjectBody {
        ObjectBody::new(self.data.clone(), Some(self.content_type.clone()))
    }
}

impl State {
    fn bucket(&self, name: &str) -> Result<&Bucket> {
        self.buckets
            .get(name)
            .ok_or_else(|| StorageError::NotFound(format!("bucket {name}")))
    }

    fn bucket_mut(&mut self, name: &str) -> Result<&mut Bucket> {
        self.buckets
            .get_mut(name)
            .ok_or_else(|| StorageError::NotFound(format!("bucket {name}")))
    }

    fn object(&self, bucket: &str, key: &str) -> Result<&StoredObject> {
        self.bucket(bucket)?
            .objects
            .get(key)
            .ok_or_else(|| StorageError::NotFound(format!("object {bucket}/{key}")))
    }
}

fn etag(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let hex: String = digest.iter().take(16).map(|b| format!("{b:02x}")).collect();
    format!("\"{hex}\"")
}

fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidRequest(format!("{kind} must not be empty")));
    }
    Ok(())
}

/// Metadata document for `image/info` and `video/info`.
fn info_rendition(process: &str, key: &str, object: &StoredObject) -> Option<Vec<u8>> {
    let format = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    let document = match process {
        "image/info" => json!({
            "FileSize": {"value": object.data.len().to_string()},
            "Format": {"value": format},
        }),
        "video/info" => json!({
            "format": {
                "filename": key,
                "format_name": format,
                "size": object.data.len().to_string(),
            },
            "streams": [],
        }),
        _ => return None,
    };
    Some(document.to_string().into_bytes())
}

/// Content type of a derived object, from an `f_<ext>` or `format,<ext>`
/// option in the instruction.
fn derived_content_type(process: &str, source: &str) -> String {
    let format = process.split(',').find_map(|option| option.strip_prefix("f_")).or_else(|| {
        process
            .split_once("format,")
            .map(|(_, rest)| rest.split(['/', ',']).next().unwrap_or(rest))
    });
    match format {
        Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
        Some("png") => "image/png".to_string(),
        Some("webp") => "image/webp".to_string(),
        Some("gif") => "image/gif".to_string(),
        _ => source.to_string(),
    }
}

#[async_trait]
impl StorageClient for MemoryStorage {
    async fn create_bucket(&self, bucket: &str, acl: Acl) -> Result<()> {
        let mut state = self.begin(StorageCall::CreateBucket {
            bucket: bucket.to_string(),
            acl,
        })?;
        validate_name("bucket name", bucket)?;
        if state.buckets.contains_key(bucket) {
            return Err(StorageError::service(
                "BucketAlreadyExists",
                format!("bucket {bucket} already exists"),
            ));
        }
        state.buckets.insert(bucket.to_string(), Bucket::new(acl));
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        let state = self.begin(StorageCall::ListBuckets)?;
        Ok(state
            .buckets
            .iter()
            .map(|(name, bucket)| BucketSummary {
                name: name.clone(),
                creation_date: Some(bucket.created),
                location: Some(self.region.clone()),
            })
            .collect())
    }

    async fn head_bucket(&self, bucket: &str) -> Result<BucketMeta> {
        let state = self.begin(StorageCall::HeadBucket {
            bucket: bucket.to_string(),
        })?;
        state.bucket(bucket)?;
        Ok(BucketMeta {
            region: Some(self.region.clone()),
            storage_class: Some(STORAGE_CLASS.to_string()),
        })
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.begin(StorageCall::DeleteBucket {
            bucket: bucket.to_string(),
        })?;
        if !state.bucket(bucket)?.objects.is_empty() {
            return Err(StorageError::service(
                "BucketNotEmpty",
                format!("bucket {bucket} is not empty"),
            ));
        }
        state.buckets.remove(bucket);
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<PutObjectOutput> {
        let mut state = self.begin(StorageCall::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
        })?;
        validate_name("object key", key)?;
        let object = StoredObject::new(data, content_type);
        let etag = object.etag.clone();
        state.bucket_mut(bucket)?.objects.insert(key.to_string(), object);
        Ok(PutObjectOutput { etag: Some(etag) })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody> {
        let state = self.begin(StorageCall::GetObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })?;
        Ok(state.object(bucket, key)?.body())
    }

    async fn list_objects(&self, request: ListObjectsRequest) -> Result<ObjectListing> {
        let state = self.begin(StorageCall::ListObjects(request.clone()))?;
        let bucket = state.bucket(&request.bucket)?;
        let prefix = request.prefix.as_deref().unwrap_or("");

        let keys: Vec<(&String, &StoredObject)> = bucket
            .objects
            .iter()
            .filter(|(key, _)| match request.continuation_token.as_deref() {
                Some(token) => key.as_str() > token,
                None => true,
            })
            .filter(|(key, _)| key.starts_with(prefix))
            .collect();

        let max_keys = request.max_keys as usize;
        let mut listing = ObjectListing::default();
        let mut emitted = 0;
        let mut last_key = None;
        let mut i = 0;

        while i < keys.len() && emitted < max_keys {
            let (key, object) = keys[i];
            let group = request.delimiter.as_deref().and_then(|delimiter| {
                key[prefix.len()..]
                    .find(delimiter)
                    .map(|at| key[..prefix.len() + at + delimiter.len()].to_string())
            });

            match group {
                Some(common_prefix) => {
                    while i < keys.len() && keys[i].0.starts_with(&common_prefix) {
                        last_key = Some(keys[i].0);
                        i += 1;
                    }
                    listing.common_prefixes.push(common_prefix);
                }
                None => {
                    listing.objects.push(ObjectSummary {
                        key: key.clone(),
                        last_modified: Some(object.last_modified),
                        size: object.data.len() as u64,
                        etag: Some(object.etag.clone()),
                        storage_class: Some(STORAGE_CLASS.to_string()),
                    });
                    last_key = Some(key);
                    i += 1;
                }
            }
            emitted += 1;
        }

        // An empty page has nothing to resume after, so it is never truncated.
        if let Some(last) = last_key.filter(|_| i < keys.len()) {
            listing.is_truncated = true;
            listing.next_continuation_token = Some(last.clone());
        }
        Ok(listing)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut state = self.begin(StorageCall::DeleteObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })?;
        state.bucket_mut(bucket)?.objects.remove(key);
        Ok(())
    }

    async fn presign(
        &self,
        method: HttpMethod,
        bucket: &str,
        key: &str,
        expires: Duration,
    ) -> Result<String> {
        let _state = self.begin(StorageCall::Presign {
            method,
            bucket: bucket.to_string(),
            key: key.to_string(),
            expires,
        })?;
        validate_name("bucket name", bucket)?;
        validate_name("object key", key)?;
        Ok(Self::presigned_url(method, bucket, key, expires))
    }

    async fn get_object_with_process(
        &self,
        bucket: &str,
        key: &str,
        process: &str,
        save: Option<&SaveTarget>,
    ) -> Result<ObjectBody> {
        let mut state = self.begin(StorageCall::Process {
            bucket: bucket.to_string(),
            key: key.to_string(),
            process: process.to_string(),
            save: save.cloned(),
        })?;

        let source = state.object(bucket, key)?;
        let body = match state.process_responses.get(process) {
            Some(scripted) => ObjectBody::new(scripted.clone(), Some(source.content_type.clone())),
            None => match info_rendition(process, key, source) {
                Some(document) => ObjectBody::new(document, Some("application/json".to_string())),
                None => ObjectBody::new(
                    source.data.clone(),
                    Some(derived_content_type(process, &source.content_type)),
                ),
            },
        };

        if let Some(target) = save {
            let content_type = body.content_type.clone().unwrap_or_default();
            let derived = StoredObject::new(body.data.clone(), &content_type);
            state
                .bucket_mut(&target.bucket)?
                .objects
                .insert(target.key.clone(), derived);
        }
        Ok(body)
    }
}
