//! Media Processing Tools
//!
//! **Metadata:**
//! - tos_image_info - Image metadata via `image/info`
//! - tos_video_info - Video metadata via `video/info`
//!
//! **Persisted processing:**
//! - tos_image_process - Apply an image instruction and save the result
//! - tos_video_snapshot - Capture a frame and save it as an image
//!
//! Persisting tools read the processed body in full, wait [`SETTLE_DELAY`]
//! for the write-back to become visible, then sign a GET URL for the saved
//! object.

use std::sync::Arc;
use std::time::Duration;

use mcp_server::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use super::encoding::{self, Encoding};
use super::{bucket_name, object_key};
use crate::storage::{HttpMethod, SaveTarget, StorageClient, StorageError};

/// Pause between writing a processed object and signing its URL.
// TODO: poll the save target until it is readable instead of sleeping.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Lifetime of URLs to processed objects.
pub const DERIVED_URL_EXPIRY: Duration = Duration::from_secs(3600);

const RAW_NOTE: &str = "returned raw format data";
const BINARY_NOTE: &str = "returned raw format data (not UTF-8, base64-encoded)";

// =============================================================================
// Shared helpers
// =============================================================================

#[derive(Debug, Deserialize)]
struct MediaInput {
    bucket_name: String,
    object_key: String,
}

struct Persisted {
    presigned_url: String,
    processed_size: usize,
}

/// Runs `process` on the source, saves to `target` and signs a URL for it.
async fn persist(
    client: &dyn StorageClient,
    bucket: &str,
    key: &str,
    process: &str,
    target: &SaveTarget,
) -> Result<Persisted, StorageError> {
    let body = client
        .get_object_with_process(bucket, key, process, Some(target))
        .await?;
    debug!(process, size = body.data.len(), "processed object read");

    tokio::time::sleep(SETTLE_DELAY).await;

    let presigned_url = client
        .presign(HttpMethod::Get, &target.bucket, &target.key, DERIVED_URL_EXPIRY)
        .await?;
    info!(
        source = %format!("{bucket}/{key}"),
        target = %format!("{}/{}", target.bucket, target.key),
        "processed object saved"
    );

    Ok(Persisted {
        presigned_url,
        processed_size: body.data.len(),
    })
}

/// Fetches a metadata rendition and shapes the tool output.
///
/// Output that is not JSON is returned as a string with a note; output that
/// is not even UTF-8 is returned as base64.
async fn media_info(
    client: &dyn StorageClient,
    input: MediaInput,
    process: &str,
    field: &str,
) -> Result<ToolResult, ToolError> {
    let body = client
        .get_object_with_process(&input.bucket_name, &input.object_key, process, None)
        .await
        .map_err(ToolError::execution)?;
    let raw = encoding::encode(body.data, false);

    let (info, note) = match raw.encoding {
        Encoding::Base64 => {
            debug!(process, "metadata is not UTF-8");
            (Value::String(raw.content), Some(BINARY_NOTE))
        }
        Encoding::Utf8 => match serde_json::from_str::<Value>(&raw.content) {
            Ok(parsed) => (parsed, None),
            Err(e) => {
                debug!(error = %e, process, "metadata is not JSON");
                (Value::String(raw.content), Some(RAW_NOTE))
            }
        },
    };

    let mut output = Map::new();
    output.insert("bucket".into(), input.bucket_name.into());
    output.insert("key".into(), input.object_key.into());
    output.insert(field.into(), info);
    output.insert("status".into(), "success".into());
    if let Some(note) = note {
        output.insert("note".into(), note.into());
    }
    ToolResult::json(&output)
}

// =============================================================================
// tos_image_info
// =============================================================================

/// Reports image metadata.
pub struct ImageInfoTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl ImageInfoTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_image_info",
                "Get image information",
                ParameterSchema::new(vec![bucket_name(), object_key("Image object key")]),
            ),
        }
    }
}

#[async_trait]
impl Tool for ImageInfoTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to get image info"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: MediaInput = typed_arguments(arguments)?;
        media_info(self.client.as_ref(), input, "image/info", "image_info").await
    }
}

// =============================================================================
// tos_image_process
// =============================================================================

#[derive(Debug, Deserialize)]
struct ImageProcessInput {
    bucket_name: String,
    object_key: String,
    process: String,
    save_bucket: String,
    save_key: String,
}

#[derive(Debug, Serialize)]
struct ImageProcessOutput {
    presigned_url: String,
    source_bucket: String,
    source_key: String,
    save_bucket: String,
    save_key: String,
    process: String,
    processed_size: usize,
    expires_in: u64,
    status: &'static str,
}

/// Applies an image instruction and saves the result.
pub struct ImageProcessTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl ImageProcessTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_image_process",
                "Process an image and save the result (resize, format, quality, crop, rotate, ...)",
                ParameterSchema::new(vec![
                    bucket_name(),
                    object_key("Image object key"),
                    ParameterSpec::string("process")
                        .describe(
                            "Processing instruction, usually 'image/<operation>,<options>', \
                             e.g. 'image/resize,h_100' or 'image/format,jpg'",
                        )
                        .required(),
                    ParameterSpec::string("save_bucket")
                        .describe("Bucket receiving the processed image")
                        .required(),
                    ParameterSpec::string("save_key")
                        .describe("Object key of the processed image")
                        .required(),
                ]),
            ),
        }
    }
}

#[async_trait]
impl Tool for ImageProcessTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to process image"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: ImageProcessInput = typed_arguments(arguments)?;
        let target = SaveTarget::new(input.save_bucket, input.save_key);

        let persisted = persist(
            self.client.as_ref(),
            &input.bucket_name,
            &input.object_key,
            &input.process,
            &target,
        )
        .await
        .map_err(ToolError::execution)?;

        ToolResult::json(&ImageProcessOutput {
            presigned_url: persisted.presigned_url,
            source_bucket: input.bucket_name,
            source_key: input.object_key,
            save_bucket: target.bucket,
            save_key: target.key,
            process: input.process,
            processed_size: persisted.processed_size,
            expires_in: DERIVED_URL_EXPIRY.as_secs(),
            status: "processed",
        })
    }
}

// =============================================================================
// tos_video_snapshot
// =============================================================================

/// Image format of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    #[default]
    Jpg,
    Png,
}

impl SnapshotFormat {
    pub const ALL: [SnapshotFormat; 2] = [SnapshotFormat::Jpg, SnapshotFormat::Png];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Processing instruction capturing the frame at `time_ms`.
pub fn snapshot_process(time_ms: i64, format: SnapshotFormat) -> String {
    format!("video/snapshot,t_{time_ms},f_{}", format.as_str())
}

#[derive(Debug, Deserialize)]
struct VideoSnapshotInput {
    bucket_name: String,
    object_key: String,
    time: Number,
    format: SnapshotFormat,
    save_bucket: String,
    save_key: String,
}

#[derive(Debug, Serialize)]
struct VideoSnapshotOutput {
    presigned_url: String,
    source_bucket: String,
    source_key: String,
    save_bucket: String,
    save_key: String,
    time: Number,
    format: SnapshotFormat,
    processed_size: usize,
    expires_in: u64,
    status: &'static str,
}

/// Captures one video frame and saves it as an image.
pub struct VideoSnapshotTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl VideoSnapshotTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_video_snapshot",
                "Capture a video frame and save it",
                ParameterSchema::new(vec![
                    bucket_name(),
                    object_key("Video object key"),
                    ParameterSpec::number("time")
                        .describe("Capture position in milliseconds, e.g. 300 for the 300th millisecond")
                        .default_value(300),
                    ParameterSpec::string("format")
                        .describe("Output image format")
                        .allowed(SnapshotFormat::ALL.map(|f| f.as_str()))
                        .default_value(SnapshotFormat::default().as_str()),
                    ParameterSpec::string("save_bucket")
                        .describe("Bucket receiving the captured frame")
                        .required(),
                    ParameterSpec::string("save_key")
                        .describe("Object key of the captured frame")
                        .required(),
                ]),
            ),
        }
    }
}

#[async_trait]
impl Tool for VideoSnapshotTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to take video snapshot"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: VideoSnapshotInput = typed_arguments(arguments)?;
        let time_ms = input.time.as_f64().unwrap_or_default();
        if !time_ms.is_finite() || time_ms < 0.0 {
            return Err(ToolError::InvalidArguments(format!(
                "time must be a non-negative number of milliseconds, got {}",
                input.time
            )));
        }

        let process = snapshot_process(time_ms as i64, input.format);
        let target = SaveTarget::new(input.save_bucket, input.save_key);

        let persisted = persist(
            self.client.as_ref(),
            &input.bucket_name,
            &input.object_key,
            &process,
            &target,
        )
        .await
        .map_err(ToolError::execution)?;

        ToolResult::json(&VideoSnapshotOutput {
            presigned_url: persisted.presigned_url,
            source_bucket: input.bucket_name,
            source_key: input.object_key,
            save_bucket: target.bucket,
            save_key: target.key,
            time: input.time,
            format: input.format,
            processed_size: persisted.processed_size,
            expires_in: DERIVED_URL_EXPIRY.as_secs(),
            status: "processed",
        })
    }
}

// =============================================================================
// tos_video_info
// =============================================================================

/// Reports video metadata.
pub struct VideoInfoTool {
    client: Arc<dyn StorageClient>,
    descriptor: ToolDescriptor,
}

impl VideoInfoTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self {
            client,
            descriptor: ToolDescriptor::new(
                "tos_video_info",
                "Get video information",
                ParameterSchema::new(vec![bucket_name(), object_key("Video object key")]),
            ),
        }
    }
}

#[async_trait]
impl Tool for VideoInfoTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn failure_message(&self) -> &str {
        "failed to get video info"
    }

    async fn execute(&self, arguments: Map<String, Value>) -> Result<ToolResult, ToolError> {
        let input: MediaInput = typed_arguments(arguments)?;
        media_info(self.client.as_ref(), input, "video/info", "video_info").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageCall};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_snapshot_process_string() {
        assert_eq!(snapshot_process(300, SnapshotFormat::Jpg), "video/snapshot,t_300,f_jpg");
        assert_eq!(snapshot_process(1500, SnapshotFormat::Png), "video/snapshot,t_1500,f_png");
    }

    #[tokio::test]
    async fn test_image_info_parses_json() {
        let storage = MemoryStorage::new();
        storage.insert_object("b", "cat.jpg", vec![0u8; 10], "image/jpeg");
        let tool = ImageInfoTool::new(Arc::new(storage));

        let result = tool
            .execute(args(json!({"bucket_name": "b", "object_key": "cat.jpg"})))
            .await
            .unwrap();
        let output: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();

        assert_eq!(output["status"], "success");
        assert_eq!(output["image_info"]["FileSize"]["value"], "10");
        assert!(output.get("note").is_none());
    }

    #[tokio::test]
    async fn test_video_info_falls_back_to_raw_text() {
        let storage = MemoryStorage::new();
        storage.insert_object("b", "clip.mp4", b"...".to_vec(), "video/mp4");
        storage.set_process_response("video/info", "duration=12.5");
        let tool = VideoInfoTool::new(Arc::new(storage));

        let result = tool
            .execute(args(json!({"bucket_name": "b", "object_key": "clip.mp4"})))
            .await
            .unwrap();
        let output: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();

        assert_eq!(
            output,
            json!({
                "bucket": "b",
                "key": "clip.mp4",
                "video_info": "duration=12.5",
                "status": "success",
                "note": "returned raw format data"
            })
        );
    }

    #[tokio::test]
    async fn test_binary_metadata_is_base64_encoded() {
        let storage = MemoryStorage::new();
        storage.insert_object("b", "cat.jpg", vec![0u8; 4], "image/jpeg");
        storage.set_process_response("image/info", vec![0xffu8, 0xfe, 0x00, 0x41]);
        let tool = ImageInfoTool::new(Arc::new(storage));

        let result = tool
            .execute(args(json!({"bucket_name": "b", "object_key": "cat.jpg"})))
            .await
            .unwrap();
        let output: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();

        assert_eq!(output["image_info"], "//4AQQ==");
        assert_eq!(output["note"], BINARY_NOTE);
        assert_eq!(output["status"], "success");
    }

    #[tokio::test(start_paused = true)]
    async fn test_image_process_persists_and_signs_target() {
        let storage = MemoryStorage::new();
        storage.insert_object("src", "cat.jpg", b"pixels".to_vec(), "image/jpeg");
        storage.insert_bucket("thumbs");
        let tool = ImageProcessTool::new(Arc::new(storage.clone()));

        let started = tokio::time::Instant::now();
        let result = tool
            .execute(args(json!({
                "bucket_name": "src",
                "object_key": "cat.jpg",
                "process": "image/resize,w_100",
                "save_bucket": "thumbs",
                "save_key": "cat_small.jpg"
            })))
            .await
            .unwrap();
        assert!(started.elapsed() >= SETTLE_DELAY);

        let output: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(output["presigned_url"], "https://thumbs.memory.invalid/cat_small.jpg?X-Tos-Method=GET&X-Tos-Expires=3600");
        assert_eq!(output["processed_size"], 6);
        assert_eq!(output["expires_in"], 3600);
        assert_eq!(output["status"], "processed");
        assert_eq!(storage.object("thumbs", "cat_small.jpg"), Some(b"pixels".to_vec()));

        let calls = storage.calls();
        assert!(matches!(
            &calls[0],
            StorageCall::Process { process, save: Some(target), .. }
                if process == "image/resize,w_100" && target.bucket == "thumbs"
        ));
        assert!(matches!(
            &calls[1],
            StorageCall::Presign { method: HttpMethod::Get, bucket, key, .. }
                if bucket == "thumbs" && key == "cat_small.jpg"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_snapshot_defaults() {
        let storage = MemoryStorage::new();
        storage.insert_object("v", "clip.mp4", b"frames".to_vec(), "video/mp4");
        storage.insert_bucket("frames");
        let tool = VideoSnapshotTool::new(Arc::new(storage.clone()));

        let arguments = tool
            .descriptor()
            .schema()
            .validate(&args(json!({
                "bucket_name": "v",
                "object_key": "clip.mp4",
                "save_bucket": "frames",
                "save_key": "f.jpg"
            })))
            .unwrap();
        let result = tool.execute(arguments).await.unwrap();
        let output: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();

        assert_eq!(output["time"], 300);
        assert_eq!(output["format"], "jpg");
        assert!(matches!(
            &storage.calls()[0],
            StorageCall::Process { process, .. } if process == "video/snapshot,t_300,f_jpg"
        ));
    }

    #[tokio::test]
    async fn test_video_snapshot_rejects_negative_time() {
        let tool = VideoSnapshotTool::new(Arc::new(MemoryStorage::new()));
        let err = tool
            .execute(args(json!({
                "bucket_name": "v",
                "object_key": "clip.mp4",
                "time": -1,
                "format": "png",
                "save_bucket": "frames",
                "save_key": "f.png"
            })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_processing_failure_is_reported() {
        let storage = MemoryStorage::new();
        storage.insert_object("src", "a.jpg", b"x".to_vec(), "image/jpeg");
        storage.fail_next(StorageError::service("InvalidProcess", "unknown operation"));
        let tool = ImageProcessTool::new(Arc::new(storage.clone()));

        let err = tool
            .execute(args(json!({
                "bucket_name": "src",
                "object_key": "a.jpg",
                "process": "image/nope",
                "save_bucket": "src",
                "save_key": "b.jpg"
            })))
            .await
            .unwrap_err();
        assert_eq!(err.detail(), "InvalidProcess: unknown operation");
        // No URL is signed for a failed write-back.
        assert_eq!(storage.calls().len(), 1);
    }
}
