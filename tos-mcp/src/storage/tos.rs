//! TOS backend over the S3-compatible API.
//!
//! Request signing, retries and connection pooling are delegated to
//! `aws-sdk-s3`. TOS-specific media processing is expressed as extra query
//! parameters attached to a GetObject request before it is signed.
//!
//! The SDK presigns no object-level POST, so POST URLs are signed directly
//! with `aws-sigv4` using the client's credentials and region.

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use aws_sdk_s3::config::{
    BehaviorVersion, Credentials, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTime as SdkDateTime};
use aws_sdk_s3::types::BucketCannedAcl;
use aws_sdk_s3::Client;
use aws_sigv4::http_request::{
    sign, PercentEncodingMode, SignableBody, SignableRequest, SignatureLocation, SigningSettings,
    UriPathNormalizationMode,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::error::{Result, StorageError};
use super::types::{
    Acl, BucketMeta, BucketSummary, HttpMethod, ListObjectsRequest, ObjectBody, ObjectListing,
    ObjectSummary, PutObjectOutput, SaveTarget,
};
use super::StorageClient;
use crate::config::TosConfig;

const PROCESS_PARAM: &str = "x-tos-process";
const SAVE_BUCKET_PARAM: &str = "x-tos-save-bucket";
const SAVE_OBJECT_PARAM: &str = "x-tos-save-object";
const SIGNING_NAME: &str = "s3";

/// Storage client for the TOS service.
#[derive(Debug, Clone)]
pub struct TosClient {
    client: Client,
    credentials: Credentials,
    region: String,
    endpoint: String,
}

impl TosClient {
    /// Client for the configured endpoint and credentials.
    pub fn new(config: &TosConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "tos-mcp",
        );
        let sdk_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(config.endpoint.clone())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials.clone())
            .force_path_style(false)
            // TOS does not validate the flexible checksums newer SDKs send by default.
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
            .build();

        debug!(endpoint = %config.endpoint, region = %config.region, "TOS client configured");
        Self {
            client: Client::from_conf(sdk_config),
            credentials,
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    fn presigning_config(expires: Duration) -> Result<PresigningConfig> {
        PresigningConfig::expires_in(expires)
            .map_err(|e| StorageError::InvalidRequest(format!("invalid expiry {expires:?}: {e}")))
    }

    /// Query-signed POST URL for one object.
    fn presign_post(&self, bucket: &str, key: &str, expires: Duration) -> Result<String> {
        let url = object_url(&self.endpoint, bucket, key)?;
        let identity: Identity = self.credentials.clone().into();

        let mut settings = SigningSettings::default();
        settings.signature_location = SignatureLocation::QueryParams;
        settings.expires_in = Some(expires);
        settings.percent_encoding_mode = PercentEncodingMode::Single;
        settings.uri_path_normalization_mode = UriPathNormalizationMode::Disabled;

        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_NAME)
            .time(SystemTime::now())
            .settings(settings)
            .build()
            .map_err(signing_error)?
            .into();
        let request = SignableRequest::new(
            "POST",
            &url,
            std::iter::empty(),
            SignableBody::UnsignedPayload,
        )
        .map_err(signing_error)?;
        let (instructions, _signature) = sign(request, &params).map_err(signing_error)?.into_parts();

        let query = instructions
            .params()
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        Ok(append_query(&url, &query))
    }
}

fn signing_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::InvalidRequest(format!("failed to sign POST URL: {err}"))
}

/// Virtual-hosted object URL: `{scheme}://{bucket}.{host}/{key}`.
fn object_url(endpoint: &str, bucket: &str, key: &str) -> Result<String> {
    let (scheme, host) = endpoint.split_once("://").ok_or_else(|| {
        StorageError::InvalidRequest(format!("endpoint '{endpoint}' has no scheme"))
    })?;
    let host = host.trim_end_matches('/');
    let path = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Ok(format!("{scheme}://{bucket}.{host}/{path}"))
}

/// Maps an SDK failure onto [`StorageError`].
fn map_sdk_error<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    if let Some(service) = err.as_service_error() {
        let code = service.code().unwrap_or("Unknown").to_string();
        let message = service
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| service.to_string());
        return match code.as_str() {
            "NoSuchKey" | "NoSuchBucket" | "NotFound" => StorageError::NotFound(message),
            _ => StorageError::Service { code, message },
        };
    }
    StorageError::Transport(DisplayErrorContext(err).to_string())
}

fn to_chrono(value: Option<&SdkDateTime>) -> Option<DateTime<Utc>> {
    value.and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()))
}

/// Query string carrying a processing instruction and optional save target.
fn process_query(process: &str, save: Option<&SaveTarget>) -> String {
    let mut query = format!("{PROCESS_PARAM}={}", urlencoding::encode(process));
    if let Some(target) = save {
        query.push_str(&format!(
            "&{SAVE_BUCKET_PARAM}={}&{SAVE_OBJECT_PARAM}={}",
            urlencoding::encode(&target.encoded_bucket()),
            urlencoding::encode(&target.encoded_key()),
        ));
    }
    query
}

fn append_query(uri: &str, query: &str) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}{query}")
}

#[async_trait]
impl StorageClient for TosClient {
    async fn create_bucket(&self, bucket: &str, acl: Acl) -> Result<()> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .acl(BucketCannedAcl::from(acl.as_str()))
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        let output = self.client.list_buckets().send().await.map_err(map_sdk_error)?;
        Ok(output
            .buckets()
            .iter()
            .map(|bucket| BucketSummary {
                name: bucket.name().unwrap_or_default().to_string(),
                creation_date: to_chrono(bucket.creation_date()),
                location: bucket.bucket_region().map(str::to_string),
            })
            .collect())
    }

    async fn head_bucket(&self, bucket: &str) -> Result<BucketMeta> {
        let output = self
            .client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;
        // The S3 HeadBucket response has no storage class header.
        Ok(BucketMeta {
            region: output.bucket_region().map(str::to_string),
            storage_class: None,
        })
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<PutObjectOutput> {
        let length = data.len() as i64;
        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .content_length(length)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(PutObjectOutput {
            etag: output.e_tag().map(str::to_string),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(map_sdk_error)?;
        read_body(output).await
    }

    async fn list_objects(&self, request: ListObjectsRequest) -> Result<ObjectListing> {
        let max_keys = i32::try_from(request.max_keys).unwrap_or(i32::MAX);
        let output = self
            .client
            .list_objects_v2()
            .bucket(&request.bucket)
            .set_prefix(request.prefix)
            .set_delimiter(request.delimiter)
            .set_continuation_token(request.continuation_token)
            .max_keys(max_keys)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(ObjectListing {
            objects: output
                .contents()
                .iter()
                .map(|object| ObjectSummary {
                    key: object.key().unwrap_or_default().to_string(),
                    last_modified: to_chrono(object.last_modified()),
                    size: object.size().unwrap_or_default().max(0) as u64,
                    etag: object.e_tag().map(str::to_string),
                    storage_class: object.storage_class().map(|class| class.as_str().to_string()),
                })
                .collect(),
            common_prefixes: output
                .common_prefixes()
                .iter()
                .filter_map(|prefix| prefix.prefix().map(str::to_string))
                .collect(),
            is_truncated: output.is_truncated().unwrap_or(false),
            next_continuation_token: output.next_continuation_token().map(str::to_string),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(map_sdk_error)?;
        Ok(())
    }

    async fn presign(
        &self,
        method: HttpMethod,
        bucket: &str,
        key: &str,
        expires: Duration,
    ) -> Result<String> {
        let config = Self::presigning_config(expires)?;
        let request = match method {
            HttpMethod::Get => self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(map_sdk_error)?,
            HttpMethod::Put => self
                .client
                .put_object()
                .bucket(bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(map_sdk_error)?,
            HttpMethod::Delete => self
                .client
                .delete_object()
                .bucket(bucket)
                .key(key)
                .presigned(config)
                .await
                .map_err(map_sdk_error)?,
            HttpMethod::Post => return self.presign_post(bucket, key, expires),
        };
        Ok(request.uri().to_string())
    }

    async fn get_object_with_process(
        &self,
        bucket: &str,
        key: &str,
        process: &str,
        save: Option<&SaveTarget>,
    ) -> Result<ObjectBody> {
        let query = process_query(process, save);
        debug!(bucket, key, process, "requesting processed object");

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .customize()
            .mutate_request(move |request| {
                let uri = append_query(request.uri(), &query);
                if let Err(e) = request.set_uri(uri) {
                    warn!(error = %e, "Failed to attach processing parameters");
                }
            })
            .send()
            .await
            .map_err(map_sdk_error)?;
        read_body(output).await
    }
}

async fn read_body(output: aws_sdk_s3::operation::get_object::GetObjectOutput) -> Result<ObjectBody> {
    let content_type = output.content_type().map(str::to_string);
    let data = output
        .body
        .collect()
        .await
        .map_err(|e| StorageError::Transport(format!("failed to read object body: {e}")))?
        .into_bytes()
        .to_vec();
    Ok(ObjectBody::new(data, content_type))
}
