//! Value types exchanged with storage backends.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{UnsupportedAcl, UnsupportedMethod};

/// Canned access control list applied at bucket creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Acl {
    /// Owner-only access
    #[default]
    Private,
    /// Anyone can read
    PublicRead,
    /// Anyone can read and write
    PublicReadWrite,
}

impl Acl {
    /// Every ACL, in the order advertised to clients.
    pub const ALL: [Acl; 3] = [Acl::Private, Acl::PublicRead, Acl::PublicReadWrite];

    /// Wire name of the ACL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Acl {
    type Err = UnsupportedAcl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|acl| acl.as_str() == s)
            .ok_or_else(|| UnsupportedAcl(s.to_string()))
    }
}

/// HTTP method a presigned URL is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Download
    #[default]
    Get,
    /// Upload
    Put,
    /// Object-level POST
    Post,
    /// Delete
    Delete,
}

impl HttpMethod {
    /// Every presignable method.
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
    ];

    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    /// Method names are case-sensitive, matching the wire form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnsupportedMethod(s.to_string()))
    }
}

/// One bucket from a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

/// Bucket metadata from a HEAD request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketMeta {
    pub region: Option<String>,
    pub storage_class: Option<String>,
}

/// Result of an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutObjectOutput {
    pub etag: Option<String>,
}

/// Fully read object body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectBody {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub content_length: u64,
}

impl ObjectBody {
    /// Body with `content_length` taken from the data.
    pub fn new(data: Vec<u8>, content_type: Option<String>) -> Self {
        let content_length = data.len() as u64;
        Self {
            data,
            content_type,
            content_length,
        }
    }
}

/// Parameters of a list-objects call.
///
/// Empty `prefix` and `delimiter` strings mean no filtering and no grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListObjectsRequest {
    pub bucket: String,
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub max_keys: u32,
    pub continuation_token: Option<String>,
}

impl ListObjectsRequest {
    /// Page size used when the caller does not choose one.
    pub const DEFAULT_MAX_KEYS: u32 = 1000;

    /// Lists everything in `bucket`, one default-sized page.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: None,
            delimiter: None,
            max_keys: Self::DEFAULT_MAX_KEYS,
            continuation_token: None,
        }
    }

    /// Only keys starting with `prefix`. An empty prefix clears the filter.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = non_empty(prefix.into());
        self
    }

    /// Groups keys sharing a prefix up to `delimiter`. An empty delimiter
    /// disables grouping.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = non_empty(delimiter.into());
        self
    }

    /// Upper bound on objects plus common prefixes in the page.
    pub fn max_keys(mut self, max_keys: u32) -> Self {
        self.max_keys = max_keys;
        self
    }

    /// Resumes after a previous truncated page.
    pub fn continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = non_empty(token.into());
        self
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// One object from a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: u64,
    pub etag: Option<String>,
    pub storage_class: Option<String>,
}

/// One page of a list-objects call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectListing {
    pub objects: Vec<ObjectSummary>,
    pub common_prefixes: Vec<String>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

/// Where a processed object is written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveTarget {
    pub bucket: String,
    pub key: String,
}

impl SaveTarget {
    /// Target `bucket`/`key`.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Bucket name in the base64 form the processing service expects.
    pub fn encoded_bucket(&self) -> String {
        STANDARD.encode(self.bucket.as_bytes())
    }

    /// Object key in the base64 form the processing service expects.
    pub fn encoded_key(&self) -> String {
        STANDARD.encode(self.key.as_bytes())
    }
}
