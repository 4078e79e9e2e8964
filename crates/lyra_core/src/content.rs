use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata of a file stored in the platform's media library.
///
/// Assets are addressed by `name`, the upload file name minus its extension.
/// Within one seeding run a name maps to exactly one stored asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: u64,
    /// Logical name, e.g. `"beach"` for an upload of `beach.jpg`.
    pub name: String,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub url: String,
    pub ext: String,
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
    /// Hex SHA256 of the stored bytes, assigned by the storing backend.
    pub hash: String,
}

/// A permission group. The `"public"` role is the unauthenticated group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub role_type: String,
}

/// Grants a role one action on one content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: u64,
    /// Composed action id, e.g. `"article.find"`.
    pub action: String,
    /// Owning role id.
    pub role: u64,
}

/// An entry persisted into a content type's storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: u64,
    pub content_type: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

/// Metadata supplied alongside uploaded bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Logical name the asset will be addressable by.
    pub name: String,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub ext: String,
    pub mime: String,
}

/// A media slot inside a fixture record or content block.
///
/// Fixtures author media as plain file names; the seed pipeline replaces them
/// with resolved assets. A slot holding exactly one resolved asset serializes
/// as a single object, never as a one-element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaRef {
    Name(String),
    Names(Vec<String>),
    Asset(Box<Asset>),
    Assets(Vec<Asset>),
}

impl MediaRef {
    /// File names still waiting to be resolved. Empty once resolved.
    pub fn names(&self) -> Vec<String> {
        match self {
            MediaRef::Name(name) => vec![name.clone()],
            MediaRef::Names(names) => names.clone(),
            MediaRef::Asset(_) | MediaRef::Assets(_) => Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, MediaRef::Asset(_) | MediaRef::Assets(_))
    }
}
