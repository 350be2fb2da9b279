//! Data models for the project graph SDK
//!
//! These types represent API response structures and are used by both
//! EmbeddedClient and RemoteClient.

use serde::{Deserialize, Serialize};

/// Server identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVersion {
    /// Server product (e.g., "arango")
    pub server: String,
    /// Server version
    pub version: String,
    /// License flavour, when reported
    #[serde(default)]
    pub license: Option<String>,
}

/// Collection description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(rename = "isSystem", default)]
    pub is_system: bool,
}

/// System attributes of a stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev")]
    pub rev: String,
}
