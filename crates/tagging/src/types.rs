use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Tag records keyed by tag id.
pub type TagMap = BTreeMap<String, TagRecord>;

/// Metadata the server keeps for one tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Display name.
    pub name: String,

    /// Number of torrents carrying the tag, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// Server fields this client does not interpret.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl TagRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: None,
            extra: HashMap::new(),
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }
}

/// Opaque update cursor chosen by the server.
///
/// Never interpreted locally, only sent back with the next incremental
/// request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(serde_json::Value);

impl Timestamp {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self(value.into())
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => write!(f, "{}", s.escape_debug()),
            other => write!(f, "{}", other),
        }
    }
}

/// A complete, point-in-time view of every tag on the server.
///
/// A new snapshot replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSnapshot {
    /// Update kind reported by the server (`"full"` in practice).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    pub timestamp: Timestamp,

    pub data: TagMap,
}

impl TagSnapshot {
    pub fn new(timestamp: Timestamp, data: TagMap) -> Self {
        Self {
            kind: None,
            timestamp,
            data,
        }
    }

    /// Parse a snapshot from JSON. The input must be a snapshot object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decode an update response.
    ///
    /// `null` and `false` mean "no changes" and decode to `Ok(None)`. Any
    /// other value must have the snapshot shape. A changed-but-empty tag set
    /// still carries a timestamp and decodes to a snapshot with empty `data`.
    ///
    /// ```
    /// use tagging::TagSnapshot;
    /// use serde_json::json;
    ///
    /// assert!(TagSnapshot::from_response(json!(null)).unwrap().is_none());
    ///
    /// let snap = TagSnapshot::from_response(json!({"timestamp": "t", "data": {}}))
    ///     .unwrap()
    ///     .unwrap();
    /// assert!(snap.data.is_empty());
    ///
    /// assert!(TagSnapshot::from_response(json!({"data": {}})).is_err());
    /// ```
    pub fn from_response(value: serde_json::Value) -> Result<Option<Self>, serde_json::Error> {
        match value {
            serde_json::Value::Null | serde_json::Value::Bool(false) => Ok(None),
            other => serde_json::from_value(other).map(Some),
        }
    }

    /// Tag ids excluding the reserved pseudo-tags.
    pub fn tag_ids(&self) -> impl Iterator<Item = &str> {
        self.data
            .keys()
            .map(String::as_str)
            .filter(|id| !crate::id::is_reserved(id))
    }
}
