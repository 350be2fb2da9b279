//! Stored documents

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document held by a collection
///
/// System attributes (`_key`, `_id`, `_rev`) are kept apart from the body
/// and merged back in by [`Document::to_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    key: String,
    id: String,
    rev: String,
    body: Map<String, Value>,
}

impl Document {
    pub(crate) fn new(collection: &str, key: String, rev: String, body: Map<String, Value>) -> Self {
        Self {
            id: format!("{}/{}", collection, key),
            key,
            rev,
            body,
        }
    }

    /// Document key, unique within its collection
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Document handle, `collection/key`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Revision assigned on insert
    pub fn rev(&self) -> &str {
        &self.rev
    }

    /// Get a user attribute
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.body.get(attribute)
    }

    /// Full JSON form, system attributes first
    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(self.body.len() + 3);
        object.insert("_key".to_string(), Value::String(self.key.clone()));
        object.insert("_id".to_string(), Value::String(self.id.clone()));
        object.insert("_rev".to_string(), Value::String(self.rev.clone()));
        for (k, v) in &self.body {
            object.insert(k.clone(), v.clone());
        }
        Value::Object(object)
    }

    /// `_key`, `_id` and `_rev` only, as returned for a write
    pub fn meta_json(&self) -> Value {
        serde_json::json!({
            "_key": self.key,
            "_id": self.id,
            "_rev": self.rev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_merges_system_attributes() {
        let mut body = Map::new();
        body.insert("name".to_string(), json!("Design Team"));
        let doc = Document::new("teams", "team-design".to_string(), "_0000000a".to_string(), body);

        assert_eq!(doc.id(), "teams/team-design");
        assert_eq!(doc.get("name"), Some(&json!("Design Team")));
        assert_eq!(
            doc.to_json(),
            json!({
                "_key": "team-design",
                "_id": "teams/team-design",
                "_rev": "_0000000a",
                "name": "Design Team",
            })
        );
    }
}
