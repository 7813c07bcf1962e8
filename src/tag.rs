use serde::Serialize;
use std::collections::BTreeMap;

/// `Tag` is a key/value label attached to a function, role or policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// tag key
    pub key: String,
    /// tag value
    pub value: String,
}

impl From<&aws_sdk_iam::types::Tag> for Tag {
    fn from(tag: &aws_sdk_iam::types::Tag) -> Self {
        Tag {
            key: tag.key().to_string(),
            value: tag.value().to_string(),
        }
    }
}

/// Collapse a tag list into a map.
/// When a key is repeated, the last value wins.
pub fn tag_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}
