//! Tag codec.
//!
//! Tags travel on the wire as `{string: string}` maps but are stored as a
//! single `"k1:v1,k2:v2"` string with keys in lexicographic order.

use std::collections::BTreeMap;

use crate::errors::StoreError;

/// Serialize a tag map to its storage form, keys sorted.
pub fn pack(tags: &BTreeMap<String, String>) -> String {
    tags.iter()
        .map(|(k, v)| format!("{}:{}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the storage form back into a tag map.
///
/// An empty string parses to an empty map. Entries without a `:` separator
/// are rejected as invalid input.
pub fn parse(packed: &str) -> Result<BTreeMap<String, String>, StoreError> {
    let mut tags = BTreeMap::new();

    if packed.is_empty() {
        return Ok(tags);
    }

    for entry in packed.split(',') {
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| StoreError::InvalidInput(format!("Bad tag entry: {}", entry)))?;

        if key.is_empty() {
            return Err(StoreError::InvalidInput(format!("Bad tag entry: {}", entry)));
        }

        tags.insert(key.to_string(), value.to_string());
    }

    Ok(tags)
}
