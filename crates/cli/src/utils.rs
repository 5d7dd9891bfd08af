//! `key=value` argument handling for the admin commands.

use anyhow::bail;
use serde_json::{Map, Value};

/// Keys that must carry integer values.
const INTEGER_KEYS: &[&str] = &["value", "team_id", "flag_id"];

/// Apply `key=value` arguments onto a JSON object representation of a
/// record. `tags.x=y` entries land in the `tags` map; integer fields are
/// parsed, everything else stays a string.
pub fn apply_fields(record: &mut Map<String, Value>, fields: &[String]) -> anyhow::Result<()> {
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            bail!("Bad key=value input: {}", field);
        };

        if let Some(tag) = key.strip_prefix("tags.") {
            if !record.get("tags").map(Value::is_object).unwrap_or(false) {
                record.insert("tags".to_string(), Value::Object(Map::new()));
            }

            if let Some(tags) = record.get_mut("tags").and_then(Value::as_object_mut) {
                tags.insert(tag.to_string(), Value::String(value.to_string()));
            }

            continue;
        }

        if INTEGER_KEYS.contains(&key) {
            let parsed: i64 = match value.parse() {
                Ok(parsed) => parsed,
                Err(_) => bail!("Bad integer value for {}: {}", key, value),
            };

            record.insert(key.to_string(), Value::Number(parsed.into()));
            continue;
        }

        record.insert(key.to_string(), Value::String(value.to_string()));
    }

    Ok(())
}

/// Render a tag map the way it is stored: sorted `key:value` pairs.
pub fn render_tags(tags: &std::collections::BTreeMap<String, String>) -> String {
    askgod_domain::tags::pack(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fields_strings_and_integers() {
        let mut record = Map::new();
        apply_fields(
            &mut record,
            &[
                "flag=FLAG-123".to_string(),
                "value=42".to_string(),
                "description=the answer".to_string(),
            ],
        )
        .unwrap();

        assert_eq!(record["flag"], "FLAG-123");
        assert_eq!(record["value"], 42);
        assert_eq!(record["description"], "the answer");
    }

    #[test]
    fn test_apply_fields_tags() {
        let mut record = Map::new();
        apply_fields(
            &mut record,
            &["tags.cat=web".to_string(), "tags.diff=3".to_string()],
        )
        .unwrap();

        assert_eq!(record["tags"]["cat"], "web");
        assert_eq!(record["tags"]["diff"], "3");
    }

    #[test]
    fn test_apply_fields_rejects_garbage() {
        let mut record = Map::new();
        assert!(apply_fields(&mut record, &["no-equals".to_string()]).is_err());
        assert!(apply_fields(&mut record, &["value=abc".to_string()]).is_err());
    }
}
