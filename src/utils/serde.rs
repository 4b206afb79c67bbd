use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on
/// an `Option<Option<T>>` field: absent -> `None`, `null` ->
/// `Some(None)`, a value -> `Some(Some(value))`. Needed for PATCH
/// bodies where `"parent_id": null` means "clear the parent" while
/// omitting the key means "leave it alone".
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<Uuid>>,
    }

    #[test]
    fn test_absent_field() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert!(patch.parent_id.is_none());
    }

    #[test]
    fn test_null_field() {
        let patch: Patch = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(patch.parent_id, Some(None));
    }

    #[test]
    fn test_value_field() {
        let id = Uuid::new_v4();
        let patch: Patch =
            serde_json::from_str(&format!(r#"{{"parent_id": "{}"}}"#, id)).unwrap();
        assert_eq!(patch.parent_id, Some(Some(id)));
    }
}
