use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const UNIQUE_FILENAME: &str = "unique_filename";
const TAGS: &str = "tags";
const CONTEXT: &str = "context";
const METADATA: &str = "metadata";

/// Tags as handed to the upload API.
///
/// Merged keyword/subject lists are sent as an array; a single source is
/// passed through as its raw comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    Raw(String),
}

/// Options passed to the media upload API.
///
/// The four keys the normalizer owns are typed fields. Every other key the
/// caller supplied (folder, access mode, ...) is carried through untouched
/// in `extra`. An owned key whose incoming value does not fit its typed
/// field (say a `context` map) also stays in `extra` until the normalizer
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_filename: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for UploadOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            unique_filename: take_typed(&mut extra, UNIQUE_FILENAME),
            tags: take_typed(&mut extra, TAGS),
            context: take_typed(&mut extra, CONTEXT),
            metadata: take_typed(&mut extra, METADATA),
            extra,
        })
    }
}

/// Move `key` out of `extra` if its value fits `T`; otherwise leave it there.
fn take_typed<T: DeserializeOwned>(extra: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = extra.get(key)?;
    if value.is_null() {
        extra.remove(key);
        return None;
    }
    match T::deserialize(value) {
        Ok(typed) => {
            extra.remove(key);
            Some(typed)
        }
        Err(_) => {
            log::debug!("Keeping caller's `{key}` as-is: {value}");
            None
        }
    }
}

/// The set of changes the normalizer makes to a set of upload options.
///
/// `None` means "leave the existing value alone".
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPatch {
    pub unique_filename: bool,
    pub tags: Option<Tags>,
    pub context: Option<String>,
    pub metadata: String,
}

impl UploadOptions {
    /// Apply a patch, returning the updated options.
    pub fn apply(mut self, patch: UploadPatch) -> Self {
        self.apply_mut(patch);
        self
    }

    pub(crate) fn apply_mut(&mut self, patch: UploadPatch) {
        self.extra.remove(UNIQUE_FILENAME);
        self.unique_filename = Some(patch.unique_filename);
        if let Some(tags) = patch.tags {
            self.extra.remove(TAGS);
            self.tags = Some(tags);
        }
        if let Some(context) = patch.context {
            self.extra.remove(CONTEXT);
            self.context = Some(context);
        }
        self.extra.remove(METADATA);
        self.metadata = Some(patch.metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch() -> UploadPatch {
        UploadPatch {
            unique_filename: false,
            tags: None,
            context: None,
            metadata: String::new(),
        }
    }

    // ── serde ────────────────────────────────────────────────────────

    #[test]
    fn caller_keys_survive_round_trip() {
        let value = json!({
            "folder": "uploads/2024",
            "access_mode": "public",
            "overwrite": true
        });
        let options: UploadOptions = serde_json::from_value(value.clone()).unwrap();
        assert!(options.tags.is_none());
        assert_eq!(options.extra.len(), 3);
        assert_eq!(serde_json::to_value(&options).unwrap(), value);
    }

    #[test]
    fn tags_serialize_as_array_or_string() {
        let list = UploadOptions {
            tags: Some(Tags::List(vec!["a".into(), "b".into()])),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&list).unwrap(), json!({"tags": ["a", "b"]}));

        let raw = UploadOptions {
            tags: Some(Tags::Raw("a,b".into())),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!({"tags": "a,b"}));
    }

    #[test]
    fn existing_tags_deserialize_either_way() {
        let options: UploadOptions = serde_json::from_value(json!({"tags": "x"})).unwrap();
        assert_eq!(options.tags, Some(Tags::Raw("x".into())));
        let options: UploadOptions = serde_json::from_value(json!({"tags": ["x"]})).unwrap();
        assert_eq!(options.tags, Some(Tags::List(vec!["x".into()])));
    }

    // ── apply ────────────────────────────────────────────────────────

    #[test]
    fn apply_always_sets_unique_filename_and_metadata() {
        let options = UploadOptions {
            unique_filename: Some(true),
            ..Default::default()
        }
        .apply(patch());
        assert_eq!(options.unique_filename, Some(false));
        assert_eq!(options.metadata.as_deref(), Some(""));
    }

    #[test]
    fn apply_keeps_existing_tags_and_context_when_patch_has_none() {
        let options = UploadOptions {
            tags: Some(Tags::Raw("keep".into())),
            context: Some("caption=old".into()),
            ..Default::default()
        }
        .apply(patch());
        assert_eq!(options.tags, Some(Tags::Raw("keep".into())));
        assert_eq!(options.context.as_deref(), Some("caption=old"));
    }

    #[test]
    fn apply_overwrites_tags_and_context() {
        let options = UploadOptions {
            tags: Some(Tags::Raw("old".into())),
            ..Default::default()
        }
        .apply(UploadPatch {
            tags: Some(Tags::List(vec!["new".into()])),
            context: Some("alt=x".into()),
            ..patch()
        });
        assert_eq!(options.tags, Some(Tags::List(vec!["new".into()])));
        assert_eq!(options.context.as_deref(), Some("alt=x"));
    }

    // ── lenient owned keys ───────────────────────────────────────────

    #[test]
    fn context_map_does_not_fail_parsing() {
        let options: UploadOptions =
            serde_json::from_value(json!({"context": {"caption": "hi"}, "folder": "x"})).unwrap();
        assert!(options.context.is_none());
        assert_eq!(options.extra.get("context"), Some(&json!({"caption": "hi"})));
    }

    #[test]
    fn unfit_owned_keys_pass_through_when_not_replaced() {
        let value = json!({"context": {"caption": "hi"}, "tags": [1, 2]});
        let options: UploadOptions = serde_json::from_value(value).unwrap();
        let options = options.apply(patch());
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "unique_filename": false,
                "metadata": "",
                "context": {"caption": "hi"},
                "tags": [1, 2]
            })
        );
    }

    #[test]
    fn replaced_owned_keys_are_written_once() {
        let value = json!({"context": {"caption": "hi"}, "metadata": 7, "unique_filename": "yes"});
        let options: UploadOptions = serde_json::from_value(value).unwrap();
        let options = options.apply(UploadPatch {
            context: Some("alt=x".into()),
            ..patch()
        });
        assert!(options.extra.is_empty());

        let text = serde_json::to_string(&options).unwrap();
        assert_eq!(text.matches("\"context\"").count(), 1);
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"unique_filename": false, "context": "alt=x", "metadata": ""})
        );
    }

    #[test]
    fn null_owned_keys_read_as_unset() {
        let options: UploadOptions = serde_json::from_value(json!({"tags": null})).unwrap();
        assert!(options.tags.is_none());
        assert!(options.extra.is_empty());
    }
}
