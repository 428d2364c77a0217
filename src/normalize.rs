//! Upload-time metadata normalization.
//!
//! Turns the embedded metadata of an incoming asset into upload options:
//!
//! - `unique_filename` is always forced to `false`
//! - `tags` come from `Keywords` and/or `Subject`
//! - `context` carries the `Description` as `alt=<text>`
//! - `metadata` serializes the rights fields as `key=value|key=value`
//!
//! Each step only looks at its own fields. None of them can fail; a missing
//! field just means that step contributes nothing.

use crate::metadata::{ImageMetadata, ResourceInfo};
use crate::options::{Tags, UploadOptions, UploadPatch};

/// Rights fields in serialization order, paired with their accessor.
const METADATA_FIELDS: &[(&str, fn(&ImageMetadata) -> Option<&str>)] = &[
    ("copyright_notice", ImageMetadata::copyright_notice),
    ("artist", ImageMetadata::artist),
    ("author", ImageMetadata::image_creator_name),
];

/// Normalize upload options for an incoming resource.
///
/// Consumes the caller's options and returns the updated value. Keys the
/// normalizer does not own are passed through unchanged.
///
/// # Example
///
/// ```rust
/// use upload_normalizer::metadata::{ImageMetadata, ResourceInfo};
/// use upload_normalizer::normalize::normalize;
/// use upload_normalizer::options::{Tags, UploadOptions};
///
/// let info = ResourceInfo::new(ImageMetadata {
///     keywords: Some("a,b,c".into()),
///     subject: Some("b,c,d".into()),
///     description: Some("A cat".into()),
///     ..Default::default()
/// });
///
/// let options = normalize(&info, UploadOptions::default());
/// assert_eq!(options.unique_filename, Some(false));
/// assert_eq!(
///     options.tags,
///     Some(Tags::List(vec!["a".into(), "b".into(), "c".into(), "d".into()])),
/// );
/// assert_eq!(options.context.as_deref(), Some("alt=A cat"));
/// assert_eq!(options.metadata.as_deref(), Some(""));
/// ```
pub fn normalize(resource_info: &ResourceInfo, upload_options: UploadOptions) -> UploadOptions {
    upload_options.apply(derive_patch(resource_info))
}

/// Same as [`normalize`], for callers that hold the options mutably.
pub fn normalize_in_place(resource_info: &ResourceInfo, upload_options: &mut UploadOptions) {
    upload_options.apply_mut(derive_patch(resource_info));
}

/// Compute the changes the normalizer would make, without applying them.
pub fn derive_patch(resource_info: &ResourceInfo) -> UploadPatch {
    if resource_info.image_metadata.is_none() {
        log::debug!("Resource has no image metadata");
    }
    let meta = resource_info.metadata();

    UploadPatch {
        unique_filename: false,
        tags: derive_tags(meta),
        context: alt_text(meta),
        metadata: serialize_metadata(meta),
    }
}

/// Derive upload tags from `Keywords` and `Subject`.
///
/// With both present, each is split on `,` and merged with [`tag_union`].
/// With only one present, its raw string is used unsplit. With neither,
/// returns `None`.
pub fn derive_tags(meta: &ImageMetadata) -> Option<Tags> {
    match (meta.keywords(), meta.subject()) {
        (Some(keywords), Some(subject)) => {
            let keywords: Vec<&str> = keywords.split(',').collect();
            let subject: Vec<&str> = subject.split(',').collect();
            let merged = tag_union(&keywords, &subject);
            log::debug!("Tags merged from Keywords and Subject: {} token(s)", merged.len());
            Some(Tags::List(merged))
        }
        (Some(keywords), None) => {
            log::debug!("Tags taken from Keywords");
            Some(Tags::Raw(keywords.to_string()))
        }
        (None, Some(subject)) => {
            log::debug!("Tags taken from Subject");
            Some(Tags::Raw(subject.to_string()))
        }
        (None, None) => None,
    }
}

/// Order-preserving union of two token lists.
///
/// All of `first` is kept as-is, followed by the tokens of `second` that do
/// not appear in `first`. Tokens compare by exact string equality.
pub fn tag_union(first: &[&str], second: &[&str]) -> Vec<String> {
    first
        .iter()
        .chain(second.iter().filter(|token| !first.contains(*token)))
        .map(|token| token.to_string())
        .collect()
}

/// Alt-text context entry for the `Description`, if any.
///
/// The description is not escaped; `=` and `|` pass through verbatim.
pub fn alt_text(meta: &ImageMetadata) -> Option<String> {
    match meta.description() {
        Some(description) => {
            log::debug!("Alt text set from Description");
            Some(format!("alt={description}"))
        }
        None => {
            log::debug!("No Description, alt text left unset");
            None
        }
    }
}

/// Serialize the rights fields as pipe-delimited `key=value` pairs.
///
/// Fields are emitted in fixed order (`copyright_notice`, `artist`,
/// `author`). Unset fields are skipped; empty values are kept. Returns an
/// empty string when nothing is set.
pub fn serialize_metadata(meta: &ImageMetadata) -> String {
    let pairs: Vec<String> = METADATA_FIELDS
        .iter()
        .filter_map(|(key, field)| field(meta).map(|value| format!("{key}={value}")))
        .collect();
    log::debug!("Metadata set with {} of {} field(s)", pairs.len(), METADATA_FIELDS.len());
    pairs.join("|")
}
