use serde::{Deserialize, Serialize};

/// The upload-time record describing a media asset.
///
/// Only the embedded image metadata is consumed. `image_metadata` may be
/// missing entirely (or `null`), in which case every field lookup behaves
/// as if the field were absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceInfo {
    #[serde(default)]
    pub image_metadata: Option<ImageMetadata>,
}

/// Embedded image metadata as reported by the upload pipeline.
///
/// Every field is optional. Keys use the pipeline's casing (`Keywords`,
/// `ImageCreatorName`, ...); anything not listed here is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageMetadata {
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub copyright_notice: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub image_creator_name: Option<String>,
}

impl ResourceInfo {
    pub fn new(image_metadata: ImageMetadata) -> Self {
        Self {
            image_metadata: Some(image_metadata),
        }
    }

    /// The embedded metadata, or an empty record when none was reported.
    pub fn metadata(&self) -> &ImageMetadata {
        static EMPTY: ImageMetadata = ImageMetadata {
            keywords: None,
            subject: None,
            description: None,
            copyright_notice: None,
            artist: None,
            image_creator_name: None,
        };
        self.image_metadata.as_ref().unwrap_or(&EMPTY)
    }
}

impl ImageMetadata {
    /// Comma-separated keywords, if present and non-empty.
    pub fn keywords(&self) -> Option<&str> {
        present(&self.keywords)
    }

    /// Comma-separated subject terms, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        present(&self.subject)
    }

    /// Caption text, if present and non-empty.
    pub fn description(&self) -> Option<&str> {
        present(&self.description)
    }

    // Rights fields only distinguish absent from set; an empty value is kept.

    pub fn copyright_notice(&self) -> Option<&str> {
        self.copyright_notice.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn image_creator_name(&self) -> Option<&str> {
        self.image_creator_name.as_deref()
    }
}

/// A text field counts as present when it is set and non-empty.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
