//! # upload-normalizer
//!
//! Upload-time metadata normalizer. Turns the embedded metadata of an incoming
//! image (Keywords, Subject, Description, CopyrightNotice, Artist,
//! ImageCreatorName) into options for a media upload API.
//!
//! ## Quick Start
//!
//! ```rust
//! use upload_normalizer::metadata::{ImageMetadata, ResourceInfo};
//! use upload_normalizer::normalize::normalize;
//! use upload_normalizer::options::UploadOptions;
//!
//! let info = ResourceInfo::new(ImageMetadata {
//!     copyright_notice: Some("Co".into()),
//!     image_creator_name: Some("Author".into()),
//!     ..Default::default()
//! });
//!
//! let options = normalize(&info, UploadOptions::default());
//! assert_eq!(options.unique_filename, Some(false));
//! assert_eq!(options.metadata.as_deref(), Some("copyright_notice=Co|author=Author"));
//! assert!(options.tags.is_none());
//! ```
//!
//! ## Hook payloads
//!
//! The upload pipeline hands over a JSON object with `resource_info` and
//! `upload_options`. [`pipeline::HookPayload`] parses it and runs the
//! normalizer; [`pipeline::process_payload`] does the same for a file on disk.
//!
//! ```rust
//! use upload_normalizer::pipeline::HookPayload;
//!
//! let payload = HookPayload::from_json(r#"{
//!     "resource_info": { "image_metadata": { "Keywords": "a,b,c", "Subject": "b,c,d" } },
//!     "upload_options": { "folder": "assets" }
//! }"#)?;
//! let options = payload.normalize();
//! println!("{}", serde_json::to_string(&options)?);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Rules
//!
//! | Option | Source | Rule |
//! |--------|--------|------|
//! | `unique_filename` | none | Always `false` |
//! | `tags` | `Keywords`, `Subject` | Both: ordered union of the comma-split lists. One: its raw string. None: unset |
//! | `context` | `Description` | `alt=<Description>`, unset if missing |
//! | `metadata` | `CopyrightNotice`, `Artist`, `ImageCreatorName` | `copyright_notice=…\|artist=…\|author=…`, unset fields skipped |
//!
//! ## Modules
//!
//! - [`metadata`]: Resource info and the embedded metadata record
//! - [`options`]: Upload options, tags, and the normalizer's patch
//! - [`normalize`]: The normalization rules
//! - [`config`]: Configuration types and loading/saving
//! - [`pipeline`]: Hook payloads, payload collection, and file processing

pub mod config;
pub mod metadata;
pub mod normalize;
pub mod options;
pub mod pipeline;
