use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::metadata::ResourceInfo;
use crate::normalize;
use crate::options::UploadOptions;

/// Extension of hook payload files.
const PAYLOAD_EXTENSION: &str = "json";

/// One invocation of the upload hook: the resource being uploaded and the
/// options the upload pipeline is about to send.
///
/// ```json
/// {
///   "resource_info": { "image_metadata": { "Keywords": "a,b" } },
///   "upload_options": { "folder": "assets" }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookPayload {
    #[serde(default)]
    pub resource_info: ResourceInfo,
    #[serde(default)]
    pub upload_options: UploadOptions,
}

impl HookPayload {
    /// Parse a payload from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse hook payload")
    }

    /// Run the normalizer over this payload.
    pub fn normalize(self) -> UploadOptions {
        normalize::normalize(&self.resource_info, self.upload_options)
    }
}

/// A payload file found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadFile {
    pub path: PathBuf,
    /// Location relative to the input path it was found under. Mirrored
    /// under the output directory so same-named payloads in different
    /// folders do not collide.
    pub relative: PathBuf,
}

impl PayloadFile {
    /// A payload named directly, outside any directory walk.
    pub fn standalone(path: &Path) -> Self {
        let relative = path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf());
        Self {
            path: path.to_path_buf(),
            relative,
        }
    }
}

/// The result of normalizing a single payload file.
#[derive(Debug)]
pub struct ProcessResult {
    pub path: PathBuf,
    pub options: Option<UploadOptions>,
    /// Where the result was written, if an output directory is configured.
    pub output_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl ProcessResult {
    fn failed(path: &Path, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            options: None,
            output_path: None,
            error: Some(error),
        }
    }
}

/// Collect payload files from the given paths.
///
/// Accepts a mix of file and directory paths. Directories are walked
/// recursively (following symlinks) and only `.json` files are kept.
/// Explicitly named files are taken as-is.
pub fn collect_payloads(paths: &[PathBuf]) -> Vec<PayloadFile> {
    let mut payloads = Vec::new();

    for path in paths {
        if path.is_file() {
            payloads.push(PayloadFile::standalone(path));
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_payload_file(p) && !is_output_file(p) {
                    let relative = p.strip_prefix(path).unwrap_or(p).to_path_buf();
                    payloads.push(PayloadFile {
                        path: p.to_path_buf(),
                        relative,
                    });
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    payloads
}

fn is_payload_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PAYLOAD_EXTENSION))
        .unwrap_or(false)
}

/// Results from a previous run share the directory walk; skip them.
fn is_output_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(".options.json"))
        .unwrap_or(false)
}

/// Read a payload from any reader (stdin, in-memory buffer, ...).
pub fn read_payload<R: Read>(mut reader: R) -> Result<HookPayload> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read hook payload")?;
    HookPayload::from_json(&text)
}

/// Render normalized options as JSON.
pub fn render_options(options: &UploadOptions, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(options)
    } else {
        serde_json::to_string(options)
    };
    text.context("Failed to serialize upload options")
}

/// Path of the result file for a payload inside `output_dir`.
///
/// `a/upload.json` maps to `<output_dir>/a/upload.options.json`.
pub fn output_path_for(relative: &Path, output_dir: &Path) -> PathBuf {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "payload".to_string());
    output_dir.join(relative.with_file_name(format!("{stem}.options.json")))
}

/// Normalize a single payload file.
///
/// Errors are captured in [`ProcessResult::error`] so a batch keeps going
/// past a bad file. When the config names an output directory, the result
/// is written there.
pub fn process_payload(payload: &PayloadFile, config: &Config) -> ProcessResult {
    match run(payload, config) {
        Ok((options, output_path)) => ProcessResult {
            path: payload.path.clone(),
            options: Some(options),
            output_path,
            error: None,
        },
        Err(e) => ProcessResult::failed(&payload.path, format!("{e:#}")),
    }
}

/// Normalize a batch of payload files.
///
/// A payload whose output path was already claimed by an earlier one in the
/// batch fails instead of overwriting it.
pub fn process_batch(payloads: &[PayloadFile], config: &Config) -> Vec<ProcessResult> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    payloads
        .iter()
        .map(|payload| {
            if let Some(dir) = config.output_dir() {
                let out = output_path_for(&payload.relative, dir);
                if !claimed.insert(out.clone()) {
                    return ProcessResult::failed(
                        &payload.path,
                        format!("Output {} already written by another payload", out.display()),
                    );
                }
            }
            process_payload(payload, config)
        })
        .collect()
}

fn run(payload: &PayloadFile, config: &Config) -> Result<(UploadOptions, Option<PathBuf>)> {
    let path = &payload.path;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let options = HookPayload::from_json(&text)?.normalize();

    let output_path = match config.output_dir() {
        Some(dir) => {
            let out = output_path_for(&payload.relative, dir);
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let rendered = render_options(&options, config.output.pretty)?;
            std::fs::write(&out, rendered)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            log::debug!("Wrote {}", out.display());
            Some(out)
        }
        None => None,
    };

    Ok((options, output_path))
}
