//! Local upload directory: filename sanitization, collision-free saves,
//! streaming reads, deletes, and listing.
//!
//! Every path handed to the filesystem goes through [`sanitize_filename`]
//! first, so client-supplied names can never escape the upload root.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default upload directory, relative to the working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Longest filename we will store (common filesystem limit).
pub const MAX_FILENAME_LENGTH: usize = 255;

/// How many suffixed names to try before giving up on a collision.
const MAX_RENAME_ATTEMPTS: u32 = 100;

/// Stem used when a name's stem has no allowed characters left.
const FALLBACK_STEM: &str = "file";

/// Characters outside the allow-list `[A-Za-z0-9._-]`.
static DISALLOWED_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));

// ---------------------------------------------------------------------------
// Filename helpers
// ---------------------------------------------------------------------------

/// Reduce a client-supplied name to a safe basename.
///
/// Takes the component after the last `/` or `\`, removes every character
/// outside the allow-list, and strips leading dots (so `..` and hidden names
/// cannot survive). A stem that filters away entirely becomes `file`, keeping
/// the extension. Long names are shortened from the stem. Fails when nothing
/// usable remains.
pub fn sanitize_filename(raw: &str) -> Result<String, CoreError> {
    let basename = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let name = match basename.rfind('.') {
        Some(dot) if dot > 0 => {
            let stem = strip_disallowed(&basename[..dot]);
            let ext = DISALLOWED_CHARS_RE.replace_all(&basename[dot..], "");
            if stem.is_empty() && ext.len() > 1 {
                format!("{FALLBACK_STEM}{ext}")
            } else {
                strip_disallowed(basename)
            }
        }
        _ => strip_disallowed(basename),
    };

    if name.is_empty() {
        return Err(CoreError::Validation(format!(
            "Filename '{raw}' contains no usable characters"
        )));
    }
    Ok(fit_name(&name, ""))
}

/// Insert `_<unix_ts>` (plus `_<attempt>` after the first retry) before the
/// extension. The stem is shortened if the result would exceed
/// [`MAX_FILENAME_LENGTH`].
///
/// ```
/// use distopia_core::storage::timestamped_name;
///
/// assert_eq!(timestamped_name("map.png", 1700000000, 0), "map_1700000000.png");
/// assert_eq!(timestamped_name("map.png", 1700000000, 2), "map_1700000000_2.png");
/// assert_eq!(timestamped_name("README", 1700000000, 0), "README_1700000000");
/// ```
pub fn timestamped_name(name: &str, unix_ts: i64, attempt: u32) -> String {
    let suffix = if attempt == 0 {
        format!("_{unix_ts}")
    } else {
        format!("_{unix_ts}_{attempt}")
    };
    fit_name(name, &suffix)
}

/// Lowercased extension of a filename, if any.
pub fn extension_of(name: &str) -> Option<String> {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => Some(name[dot + 1..].to_ascii_lowercase()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// UploadDir
// ---------------------------------------------------------------------------

/// Result of a successful save.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoredFile {
    /// Final name on disk (sanitized, possibly suffixed).
    pub filename: String,
    /// Bytes written.
    pub size_bytes: u64,
    /// `true` when a collision forced a suffixed name.
    pub renamed: bool,
}

/// Handle to the upload directory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory (and parents) if missing.
    pub async fn ensure(&self) -> Result<(), CoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| internal("create upload directory", e))
    }

    /// Sanitize `raw_name` and resolve it under the root.
    pub fn resolve(&self, raw_name: &str) -> Result<(String, PathBuf), CoreError> {
        let name = sanitize_filename(raw_name)?;
        let path = self.root.join(&name);
        Ok((name, path))
    }

    /// Write `data` under a sanitized name, never overwriting an existing file.
    ///
    /// The first attempt uses the sanitized name as-is. On collision the name
    /// gets a Unix-timestamp suffix, then numbered suffixes. Files are opened
    /// with `create_new`, so two concurrent saves of the same name cannot
    /// clobber each other.
    pub async fn save(&self, raw_name: &str, data: &[u8]) -> Result<StoredFile, CoreError> {
        let name = sanitize_filename(raw_name)?;
        let unix_ts = chrono::Utc::now().timestamp();

        for attempt in 0..=MAX_RENAME_ATTEMPTS {
            let candidate = match attempt {
                0 => name.clone(),
                n => timestamped_name(&name, unix_ts, n - 1),
            };
            let path = self.root.join(&candidate);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(internal("create upload file", e)),
            };

            if let Err(e) = write_all(&mut file, data).await {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
                }
                return Err(internal("write upload file", e));
            }

            tracing::debug!(filename = %candidate, bytes = data.len(), "Stored upload");
            return Ok(StoredFile {
                filename: candidate,
                size_bytes: data.len() as u64,
                renamed: attempt > 0,
            });
        }

        Err(CoreError::Conflict(format!(
            "Could not find a free name for '{name}' after {MAX_RENAME_ATTEMPTS} attempts"
        )))
    }

    /// Open a stored file for reading. Returns the sanitized name, the open
    /// handle, and its size.
    pub async fn open(&self, raw_name: &str) -> Result<(String, tokio::fs::File, u64), CoreError> {
        let (name, path) = self.resolve(raw_name)?;

        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| not_found_or_internal(e, &name, "open stored file"))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| internal("read file metadata", e))?;

        if !metadata.is_file() {
            return Err(CoreError::not_found("File", name));
        }
        Ok((name, file, metadata.len()))
    }

    /// Remove a stored file.
    pub async fn delete(&self, raw_name: &str) -> Result<String, CoreError> {
        let (name, path) = self.resolve(raw_name)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_internal(e, &name, "delete stored file"))?;
        Ok(name)
    }

    /// Names of all regular files in the directory, sorted.
    pub async fn list(&self) -> Result<Vec<String>, CoreError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| internal("read upload directory", e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| internal("read upload directory entry", e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

async fn write_all(file: &mut tokio::fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}

fn strip_disallowed(s: &str) -> String {
    DISALLOWED_CHARS_RE
        .replace_all(s, "")
        .trim_start_matches('.')
        .to_string()
}

/// Join `name` and `suffix` (suffix before the extension) within
/// [`MAX_FILENAME_LENGTH`] bytes, cutting the stem first. An extension too
/// long to keep is cut along with the rest.
fn fit_name(name: &str, suffix: &str) -> String {
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    let budget = MAX_FILENAME_LENGTH.saturating_sub(suffix.len());

    if stem.len() + ext.len() <= budget {
        return format!("{stem}{suffix}{ext}");
    }
    if ext.len() < budget {
        let keep = floor_char_boundary(stem, budget - ext.len());
        return format!("{}{suffix}{ext}", &stem[..keep]);
    }
    let keep = floor_char_boundary(name, budget);
    format!("{}{suffix}", &name[..keep])
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    index = index.min(s.len());
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn internal(action: &str, err: std::io::Error) -> CoreError {
    CoreError::Internal(format!("Failed to {action}: {err}"))
}

fn not_found_or_internal(err: std::io::Error, name: &str, action: &str) -> CoreError {
    if err.kind() == ErrorKind::NotFound {
        CoreError::not_found("File", name)
    } else {
        internal(action, err)
    }
}
