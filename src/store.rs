//! Mask persistence keyed by project id.
//!
//! Saving always replaces a project's whole mask set, so masks deleted in
//! the editor disappear from storage too. Deleting a project removes its
//! masks first and the project record second; no storage-level cascade is
//! assumed.

use crate::domain::RedactionMask;
use crate::error::{RedactorError, RedactorResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A redaction project: one source PDF and its masks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub source_file: PathBuf,
    pub page_count: usize,
}

/// Storage for projects and their masks.
pub trait MaskRepository {
    /// Creates or overwrites a project record.
    fn save_project(&self, project: &ProjectRecord) -> RedactorResult<()>;

    fn load_project(&self, project_id: &str) -> RedactorResult<Option<ProjectRecord>>;

    /// Masks of a project; empty when none were saved.
    fn load_masks(&self, project_id: &str) -> RedactorResult<Vec<RedactionMask>>;

    /// Replaces every stored mask of the project with `masks`.
    fn replace_masks(&self, project_id: &str, masks: &[RedactionMask]) -> RedactorResult<()>;

    fn delete_masks(&self, project_id: &str) -> RedactorResult<()>;

    fn delete_project_record(&self, project_id: &str) -> RedactorResult<()>;

    /// Deletes a project's masks, then the project itself.
    fn delete_project(&self, project_id: &str) -> RedactorResult<()> {
        self.delete_masks(project_id)?;
        self.delete_project_record(project_id)
    }
}

/// JSON-file store: `<root>/<id>.project.json` and `<root>/<id>.masks.json`.
#[derive(Debug, Clone)]
pub struct JsonMaskStore {
    root: PathBuf,
}

impl JsonMaskStore {
    /// Uses `root` as the storage directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> RedactorResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| RedactorError::Io {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_path(&self, project_id: &str) -> RedactorResult<PathBuf> {
        validate_id(project_id)?;
        Ok(self.root.join(format!("{project_id}.project.json")))
    }

    fn masks_path(&self, project_id: &str) -> RedactorResult<PathBuf> {
        validate_id(project_id)?;
        Ok(self.root.join(format!("{project_id}.masks.json")))
    }
}

impl MaskRepository for JsonMaskStore {
    fn save_project(&self, project: &ProjectRecord) -> RedactorResult<()> {
        write_json(&self.project_path(&project.id)?, project)
    }

    fn load_project(&self, project_id: &str) -> RedactorResult<Option<ProjectRecord>> {
        read_json(&self.project_path(project_id)?)
    }

    fn load_masks(&self, project_id: &str) -> RedactorResult<Vec<RedactionMask>> {
        Ok(read_json(&self.masks_path(project_id)?)?.unwrap_or_default())
    }

    fn replace_masks(&self, project_id: &str, masks: &[RedactionMask]) -> RedactorResult<()> {
        debug!(project = project_id, masks = masks.len(), "replacing stored masks");
        write_json(&self.masks_path(project_id)?, &masks)
    }

    fn delete_masks(&self, project_id: &str) -> RedactorResult<()> {
        remove_if_exists(&self.masks_path(project_id)?)
    }

    fn delete_project_record(&self, project_id: &str) -> RedactorResult<()> {
        remove_if_exists(&self.project_path(project_id)?)
    }
}

fn validate_id(project_id: &str) -> RedactorResult<()> {
    let valid = !project_id.is_empty()
        && project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RedactorError::InvalidInput {
            parameter: "project_id".to_string(),
            reason: format!("'{}' may only contain ASCII letters, digits, '-' and '_'", project_id),
        })
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> RedactorResult<()> {
    let json = serde_json::to_vec_pretty(value)?;
    // records are only ever replaced whole, via rename
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| RedactorError::Io {
        path: tmp.clone(),
        source: e,
    })?;
    fs::rename(&tmp, path).map_err(|e| RedactorError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> RedactorResult<Option<T>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn remove_if_exists(path: &Path) -> RedactorResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
