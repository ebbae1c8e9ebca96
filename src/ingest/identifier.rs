// src/ingest/identifier.rs
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use regex::Regex;

pub const ID_PREFIX: &str = "ingestion_";

/// Repository id for a subject: whitespace/hyphen runs become `_`, then prefixed.
///
/// Nothing else is rewritten. A `/` in the subject survives, so
/// [`subject_repo`] points into a subdirectory of the storage path and the
/// write fails unless that subdirectory already exists.
pub fn repo_id(subject: &str) -> String {
    static RE_SEP: OnceCell<Regex> = OnceCell::new();
    let re = RE_SEP.get_or_init(|| Regex::new(r"[\s-]+").unwrap());
    format!("{ID_PREFIX}{}", re.replace_all(subject, "_"))
}

/// Full path of the articles document for a subject.
pub fn subject_repo(storage_path: &Path, subject: &str) -> PathBuf {
    storage_path.join(format!("{}.json", repo_id(subject)))
}
