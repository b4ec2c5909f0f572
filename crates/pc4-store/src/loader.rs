//! RF2 release discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Rf2Files, StoreError, StoreResult};

/// Discovers the Snapshot files of a SNOMED CT release directory.
///
/// Accepts the release root, its `Snapshot` directory, or the
/// `Snapshot/Terminology` directory itself. Language and simple reference
/// sets are picked up from anywhere below `Snapshot/Refset`.
pub fn discover_rf2_files<P: AsRef<Path>>(path: P) -> StoreResult<Rf2Files> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(StoreError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let terminology_dir = find_terminology_dir(path)?;
    let mut files = Rf2Files::new();

    for entry in fs::read_dir(&terminology_dir)? {
        let entry = entry?;
        let filename = entry.file_name();
        let filename = filename.to_string_lossy();

        if !filename.ends_with(".txt") {
            continue;
        }

        if filename.starts_with("sct2_Concept_Snapshot") {
            files.concept_file = Some(entry.path());
            if let Some(date) = extract_release_date(&filename) {
                files.release_date = Some(date);
            }
        } else if filename.starts_with("sct2_Description_Snapshot") {
            files.description_file = Some(entry.path());
        } else if filename.starts_with("sct2_Relationship_Snapshot") {
            files.relationship_file = Some(entry.path());
        }
    }

    if let Some(snapshot_dir) = terminology_dir.parent() {
        let refset_dir = snapshot_dir.join("Refset");
        if refset_dir.is_dir() {
            discover_refset_files(&refset_dir, &mut files)?;
        }
    }

    if !files.has_required_files() {
        return Err(StoreError::RequiredFileMissing {
            file_type: files.missing_files().join(", "),
            directory: terminology_dir.display().to_string(),
        });
    }

    files.language_refset_files.sort();
    files.simple_refset_files.sort();
    Ok(files)
}

/// Walks a Refset directory collecting language and simple refset files.
fn discover_refset_files(dir: &Path, files: &mut Rf2Files) -> StoreResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            discover_refset_files(&path, files)?;
            continue;
        }

        let filename = entry.file_name();
        let filename = filename.to_string_lossy();
        if !filename.ends_with(".txt") || !filename.contains("Snapshot") {
            continue;
        }

        if filename.starts_with("der2_cRefset_Language") {
            files.language_refset_files.push(path);
        } else if filename.starts_with("der2_Refset_Simple") {
            files.simple_refset_files.push(path);
        }
    }

    Ok(())
}

/// Finds the Terminology directory within a release.
fn find_terminology_dir(base: &Path) -> StoreResult<PathBuf> {
    if base.ends_with("Terminology") {
        return Ok(base.to_path_buf());
    }

    let candidates = [base.join("Snapshot").join("Terminology"), base.join("Terminology")];
    if let Some(found) = candidates.into_iter().find(|p| p.is_dir()) {
        return Ok(found);
    }

    // One level deep, for archives unpacked into a wrapping directory.
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let subdir = entry.path();
            let nested = subdir.join("Snapshot").join("Terminology");
            if nested.is_dir() {
                return Ok(nested);
            }
        }
    }

    Err(StoreError::DirectoryNotFound {
        path: format!("Terminology directory not found in {}", base.display()),
    })
}

/// Extracts the release date from a file name such as
/// `sct2_Concept_Snapshot_INT_20250101.txt`.
fn extract_release_date(filename: &str) -> Option<String> {
    let last = filename.trim_end_matches(".txt").rsplit('_').next()?;
    (last.len() == 8 && last.chars().all(|c| c.is_ascii_digit())).then(|| last.to_string())
}
