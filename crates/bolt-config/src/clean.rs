//! Output directory cleaning.

use std::path::Path;

use crate::error::Result;

/// Remove prior build output from `dir`.
///
/// Deletes the directory's contents but keeps the directory itself, so an
/// editor or terminal sitting in it is not left on a dangling path. A
/// directory that does not exist yet is not an error.
///
/// Callers are responsible for never pointing this at the working directory;
/// the configuration assembler skips cleaning in that case.
pub fn clean_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else {
            std::fs::remove_file(&path)?;
        }
    }

    tracing::debug!("cleaned output directory {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_contents_keeps_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stale.js"), "x").unwrap();
        std::fs::create_dir(dir.path().join("chunks")).unwrap();
        std::fs::write(dir.path().join("chunks/shared.js"), "y").unwrap();

        clean_dir(dir.path()).unwrap();

        assert!(dir.path().exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-built");
        clean_dir(&missing).unwrap();
    }
}
