//! Output path resolution and working-directory checks.

use std::path::{Path, PathBuf};

/// Resolve the output path for a source file.
///
/// Joins the file stem of `source` onto `out_dir` and substitutes
/// `out_extension`, mirroring the bundler's own output naming. Used both for
/// the default run target and for `--import` flag resolution.
///
/// # Examples
///
/// ```
/// use bolt_config::output_filename;
/// use std::path::Path;
///
/// let out = output_filename(Path::new("src/app.ts"), Path::new("dist"), ".mjs");
/// assert_eq!(out, Path::new("dist/app.mjs").to_path_buf());
/// ```
pub fn output_filename(source: &Path, out_dir: &Path, out_extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{}{}", stem, out_extension))
}

/// Whether `dir` refers to the process's current working directory.
///
/// Paths are canonicalized before comparison so `.`, `./`, and the absolute
/// spelling all match. A path that cannot be canonicalized (e.g. it does not
/// exist yet) is never the current directory.
pub fn is_current_dir(dir: &Path) -> bool {
    let Ok(cwd) = std::env::current_dir() else {
        return false;
    };
    match dir.canonicalize() {
        Ok(canonical) => canonical == cwd,
        Err(_) => false,
    }
}
