//! Project settings derived from `package.json`.
//!
//! Resolution happens once per invocation; the resulting [`ProjectSettings`]
//! is read-only for the rest of the process lifetime and shared by the
//! configuration assembler and every plugin.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Module format emitted by the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// CommonJS (`require`/`module.exports`)
    Cjs,
    /// ECMAScript modules
    Esm,
}

impl Format {
    /// The format name as the bundler CLI expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Cjs => "cjs",
            Format::Esm => "esm",
        }
    }
}

/// Fallback runtime target when `engines.node` is absent.
const DEFAULT_TARGET: &str = "node20";

/// Resolved per-project settings.
///
/// Computed once from the project manifest and cached for the process
/// lifetime. All paths are relative to the working directory the manifest
/// was read from.
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    /// Output directory for bundled files.
    pub out_dir: PathBuf,
    /// Extension substituted for `.js` in output filenames (e.g. `.mjs`).
    pub out_extension: String,
    /// Module format for the output.
    pub format: Format,
    /// Runtime target (e.g. `node20`).
    pub target: String,
    /// Package names kept external to the bundle (everything in
    /// `dependencies`/`peerDependencies`/`optionalDependencies` that is not
    /// allowlisted).
    pub externals: Vec<String>,
    /// Package names bundled despite being dependencies
    /// (`bundledDependencies`).
    pub allow_list: Vec<String>,
    /// Loader mapping by file extension (e.g. `.png` -> `file`).
    pub loader: BTreeMap<String, String>,
    /// Files injected into every bundle.
    pub inject: Vec<String>,
    /// Polyfill shim modules injected ahead of user code.
    pub polyfills: Vec<String>,
}

/// The subset of `package.json` this tool reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(rename = "type")]
    module_type: Option<String>,
    main: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    peer_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    optional_dependencies: BTreeMap<String, String>,
    #[serde(default, alias = "bundleDependencies")]
    bundled_dependencies: Vec<String>,
    engines: Option<Engines>,
    #[serde(default)]
    bolt: ToolSection,
}

#[derive(Debug, Default, Deserialize)]
struct Engines {
    node: Option<String>,
}

/// Optional `"bolt"` section for settings npm has no standard field for.
#[derive(Debug, Default, Deserialize)]
struct ToolSection {
    #[serde(default)]
    polyfills: Vec<String>,
    #[serde(default)]
    loader: BTreeMap<String, String>,
    #[serde(default)]
    inject: Vec<String>,
}

impl ProjectSettings {
    /// Resolve settings from the `package.json` in `cwd`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ManifestNotFound`] when no manifest exists and
    /// [`ConfigError::InvalidManifest`] when it fails to parse. Both are
    /// fatal: no build is attempted without resolved settings.
    pub fn resolve(cwd: &Path) -> Result<Self> {
        let manifest_path = cwd.join("package.json");
        if !manifest_path.is_file() {
            return Err(ConfigError::ManifestNotFound(cwd.to_path_buf()));
        }

        let raw = std::fs::read_to_string(&manifest_path)?;
        let manifest: Manifest = serde_json::from_str(&raw)?;

        tracing::debug!("resolved project settings from {}", manifest_path.display());
        Self::from_manifest(manifest)
    }

    fn from_manifest(manifest: Manifest) -> Result<Self> {
        let format = match manifest.module_type.as_deref() {
            Some("module") => Format::Esm,
            Some("commonjs") | None => Format::Cjs,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    field: "type".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let (out_dir, out_extension) = destination(manifest.main.as_deref(), format);

        let target = manifest
            .engines
            .as_ref()
            .and_then(|e| e.node.as_deref())
            .map(node_target)
            .unwrap_or_else(|| DEFAULT_TARGET.to_string());

        let allow_list = manifest.bundled_dependencies;
        let externals = manifest
            .dependencies
            .keys()
            .chain(manifest.peer_dependencies.keys())
            .chain(manifest.optional_dependencies.keys())
            .filter(|name| !allow_list.iter().any(|a| a == *name))
            .cloned()
            .collect();

        Ok(Self {
            out_dir,
            out_extension,
            format,
            target,
            externals,
            allow_list,
            loader: manifest.bolt.loader,
            inject: manifest.bolt.inject,
            polyfills: manifest.bolt.polyfills,
        })
    }
}

/// Derive output directory and extension.
///
/// The `main` field is the authority when present: `"main": "dist/index.mjs"`
/// yields `dist` and `.mjs`. Without it the destination defaults to `dist`
/// with an extension keyed to the module format.
fn destination(main: Option<&str>, format: Format) -> (PathBuf, String) {
    if let Some(main) = main {
        let main = Path::new(main);
        let dir = match main.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if let Some(ext) = main.extension() {
            return (dir, format!(".{}", ext.to_string_lossy()));
        }
        return (dir, default_extension(format));
    }
    (PathBuf::from("dist"), default_extension(format))
}

fn default_extension(format: Format) -> String {
    match format {
        Format::Cjs => ".js".to_string(),
        Format::Esm => ".mjs".to_string(),
    }
}

/// Map an `engines.node` range to a bundler target.
///
/// Takes the first digit run in the range, so `>=20.11.0` and `^20 || ^22`
/// both become `node20`.
fn node_target(range: &str) -> String {
    let major: String = range
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if major.is_empty() {
        DEFAULT_TARGET.to_string()
    } else {
        format!("node{}", major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(json: &str) -> Manifest {
        serde_json::from_str(json).expect("valid test manifest")
    }

    #[test]
    fn test_format_from_type_field() {
        let settings = ProjectSettings::from_manifest(manifest(r#"{"type": "module"}"#)).unwrap();
        assert_eq!(settings.format, Format::Esm);

        let settings = ProjectSettings::from_manifest(manifest("{}")).unwrap();
        assert_eq!(settings.format, Format::Cjs);
    }

    #[test]
    fn test_invalid_type_field_rejected() {
        let err = ProjectSettings::from_manifest(manifest(r#"{"type": "umd"}"#)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_destination_from_main() {
        let settings = ProjectSettings::from_manifest(manifest(
            r#"{"type": "module", "main": "build/out/index.mjs"}"#,
        ))
        .unwrap();
        assert_eq!(settings.out_dir, PathBuf::from("build/out"));
        assert_eq!(settings.out_extension, ".mjs");
    }

    #[test]
    fn test_destination_defaults() {
        let settings = ProjectSettings::from_manifest(manifest("{}")).unwrap();
        assert_eq!(settings.out_dir, PathBuf::from("dist"));
        assert_eq!(settings.out_extension, ".js");

        let settings = ProjectSettings::from_manifest(manifest(r#"{"type": "module"}"#)).unwrap();
        assert_eq!(settings.out_extension, ".mjs");
    }

    #[test]
    fn test_externals_exclude_allow_list() {
        let settings = ProjectSettings::from_manifest(manifest(
            r#"{
                "dependencies": {"express": "^4", "lodash": "^4"},
                "peerDependencies": {"react": "^18"},
                "bundledDependencies": ["lodash"]
            }"#,
        ))
        .unwrap();

        assert_eq!(settings.externals, vec!["express", "react"]);
        assert_eq!(settings.allow_list, vec!["lodash"]);
    }

    #[test]
    fn test_node_target_from_engines() {
        assert_eq!(node_target(">=20.11.0"), "node20");
        assert_eq!(node_target("^18 || ^20"), "node18");
        assert_eq!(node_target("*"), DEFAULT_TARGET);
    }

    #[test]
    fn test_tool_section() {
        let settings = ProjectSettings::from_manifest(manifest(
            r#"{"bolt": {
                "polyfills": ["./shims/fetch.ts"],
                "loader": {".png": "file"},
                "inject": ["./globals.ts"]
            }}"#,
        ))
        .unwrap();

        assert_eq!(settings.polyfills, vec!["./shims/fetch.ts"]);
        assert_eq!(settings.loader.get(".png").map(String::as_str), Some("file"));
        assert_eq!(settings.inject, vec!["./globals.ts"]);
    }
}
