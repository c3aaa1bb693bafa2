//! Type-check plugin: runs the TypeScript checker alongside the bundler.
//!
//! The checker is an external executable communicating over stdout text. In
//! watch mode one checker process lives for the whole session (`tsc --watch`
//! does its own incremental re-checking); its output is streamed line by line
//! and forwarded without ever blocking the build pipeline.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::hooks::BuildHooks;
use crate::ui;

/// Options for one checker invocation.
#[derive(Debug, Clone, Default)]
pub struct TypeCheckOptions {
    /// Keep the checker alive, re-checking on file changes.
    pub watch: bool,
    /// Explicit tsconfig path passed with `-p`.
    pub config: Option<PathBuf>,
}

/// Resolve the checker executable: the project-local installation under
/// `node_modules/.bin` wins over whatever is on PATH.
pub fn resolve_tsc(cwd: &Path) -> PathBuf {
    let local = cwd.join("node_modules/.bin/tsc");
    if local.is_file() {
        local
    } else {
        PathBuf::from("tsc")
    }
}

/// Argument list for the checker.
pub fn tsc_args(options: &TypeCheckOptions) -> Vec<String> {
    let mut args = vec!["--noEmit".to_string(), "--pretty".to_string()];
    if let Some(config) = &options.config {
        args.push("-p".to_string());
        args.push(config.to_string_lossy().into_owned());
    }
    if options.watch {
        args.push("--watch".to_string());
    }
    args
}

/// Spawn the checker and stream its stdout line by line.
///
/// Lines are yielded as produced; the whole output is never buffered, which
/// keeps watch-mode feedback responsive. stderr is inherited directly.
pub fn check(cwd: &Path, options: &TypeCheckOptions) -> io::Result<(Child, mpsc::Receiver<String>)> {
    let mut child = Command::new(resolve_tsc(cwd))
        .args(tsc_args(options))
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("checker stdout not captured"))?;

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });

    Ok((child, rx))
}

/// Plugin wrapper: starts the session-long checker on the first build and
/// forwards its output to stderr.
pub struct TypeCheckPlugin {
    cwd: PathBuf,
    options: TypeCheckOptions,
    checker: Option<Child>,
}

impl TypeCheckPlugin {
    pub fn new(cwd: PathBuf, config: Option<PathBuf>) -> Self {
        Self {
            cwd,
            options: TypeCheckOptions { watch: true, config },
            checker: None,
        }
    }
}

#[async_trait]
impl BuildHooks for TypeCheckPlugin {
    fn on_build_start(&mut self) {
        if self.checker.is_some() {
            return;
        }
        match check(&self.cwd, &self.options) {
            Ok((child, mut rx)) => {
                self.checker = Some(child);
                tokio::spawn(async move {
                    while let Some(line) = rx.recv().await {
                        eprintln!("{line}");
                    }
                });
            }
            Err(e) => ui::error(&format!("Failed to start type checker: {e}")),
        }
    }

    async fn on_session_end(&mut self) -> Result<()> {
        if let Some(mut child) = self.checker.take() {
            let _ = child.kill().await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_args() {
        let args = tsc_args(&TypeCheckOptions::default());
        assert_eq!(args, vec!["--noEmit", "--pretty"]);
    }

    #[test]
    fn test_watch_args() {
        let args = tsc_args(&TypeCheckOptions {
            watch: true,
            config: None,
        });
        assert_eq!(args, vec!["--noEmit", "--pretty", "--watch"]);
    }

    #[test]
    fn test_config_args() {
        let args = tsc_args(&TypeCheckOptions {
            watch: true,
            config: Some(PathBuf::from("tsconfig.build.json")),
        });
        assert_eq!(
            args,
            vec!["--noEmit", "--pretty", "-p", "tsconfig.build.json", "--watch"]
        );
    }

    #[test]
    fn test_resolve_tsc_falls_back_to_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_tsc(dir.path()), PathBuf::from("tsc"));
    }

    #[test]
    fn test_resolve_tsc_prefers_local() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("tsc"), "").unwrap();
        assert_eq!(resolve_tsc(dir.path()), bin.join("tsc"));
    }
}
