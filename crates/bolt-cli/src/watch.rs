//! File system watcher feeding the rebuild loop.
//!
//! Watches the project directory recursively and forwards source changes
//! through a channel, with debouncing so an editor's burst of writes to one
//! file triggers a single rebuild. node_modules and hidden paths are never
//! forwarded, nor is anything under the caller-supplied ignore paths (the
//! build outputs); without that filter every build would retrigger itself.

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::Result;

/// Debounce window between events for the same path.
pub const DEBOUNCE_MS: u64 = 100;

/// Watches project sources and emits changed paths.
///
/// Dropping the watcher stops the stream.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
}

impl SourceWatcher {
    /// Start watching `root` recursively.
    ///
    /// `ignore_paths` are root-relative files or directories skipped entirely;
    /// the caller passes the build outputs here so emitted bundles do not
    /// feed back into the loop, even when the output directory is the
    /// working directory itself.
    ///
    /// # Errors
    ///
    /// Fails if the platform watcher cannot be created or the root cannot be
    /// registered with it.
    pub fn start(
        root: PathBuf,
        ignore_paths: Vec<PathBuf>,
    ) -> Result<(Self, mpsc::Receiver<PathBuf>)> {
        let (tx, rx) = mpsc::channel(100);

        // Events carry absolute paths; the root must match their spelling
        // for prefix stripping, so `.` and friends are resolved first.
        let filter_root = root.canonicalize().unwrap_or_else(|_| root.clone());
        let ignore_paths: Vec<PathBuf> = ignore_paths
            .iter()
            .map(|p| normalize(p))
            .filter(|p| !p.as_os_str().is_empty())
            .collect();

        let debounce = Duration::from_millis(DEBOUNCE_MS);
        let mut last_event: Option<(PathBuf, Instant)> = None;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else { return };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }

            for path in &event.paths {
                if should_ignore(path, &filter_root, &ignore_paths) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                // The receiver side coalesces; a full channel just means a
                // rebuild is already pending.
                let _ = tx.blocking_send(path.clone());
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching for changes");

        Ok((Self { _watcher: watcher }, rx))
    }
}

/// Drop `.` components so `./dist/app.mjs` and `dist/app.mjs` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Whether a changed path is irrelevant to rebuilding.
fn should_ignore(path: &Path, root: &Path, ignore_paths: &[PathBuf]) -> bool {
    // Paths outside the project never trigger a rebuild.
    let Ok(rel) = path.strip_prefix(root) else {
        return true;
    };

    for component in rel.components() {
        let Some(name) = component.as_os_str().to_str() else {
            return true;
        };
        if name.starts_with('.') || name == "node_modules" {
            return true;
        }
    }

    ignore_paths.iter().any(|p| rel.starts_with(p))
}
