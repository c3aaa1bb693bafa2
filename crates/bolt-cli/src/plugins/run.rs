//! The run plugin: supervises the bundled program across rebuilds.
//!
//! One supervisor exists per watch session and owns the lifecycle of the
//! user's program: launch after the first successful build, restart after
//! every subsequent one, terminate on session end. The restart protocol is
//! strictly serialized: the configured kill signal is sent to the current
//! process and its exit is awaited before the replacement is launched, so
//! two instances never contend for the same listening sockets or file locks.
//!
//! Failed rebuilds leave the running process untouched. A launch failure is
//! reported but never ends the watch session; the next successful rebuild
//! retries. There is no timeout escalation after a cooperative signal: with
//! `--grace` the supervisor waits for the child as long as it takes.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::error::Result;
use crate::hooks::{BuildHooks, BuildOutcome};
use crate::ui;

/// Signal used to terminate the supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillSignal {
    /// Immediate forceful termination (SIGKILL). The default: a hung program
    /// must not delay the next rebuild.
    Force,
    /// Cooperative termination (SIGTERM) the child can intercept for cleanup.
    Grace,
}

impl KillSignal {
    /// The signal's conventional name.
    pub fn as_str(&self) -> &'static str {
        match self {
            KillSignal::Force => "SIGKILL",
            KillSignal::Grace => "SIGTERM",
        }
    }
}

/// The command line used to (re)launch the supervised process.
#[derive(Debug, Clone)]
pub struct RunCommand {
    /// Resolved program path (the bundled output file).
    pub program: PathBuf,
    /// Node runtime options, including derived `--import` pairs.
    pub node_options: Vec<String>,
}

/// Handle to one spawned process instance.
///
/// Modeled as a capability so the restart-serialization invariant is directly
/// testable with a fake that completes exit under test control. `Sync` is
/// required so a configuration holding the supervisor can be borrowed across
/// await points in the build cycle.
#[async_trait]
pub trait ProcessHandle: Send + Sync {
    /// Deliver `signal` to the process.
    fn signal(&mut self, signal: KillSignal) -> io::Result<()>;

    /// Await exit confirmation. Returns the exit code, `None` when the
    /// process was killed by a signal.
    async fn wait(&mut self) -> io::Result<Option<i32>>;

    /// Non-blocking exit probe: `Some(code)` when the process has already
    /// exited, `None` while it is still running.
    fn try_status(&mut self) -> io::Result<Option<Option<i32>>>;
}

/// Capability to launch process instances.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    async fn launch(&self, command: &RunCommand) -> io::Result<Box<dyn ProcessHandle>>;
}

/// Launches the program under the node runtime with inherited streams, so
/// program output lands in the same terminal as build status.
pub struct NodeLauncher;

#[async_trait]
impl ProcessLauncher for NodeLauncher {
    async fn launch(&self, command: &RunCommand) -> io::Result<Box<dyn ProcessHandle>> {
        let child = Command::new("node")
            .args(&command.node_options)
            .arg(&command.program)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            // Last-resort orphan protection if the supervisor is torn down
            // without reaching the shutdown transition.
            .kill_on_drop(true)
            .spawn()?;
        Ok(Box::new(NodeProcess { child }))
    }
}

struct NodeProcess {
    child: Child,
}

#[async_trait]
impl ProcessHandle for NodeProcess {
    fn signal(&mut self, signal: KillSignal) -> io::Result<()> {
        match signal {
            KillSignal::Force => self.child.start_kill(),
            KillSignal::Grace => self.terminate(),
        }
    }

    async fn wait(&mut self) -> io::Result<Option<i32>> {
        self.child.wait().await.map(|status| status.code())
    }

    fn try_status(&mut self) -> io::Result<Option<Option<i32>>> {
        self.child
            .try_wait()
            .map(|status| status.map(|s| s.code()))
    }
}

impl NodeProcess {
    #[cfg(unix)]
    fn terminate(&mut self) -> io::Result<()> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let pid = self
            .child
            .id()
            .ok_or_else(|| io::Error::other("process has already exited"))?;
        kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(io::Error::other)
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> io::Result<()> {
        // No cooperative signal to deliver on this platform.
        self.child.start_kill()
    }
}

enum State {
    /// No process instance is live.
    Idle,
    /// A process handle exists and has not been confirmed exited.
    Running(Box<dyn ProcessHandle>),
}

/// Owns the supervised process across a watch session.
///
/// At most one instance is live at any time; see the module docs for the
/// restart protocol.
pub struct ProcessSupervisor {
    command: RunCommand,
    kill_signal: KillSignal,
    launcher: Box<dyn ProcessLauncher>,
    state: State,
}

impl ProcessSupervisor {
    /// Supervisor launching real node processes.
    pub fn new(command: RunCommand, kill_signal: KillSignal) -> Self {
        Self::with_launcher(command, kill_signal, Box::new(NodeLauncher))
    }

    /// Supervisor with an explicit launcher capability (used by tests).
    pub fn with_launcher(
        command: RunCommand,
        kill_signal: KillSignal,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Self {
        Self {
            command,
            kill_signal,
            launcher,
            state: State::Idle,
        }
    }

    /// The configured kill signal.
    pub fn kill_signal(&self) -> KillSignal {
        self.kill_signal
    }

    /// The configured launch command.
    pub fn command(&self) -> &RunCommand {
        &self.command
    }

    /// Whether a process instance is currently live.
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// Await the current instance's exit without signaling it.
    ///
    /// Used by the one-shot build path, where the program runs to completion
    /// instead of being restarted. Returns the exit code, `None` when there
    /// is no live instance or it was killed by a signal.
    pub async fn wait_for_exit(&mut self) -> Result<Option<i32>> {
        let State::Running(mut handle) = std::mem::replace(&mut self.state, State::Idle) else {
            return Ok(None);
        };
        let code = handle.wait().await?;
        Ok(code)
    }

    /// Terminate the current instance and await its exit confirmation.
    ///
    /// No-op when idle. A process that already exited between rebuilds is
    /// logged and skipped straight past the signaling step.
    async fn stop_current(&mut self) {
        let State::Running(mut handle) = std::mem::replace(&mut self.state, State::Idle) else {
            return;
        };

        match handle.try_status() {
            Ok(Some(code)) => {
                // Exited on its own between rebuilds. Not fatal; the caller
                // relaunches on the next successful build.
                match code {
                    Some(0) => tracing::debug!("process exited before restart"),
                    Some(code) => {
                        ui::warning(&format!("process exited unexpectedly with code {code}"))
                    }
                    None => ui::warning("process was killed externally"),
                }
                return;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("could not probe process status: {e}"),
        }

        tracing::debug!("sending {} to supervised process", self.kill_signal.as_str());
        if let Err(e) = handle.signal(self.kill_signal) {
            tracing::warn!("failed to signal supervised process: {e}");
        }

        // Exit must be confirmed before any replacement starts; launching
        // over a live predecessor produces port and lock contention.
        if let Err(e) = handle.wait().await {
            tracing::warn!("failed to await supervised process exit: {e}");
        }
    }

    /// Launch a fresh instance.
    ///
    /// A launch failure is reported through the error channel and leaves the
    /// supervisor idle; the watch session continues and the next successful
    /// rebuild retries.
    async fn launch(&mut self) {
        match self.launcher.launch(&self.command).await {
            Ok(handle) => {
                tracing::debug!("launched {}", self.command.program.display());
                self.state = State::Running(handle);
            }
            Err(e) => {
                ui::error(&format!(
                    "Failed to launch {}: {e}",
                    self.command.program.display()
                ));
            }
        }
    }
}

#[async_trait]
impl BuildHooks for ProcessSupervisor {
    async fn on_build_end(&mut self, outcome: &BuildOutcome) -> Result<()> {
        if !outcome.success {
            // A failed rebuild must not kill a healthy running process.
            return Ok(());
        }

        self.stop_current().await;
        self.launch().await;
        Ok(())
    }

    async fn on_session_end(&mut self) -> Result<()> {
        self.stop_current().await;
        Ok(())
    }
}
