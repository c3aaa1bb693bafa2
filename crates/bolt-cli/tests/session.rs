//! Library-level flow tests for the one-shot build driver.
//!
//! The bundler and the process launcher are both capabilities, so the whole
//! build-then-run flow is exercised here with fakes and no external tools.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bolt_config::Format;

use bolt_cli::assemble::BuildConfiguration;
use bolt_cli::bundler::Bundler;
use bolt_cli::commands;
use bolt_cli::hooks::BuildOutcome;
use bolt_cli::plugins::{
    KillSignal, Plugin, ProcessHandle, ProcessLauncher, ProcessSupervisor, RunCommand,
};
use bolt_cli::{CliError, Result};

struct ScriptedBundler {
    succeed: bool,
}

#[async_trait]
impl Bundler for ScriptedBundler {
    async fn build(&self, _config: &BuildConfiguration) -> Result<BuildOutcome> {
        if self.succeed {
            Ok(BuildOutcome::succeeded(Duration::from_millis(10)))
        } else {
            Ok(BuildOutcome::failed(
                vec!["Unexpected token".to_string()],
                Duration::from_millis(10),
            ))
        }
    }
}

struct ExitingHandle {
    code: i32,
}

#[async_trait]
impl ProcessHandle for ExitingHandle {
    fn signal(&mut self, _signal: KillSignal) -> io::Result<()> {
        Ok(())
    }

    async fn wait(&mut self) -> io::Result<Option<i32>> {
        Ok(Some(self.code))
    }

    fn try_status(&mut self) -> io::Result<Option<Option<i32>>> {
        Ok(Some(Some(self.code)))
    }
}

struct CountingLauncher {
    launches: Arc<AtomicUsize>,
    exit_code: i32,
}

#[async_trait]
impl ProcessLauncher for CountingLauncher {
    async fn launch(&self, _command: &RunCommand) -> io::Result<Box<dyn ProcessHandle>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ExitingHandle {
            code: self.exit_code,
        }))
    }
}

fn config_with_run(launcher: CountingLauncher) -> BuildConfiguration {
    let supervisor = ProcessSupervisor::with_launcher(
        RunCommand {
            program: PathBuf::from("dist/app.mjs"),
            node_options: vec![],
        },
        KillSignal::Force,
        Box::new(launcher),
    );

    BuildConfiguration {
        entry_points: vec![PathBuf::from("app.ts")],
        bundle: true,
        inject: vec![],
        target: "node20".to_string(),
        out_dir: PathBuf::from("dist"),
        out_extension: ".mjs".to_string(),
        format: Format::Esm,
        splitting: true,
        minify: false,
        sourcemap: false,
        tsconfig: None,
        loader: BTreeMap::new(),
        plugins: vec![Plugin::Run(supervisor)],
    }
}

#[tokio::test]
async fn test_build_runs_program_and_returns_its_exit_code() {
    let launches = Arc::new(AtomicUsize::new(0));
    let mut config = config_with_run(CountingLauncher {
        launches: launches.clone(),
        exit_code: 3,
    });

    let exit = commands::build_execute(&mut config, &ScriptedBundler { succeed: true })
        .await
        .unwrap();

    assert_eq!(launches.load(Ordering::SeqCst), 1);
    assert_eq!(exit, Some(3));
}

#[tokio::test]
async fn test_failed_build_never_launches() {
    let launches = Arc::new(AtomicUsize::new(0));
    let mut config = config_with_run(CountingLauncher {
        launches: launches.clone(),
        exit_code: 0,
    });

    let err = commands::build_execute(&mut config, &ScriptedBundler { succeed: false })
        .await
        .unwrap_err();

    assert_eq!(launches.load(Ordering::SeqCst), 0);
    assert!(matches!(err, CliError::BuildFailed { count: 1 }));
}
