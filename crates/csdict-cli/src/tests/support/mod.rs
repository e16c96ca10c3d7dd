//! Test support utilities for csdict behavioural coverage.
//!
//! Supplies harness types for starting fake servers, feeding scripted terminal
//! input, and capturing CLI output so step definitions and unit tests remain
//! focused on their assertions.

mod fake_server;
mod scripted;

use std::cell::RefCell;
use std::ffi::OsString;
use std::io::Cursor;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use csdict_config::Config;
use rstest::fixture;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

pub(crate) use fake_server::{FakeServer, ServerScript};
pub(crate) use scripted::{ScriptedConnector, Wire};

/// A config loader that returns a fixed configuration for tests.
pub(crate) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Test world holding CLI state, the fake server, and captured output.
#[derive(Default)]
pub(crate) struct TestWorld {
    pub config: Config,
    pub server: Option<FakeServer>,
    pub input: String,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<String>,
}

impl TestWorld {
    /// Starts a fake server and points the default port at it.
    pub fn start_server(&mut self, script: ServerScript) -> Result<()> {
        let server = FakeServer::spawn(script)?;
        self.config.default_port = server.port();
        self.server = Some(server);
        Ok(())
    }

    /// Queues terminal input. Commands are separated by `;`.
    pub fn type_commands(&mut self, commands: &str) {
        for command in commands.split(';') {
            self.input.push_str(command.trim());
            self.input.push('\n');
        }
    }

    /// Runs the CLI with `options` against the queued input.
    pub fn run(&mut self, options: &[&str]) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        let mut args = vec![OsString::from("csdict")];
        args.extend(options.iter().map(OsString::from));
        let mut stdin = Cursor::new(self.input.clone().into_bytes());
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut io = IoStreams::new(&mut stdin, &mut self.stdout, &mut self.stderr);
        let exit = run_with_loader(args, &mut io, &loader);
        self.exit_code = Some(exit);
        if let Some(server) = self.server.as_mut() {
            self.requests = server.take_requests()?;
        }
        Ok(())
    }

    pub fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone()).context("stdout utf8")
    }

    pub fn stderr_text(&self) -> Result<String> {
        String::from_utf8(self.stderr.clone()).context("stderr utf8")
    }

    /// Like [`TestWorld::run`], with debugging output enabled.
    pub fn run_debug(&mut self) -> Result<()> {
        self.run(&["-d"])
    }

    /// Output lines with prompts removed.
    pub fn output_lines(&self) -> Result<Vec<String>> {
        Ok(self
            .stdout_text()?
            .split(crate::repl::PROMPT)
            .flat_map(str::lines)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }

    pub fn assert_output_contains(&self, snippet: &str) -> Result<()> {
        let lines = self.output_lines()?;
        ensure!(
            lines.iter().any(|line| line == snippet),
            "expected output line {snippet:?} in {lines:?}"
        );
        Ok(())
    }

    pub fn assert_output_mentions(&self, snippet: &str) -> Result<()> {
        let lines = self.output_lines()?;
        ensure!(
            lines.iter().any(|line| line.contains(snippet)),
            "expected a line containing {snippet:?} in {lines:?}"
        );
        Ok(())
    }

    pub fn assert_output_lacks(&self, snippet: &str) -> Result<()> {
        let lines = self.output_lines()?;
        ensure!(
            !lines.iter().any(|line| line.contains(snippet)),
            "unexpected {snippet:?} in {lines:?}"
        );
        Ok(())
    }

    /// Compares the server's request log with `expected`, given as
    /// `;`-separated request lines.
    pub fn assert_requests(&self, expected: &str) -> Result<()> {
        let expected: Vec<&str> = expected.split(';').map(str::trim).collect();
        ensure!(
            self.requests == expected,
            "expected requests {expected:?} but the server saw {:?}",
            self.requests
        );
        Ok(())
    }

    pub fn assert_success(&self) -> Result<()> {
        let exit = self.exit_code.context("exit code not recorded")?;
        ensure!(exit == ExitCode::SUCCESS, "expected success, got {exit:?}");
        Ok(())
    }
}

#[fixture]
pub(crate) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
