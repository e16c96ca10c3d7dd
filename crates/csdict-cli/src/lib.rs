//! Command-line runtime for the csdict dictionary client.
//!
//! The module owns program option handling, configuration bootstrapping, and
//! the interactive loop that drives a DICT protocol session. The interface is
//! designed to be exercised both from the binary entrypoint and from tests
//! where configuration loading and IO streams can be substituted.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

mod cli;
mod config;
mod errors;
pub mod protocol;
mod repl;
pub mod session;
mod telemetry;
pub mod transport;

use cli::Cli;
use config::split_config_arguments;
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
use repl::Repl;
pub use session::{DisplayMode, Session, SessionError, Transcript};
pub use transport::{Connector, TcpConnector};

/// At most one program option (`-d`) is accepted.
const PERMITTED_OPTION_COUNT: usize = 1;

/// Bundles the IO streams provided to the CLI runtime.
///
/// Commands are read from `stdin`; dictionary output and client messages are
/// written to `stdout`; runtime failures are written to `stderr`.
pub(crate) struct IoStreams<'a, R: BufRead, W: Write, E: Write> {
    pub(crate) stdin: &'a mut R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, R: BufRead, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) fn new(stdin: &'a mut R, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }
}

struct CliRunner<'io, 'a, R: BufRead, W: Write, E: Write, L: ConfigLoader> {
    io: &'io mut IoStreams<'a, R, W, E>,
    loader: &'io L,
}

impl<'io, 'a, R, W, E, L> CliRunner<'io, 'a, R, W, E, L>
where
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'io mut IoStreams<'a, R, W, E>, loader: &'io L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        match self.start(&args) {
            Ok(exit_code) => exit_code,
            Err(error) => {
                let _ = if error.reported_on_stdout() {
                    writeln!(self.io.stdout, "{error}").and_then(|()| self.io.stdout.flush())
                } else {
                    writeln!(self.io.stderr, "{error}")
                };
                ExitCode::FAILURE
            }
        }
    }

    fn start(&mut self, args: &[OsString]) -> Result<ExitCode, AppError> {
        let split = split_config_arguments(args);
        let options = split.program_options(args);
        if options.len() > PERMITTED_OPTION_COUNT {
            return Err(AppError::TooManyOptions);
        }

        let binary = args
            .first()
            .cloned()
            .unwrap_or_else(|| OsString::from("csdict"));
        let cli = match Cli::try_parse_from(std::iter::once(binary).chain(options.iter().cloned()))
        {
            Ok(cli) => cli,
            Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                write!(self.io.stdout, "{error}").map_err(AppError::WriteOutput)?;
                return Ok(ExitCode::SUCCESS);
            }
            Err(error) => {
                tracing::debug!(%error, "rejected program options");
                return Err(AppError::InvalidOption);
            }
        };

        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let mode = DisplayMode::from_debug_flag(cli.debug);
        if mode.is_debug() {
            writeln!(self.io.stdout, "Debugging output enabled").map_err(AppError::WriteOutput)?;
        }

        let session = Session::new(TcpConnector::new(config.connect_timeout()), mode);
        Repl::new(session, config.default_port()).run(self.io)?;
        Ok(ExitCode::SUCCESS)
    }
}

/// Runs the client using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the client with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<I, R, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}
