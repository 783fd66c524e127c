//! PipeWire backend, driven through the `pw-link` tool that ships with
//! PipeWire.

use std::env;
use std::ffi::OsString;
use std::io;
use std::process::Command;

use log::{debug, info};

use crate::errors::*;
use crate::port::{Link, Port, PortDirection};
use crate::traits::{check_directions, PortGraph};

mod parse;
pub use self::parse::{parse_links, parse_ports, split_full_name};

/// Environment variable that overrides the `pw-link` executable.
pub const PW_LINK_ENV: &str = "PORTWIRE_PW_LINK";
const DEFAULT_PW_LINK: &str = "pw-link";

/// What came back from one `pw-link` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandRunner {
    fn run(&self, args: &[&str]) -> io::Result<CommandOutput>;

    /// Name of the program, for messages.
    fn program(&self) -> String;
}

/// Runs the real `pw-link` executable.
#[derive(Debug, Clone)]
pub struct SystemCommand {
    program: OsString,
}

impl SystemCommand {
    pub fn new<P: Into<OsString>>(program: P) -> SystemCommand {
        SystemCommand { program: program.into() }
    }

    /// `pw-link`, or whatever `PORTWIRE_PW_LINK` points to.
    pub fn from_env() -> SystemCommand {
        Self::new(env::var_os(PW_LINK_ENV).unwrap_or_else(|| DEFAULT_PW_LINK.into()))
    }
}

impl CommandRunner for SystemCommand {
    fn run(&self, args: &[&str]) -> io::Result<CommandOutput> {
        let output = Command::new(&self.program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

pub struct PwLink<C: CommandRunner = SystemCommand> {
    runner: C,
}

impl PwLink<SystemCommand> {
    pub fn new() -> Result<Self, InitError> {
        Self::with_runner(SystemCommand::from_env())
    }
}

impl<C: CommandRunner> PwLink<C> {
    /// Checks that the runner can reach `pw-link` before handing out the backend.
    pub fn with_runner(runner: C) -> Result<Self, InitError> {
        match runner.run(&["--version"]) {
            Ok(ref out) if out.success => {
                debug!("using {}", out.stdout.lines().next().unwrap_or("pw-link").trim());
                Ok(PwLink { runner })
            }
            Ok(out) => {
                let stderr = out.stderr.trim();
                if stderr.is_empty() {
                    Err(InitError::Other(format!("`{} --version` failed", runner.program())))
                } else {
                    Err(InitError::Other(stderr.to_string()))
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                Err(InitError::CommandNotFound(runner.program()))
            }
            Err(e) => Err(InitError::Other(format!("{}: {}", runner.program(), e))),
        }
    }

    fn query(&self, args: &[&str]) -> Result<String, PortInfoError> {
        debug!("{} {}", self.runner.program(), args.join(" "));
        let out = self
            .runner
            .run(args)
            .map_err(|e| PortInfoError::QueryFailed(e.to_string()))?;
        if !out.success {
            return Err(PortInfoError::QueryFailed(out.stderr.trim().to_string()));
        }
        Ok(out.stdout)
    }

    fn link_command(&self, args: &[&str]) -> Result<CommandOutput, ConnectError> {
        debug!("{} {}", self.runner.program(), args.join(" "));
        self.runner.run(args).map_err(|e| ConnectError::other(e.to_string()))
    }
}

impl<C: CommandRunner> PortGraph for PwLink<C> {
    fn ports(&self, direction: PortDirection) -> Result<Vec<Port>, PortInfoError> {
        let flag = match direction {
            PortDirection::Input => "--input",
            PortDirection::Output => "--output",
        };
        let listing = self.query(&[flag, "--id"])?;
        parse_ports(&listing, direction)
    }

    fn links(&self) -> Result<Vec<Link>, PortInfoError> {
        let listing = self.query(&["--links", "--id"])?;
        parse_links(&listing)
    }

    fn connect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError> {
        check_directions(output, input)?;
        let (out_id, in_id) = (output.id().to_string(), input.id().to_string());
        let out = self.link_command(&[&out_id, &in_id])?;
        if out.success {
            info!("connected {} -> {}", output, input);
            return Ok(());
        }
        let stderr = out.stderr.trim();
        if stderr.contains("File exists") {
            Err(ConnectError::new(ConnectErrorKind::AlreadyConnected))
        } else {
            Err(ConnectError::other(stderr))
        }
    }

    fn disconnect(&mut self, output: &Port, input: &Port) -> Result<(), ConnectError> {
        check_directions(output, input)?;
        let (out_id, in_id) = (output.id().to_string(), input.id().to_string());
        let out = self.link_command(&["--disconnect", &out_id, &in_id])?;
        if out.success {
            info!("disconnected {} -> {}", output, input);
            return Ok(());
        }
        let stderr = out.stderr.trim();
        if stderr.contains("No such") {
            Err(ConnectError::new(ConnectErrorKind::NotConnected))
        } else {
            Err(ConnectError::other(stderr))
        }
    }
}
