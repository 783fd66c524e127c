use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, LevelFilter};

use portwire::config::{ConfigSource, RouteConfig, DEFAULT_CLIENT_NAME};
use portwire::{
    all_satisfied, BackendKind, MatchOptions, PortDirection, PortEntry, PortRouter, PortSpec,
};

#[derive(Parser)]
#[command(name = "portwire", version, about = "Connect PipeWire and ALSA ports by name")]
struct Cli {
    /// Routing backend: pipewire or alsa [default: from the config file, else pipewire]
    #[arg(long, global = true)]
    backend: Option<BackendKind>,
    /// Client name shown by the ALSA sequencer
    #[arg(long, global = true)]
    client_name: Option<String>,
    /// Match port and device names exactly instead of ignoring case
    #[arg(long, global = true)]
    case_sensitive: bool,
    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply the configured routes (the default)
    Apply {
        /// Route file instead of the user config or the built-in routes
        #[arg(long)]
        config: Option<PathBuf>,
        /// Resolve routes without connecting anything
        #[arg(long)]
        dry_run: bool,
        /// Exit with an error if any route could not be satisfied
        #[arg(long)]
        strict: bool,
    },
    /// List ports
    List {
        #[arg(long, conflicts_with = "outputs")]
        inputs: bool,
        #[arg(long)]
        outputs: bool,
        /// Do not group stereo pairs
        #[arg(long)]
        flat: bool,
    },
    /// List existing connections
    Links,
    /// Connect the first matching output to the first matching input
    Connect(PairArgs),
    /// Remove a connection
    Disconnect(PairArgs),
    /// Print where the route file is looked up
    ConfigPath,
}

#[derive(Args)]
struct PairArgs {
    #[arg(long)]
    from_device: String,
    #[arg(long)]
    from_name: String,
    #[arg(long)]
    to_device: String,
    #[arg(long)]
    to_name: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

fn run(mut cli: Cli) -> Result<ExitCode> {
    let cmd = cli.cmd.take().unwrap_or(Cmd::Apply {
        config: None,
        dry_run: false,
        strict: false,
    });

    match cmd {
        Cmd::Apply { config, dry_run, strict } => {
            let (config, source) =
                RouteConfig::locate(config.as_deref()).context("loading routes")?;
            match source {
                ConfigSource::File(ref path) => debug!("routes from {}", path.display()),
                ConfigSource::Builtin => debug!("built-in routes"),
            }
            let backend = cli.backend.unwrap_or(config.backend);
            let client_name = cli
                .client_name
                .clone()
                .unwrap_or_else(|| config.client_name.clone());
            let mut router = PortRouter::new(backend, &client_name)?;
            let mut options = config.match_options();
            options.case_sensitive |= cli.case_sensitive;
            router.set_match_options(options);

            let reports = router.apply(&config.routes, dry_run)?;
            for report in &reports {
                println!("{}", report);
            }
            if strict && !all_satisfied(&reports) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Cmd::List { inputs, outputs, flat } => {
            let router = open_router(&cli)?;
            let directions = match (inputs, outputs) {
                (true, false) => vec![PortDirection::Input],
                (false, true) => vec![PortDirection::Output],
                _ => vec![PortDirection::Output, PortDirection::Input],
            };
            for direction in directions {
                println!("{}s:", direction);
                if flat {
                    for port in router.ports(direction)? {
                        println!("{:>6} {}", port.id(), port);
                    }
                    continue;
                }
                let entries = match direction {
                    PortDirection::Input => router.inputs()?,
                    PortDirection::Output => router.outputs()?,
                };
                for entry in entries {
                    let stereo = matches!(entry, PortEntry::Stereo { .. });
                    for (i, port) in entry.ports().into_iter().enumerate() {
                        let tag = if stereo && i == 0 { " (stereo)" } else { "" };
                        println!("{:>6} {}{}", port.id(), port.full_name(), tag);
                    }
                }
            }
        }
        Cmd::Links => {
            let router = open_router(&cli)?;
            let outputs = router.ports(PortDirection::Output)?;
            let inputs = router.ports(PortDirection::Input)?;
            for link in router.links()? {
                let name = |ports: &[portwire::Port], id: portwire::PortId| {
                    ports
                        .iter()
                        .find(|p| p.id() == id)
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| format!("#{}", id))
                };
                println!("{} -> {}", name(&outputs, link.output), name(&inputs, link.input));
            }
        }
        Cmd::Connect(ref pair) | Cmd::Disconnect(ref pair) => {
            let mut router = open_router(&cli)?;
            let from_spec = PortSpec::new(pair.from_device.as_str(), pair.from_name.as_str());
            let to_spec = PortSpec::new(pair.to_device.as_str(), pair.to_name.as_str());
            let from = router
                .find_output(&from_spec)?
                .ok_or_else(|| anyhow!("no output port matches {}", from_spec))?;
            let to = router
                .find_input(&to_spec)?
                .ok_or_else(|| anyhow!("no input port matches {}", to_spec))?;
            if matches!(cmd, Cmd::Connect(_)) {
                router.connect(&from, &to)?;
                println!("connected {} -> {}", from, to);
            } else {
                router.disconnect(&from, &to)?;
                println!("disconnected {} -> {}", from, to);
            }
        }
        Cmd::ConfigPath => {
            println!("{}", RouteConfig::user_path()?.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Router for the one-off commands, configured from the command line only.
fn open_router(cli: &Cli) -> Result<PortRouter> {
    let backend = cli.backend.unwrap_or_default();
    let client_name = cli.client_name.as_deref().unwrap_or(DEFAULT_CLIENT_NAME);
    let mut router = PortRouter::new(backend, client_name)?;
    router.set_match_options(MatchOptions {
        case_sensitive: cli.case_sensitive,
    });
    Ok(router)
}
