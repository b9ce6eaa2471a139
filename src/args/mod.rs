use crate::{Config, Directories, Scenario};

use anyhow::Context as _;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::exit;
use tokio::time::Duration;

mod dirs;
mod init;
mod list;

static HELP_MESSAGE: &str = "
usage:
    reactive-practice [flags] [scenario | subcommand]

flags:
    -h, --help                  prints this message
    -v, --version               prints the version
    -c, --config <path>         load the configuration from <path>
    --cancel-after <seconds>    dispose the scenario after <seconds>

subcommands:
    init            writes the default configuration file
    dirs            prints the configuration directory
    list            prints the available scenarios

with no scenario, `flat-map` is run
";

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Version,
    Init,
    Dirs,
    List,
    Run(RunArgs),
}

/// Arguments for running a single scenario
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunArgs {
    pub scenario: Scenario,
    pub config: Option<PathBuf>,
    pub cancel_after: Option<Duration>,
}

/// Everything needed to run a scenario
#[derive(Debug, Clone)]
pub struct Options {
    pub scenario: Scenario,
    pub config: Config,
    pub cancel_after: Option<Duration>,
}

/// Parse the process arguments, handling the subcommands that exit immediately
pub fn handle_args() -> Options {
    let cmd = parse(pico_args::Arguments::from_env()).unwrap_or_exit(|err| {
        eprintln!("invalid arguments provided: {:#}", err);
    });

    match cmd {
        Command::Help => {
            println!("reactive-practice. revision: {}", revision());
            println!("{}", HELP_MESSAGE);
            exit(0);
        }
        Command::Version => {
            println!("revision: {}", revision());
            exit(0);
        }
        Command::Init => init::init(),
        Command::Dirs => dirs::dirs(),
        Command::List => list::list(),
        Command::Run(args) => load_options(args),
    }
}

/// Parse arguments into a [`Command`]
pub fn parse(mut args: pico_args::Arguments) -> anyhow::Result<Command> {
    if args.contains(["-h", "--help"]) {
        return Ok(Command::Help);
    }

    if args.contains(["-v", "--version"]) {
        return Ok(Command::Version);
    }

    let config = args.opt_value_from_str(["-c", "--config"])?;
    let cancel_after = args
        .opt_value_from_str::<_, u64>("--cancel-after")?
        .map(Duration::from_secs);

    let cmd = args.subcommand().context("cannot parse subcommand")?;
    let rest = args.finish();
    if !rest.is_empty() {
        anyhow::bail!("unexpected arguments: {}", join_lossy(&rest));
    }

    let scenario = match cmd.as_deref() {
        Some("init") => return Ok(Command::Init),
        Some("dirs") => return Ok(Command::Dirs),
        Some("list") => return Ok(Command::List),
        Some(name) => name.parse()?,
        None => Scenario::default(),
    };

    Ok(Command::Run(RunArgs {
        scenario,
        config,
        cancel_after,
    }))
}

fn load_options(args: RunArgs) -> Options {
    let RunArgs {
        scenario,
        config,
        cancel_after,
    } = args;

    let config = match config {
        Some(path) => Config::load(path),
        None => get_config_file().and_then(Config::load_or_default),
    }
    .unwrap_or_exit(|err| eprintln!("ERROR! cannot load configuration: {:#}", err));

    Options {
        scenario,
        config,
        cancel_after,
    }
}

fn revision() -> &'static str {
    env!("REACTIVE_PRACTICE_GIT_REVISION")
}

fn get_config_file() -> anyhow::Result<PathBuf> {
    Directories::config_file()
}

fn join_lossy(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

trait ResultExt<T, E> {
    fn unwrap_or_exit<F>(self, quit: F) -> T
    where
        F: FnOnce(E);
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn unwrap_or_exit<F>(self, quit: F) -> T
    where
        F: FnOnce(E),
    {
        self.unwrap_or_else(|err| {
            quit(err);
            exit(1);
        })
    }
}
