use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, warn};
use vigil_config::{AgentConfig, DEFAULT_CONFIG_PATH};
use vigil_core::EventKind;
use vigil_engine::AlertPipeline;
use vigil_telemetry::{EventLogger, LogFormat};

#[derive(Parser, Debug)]
#[command(
    name = "vigil",
    version,
    about = "Send a Telegram security alert for a login event",
    override_usage = "vigil <USERNAME> <EVENT_KIND> [OPTIONS]",
    after_help = "Event kinds: SUCCESS, FAILED, STARTUP (anything else is reported as an unknown event).\n\
                  The first two arguments are always taken as USERNAME and EVENT_KIND, even if they \
                  start with '-'; options go after them."
)]
pub struct Cli {
    /// User the event concerns
    pub username: String,

    /// Event kind (case-insensitive)
    pub event_kind: String,

    /// Path to the JSON configuration file
    #[arg(short, long, env = "VIGIL_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log line encoding
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse a login hook invocation: `vigil <username> <event_kind> [options]`.
    ///
    /// The username comes from whoever attempted the login, so the first two
    /// arguments are never interpreted as flags. With fewer than two
    /// arguments clap parses as usual, which covers `--help` and `--version`.
    pub fn parse_invocation<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if args.len() >= 3 {
            let positionals: Vec<OsString> = args.drain(1..3).collect();
            args.push(OsString::from("--"));
            args.extend(positionals);
        }
        Self::try_parse_from(args)
    }
}

/// Exit code for an argument error: `0` for help and version output,
/// `1` for everything else.
pub fn usage_exit_code(error: &clap::Error) -> u8 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Run one alert and return the process exit code.
pub fn run_command(cli: Cli) -> u8 {
    EventLogger::init(cli.log_format, cli.verbose);

    let kind = EventKind::parse(&cli.event_kind);
    if kind == EventKind::Other {
        warn!("Unrecognised event kind '{}'", cli.event_kind);
    }

    let config = match AgentConfig::load_from_path(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            warn!("{e}; using default settings");
            AgentConfig::default()
        }
    };
    debug!(?config, "Effective configuration");

    match AlertPipeline::from_config(&config, &cli.config) {
        Ok(pipeline) => pipeline.run(&cli.username, kind).exit_code(),
        Err(e) => {
            tracing::error!("{e}");
            1
        }
    }
}
