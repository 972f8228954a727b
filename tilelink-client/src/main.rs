//! Tilelink client
//!
//! Connects to a host over TCP and runs the frame loop against an in-memory
//! tile screen until the host closes the link.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info, trace};
use tracing_subscriber::EnvFilter;

use tilelink_core::{BatchOutcome, Session, SessionStats};
use tilelink_display::TileScreen;

mod clock;
mod config;
mod error;
mod input;
mod transport;

use clock::FrameTicker;
use config::ClientConfig;
use error::ClientError;
use input::HeldButtons;
use transport::TcpChannel;

#[derive(Parser, Debug, Default)]
#[command(
    name = "tilelink-client",
    about = "Render a host's tile and sprite commands, reporting input every frame",
    version
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Host address, overrides [link] host
    #[arg(long, value_name = "ADDR")]
    host: Option<String>,

    /// Protocol preset: primitives, tiles or superset
    #[arg(long, value_name = "NAME")]
    protocol: Option<String>,

    /// Session identity: monochrome or color
    #[arg(long, value_name = "ID")]
    system_id: Option<String>,

    /// Frames per second
    #[arg(long, value_name = "HZ")]
    rate: Option<u32>,

    /// Read timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Control held down for the whole session; repeatable
    #[arg(long = "hold", value_name = "CONTROL")]
    hold: Vec<String>,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    frames: Option<u32>,

    /// Log filter, e.g. `debug` or `tilelink_core=trace`; defaults to RUST_LOG, then `info`
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the file configuration
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(host) = &self.host {
            config.link.host = host.clone();
        }
        if let Some(preset) = &self.protocol {
            config.protocol.preset = preset.clone();
        }
        if let Some(id) = &self.system_id {
            config.session.system_id = id.clone();
        }
        if let Some(rate) = self.rate {
            config.frame.rate_hz = rate;
        }
        if let Some(timeout) = self.timeout {
            config.link.read_timeout_ms = timeout;
        }
        if !self.hold.is_empty() {
            config.input.held = self.hold.clone();
        }
    }
}

fn init_logging(filter: Option<&str>) -> Result<(), ClientError> {
    let filter = match filter {
        Some(directives) => {
            EnvFilter::try_new(directives).map_err(|e| ClientError::Logging(e.to_string()))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| ClientError::Logging(e.to_string()))
}

fn log_stats(stats: &SessionStats) {
    info!(
        frames = stats.frames,
        commands = stats.commands,
        abandoned = stats.abandoned(),
        unknown_opcode = stats.unknown_opcode,
        protocol_overflow = stats.protocol_overflow,
        channel_timeout = stats.channel_timeout,
        mismatched = stats.mismatched,
        render_errors = stats.render_errors,
        "session stats"
    );
}

fn run(cli: &Cli) -> Result<(), ClientError> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let session_config = config.session_config()?;
    let held = config.held_buttons()?;
    let period = config.frame_period()?;
    info!(
        host = %config.link.host,
        preset = %config.protocol.preset,
        system_id = ?session_config.system_id,
        opcodes = session_config.version.opcodes.len(),
        "starting client"
    );

    let channel = TcpChannel::connect(
        &config.link.host,
        config.read_timeout()?,
        config.link.connect_attempts,
        Duration::from_millis(config.link.retry_delay_ms),
    )?;

    let mut session = Session::new(
        session_config,
        channel,
        HeldButtons::new(held),
        TileScreen::new(),
        FrameTicker::new(period),
    );

    let interval = config.frame.stats_interval;
    let mut frames = 0u32;
    while cli.frames.map_or(true, |limit| frames < limit) {
        let report = match session.tick() {
            Ok(report) => report,
            Err(e) => {
                log_stats(session.stats());
                return Err(e.into());
            }
        };
        frames += 1;

        match report.outcome {
            BatchOutcome::Applied => {}
            BatchOutcome::Abandoned(e) => {
                debug!(frame = frames, kind = e.kind(), applied = report.applied, "batch dropped")
            }
            BatchOutcome::Mismatched(opcode) => {
                debug!(frame = frames, opcode = opcode.name(), applied = report.applied, "batch dropped")
            }
        }
        if session.target().is_dirty() {
            trace!(frame = frames, commands = report.applied, "screen updated");
            session.target_mut().mark_clean();
        }
        if interval > 0 && frames % interval == 0 {
            log_stats(session.stats());
        }
    }

    log_stats(session.stats());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
