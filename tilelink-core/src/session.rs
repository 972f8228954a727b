//! Client session
//!
//! Owns the channel and the collaborators for the lifetime of the process and
//! drives the frame loop: handshake once, then report telemetry, decode and
//! dispatch one batch, present, forever. A failed batch never stops the loop;
//! only the host closing the channel does.

use tilelink_display::RenderTarget;
use tilelink_hal::{Channel, ChannelError, FrameClock, InputPoller};
use tilelink_protocol::{CommandDecoder, DecodeError};

use crate::batch::{decode_batch, BatchOutcome, FrameReport};
use crate::config::SessionConfig;
use crate::dispatch::DispatchTable;
use crate::handshake::send_handshake;
use crate::state::{FrameEvent, FrameState};
use crate::telemetry::TelemetryReporter;

/// Errors that end a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// The host closed the channel
    LinkClosed,
}

/// Counters accumulated over a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionStats {
    /// Frames presented
    pub frames: u32,
    /// Commands applied
    pub commands: u32,
    /// Render target rejections
    pub render_errors: u32,
    /// Batches dropped on an unknown opcode
    pub unknown_opcode: u32,
    /// Batches dropped on an oversized length
    pub protocol_overflow: u32,
    /// Batches dropped on a channel timeout
    pub channel_timeout: u32,
    /// Batches dropped because the decoder and the dispatch table disagreed
    pub mismatched: u32,
}

impl SessionStats {
    /// Fold one frame's report into the counters
    pub fn record(&mut self, report: &FrameReport) {
        self.frames = self.frames.saturating_add(1);
        self.commands = self.commands.saturating_add(report.applied.into());
        self.render_errors = self.render_errors.saturating_add(report.render_errors);

        let counter = match report.outcome {
            BatchOutcome::Applied => return,
            BatchOutcome::Mismatched(_) => &mut self.mismatched,
            BatchOutcome::Abandoned(e) => match e {
                DecodeError::UnknownOpcode(_) => &mut self.unknown_opcode,
                DecodeError::ProtocolOverflow { .. } => &mut self.protocol_overflow,
                DecodeError::ChannelTimeout => &mut self.channel_timeout,
                DecodeError::ChannelClosed => return,
            },
        };
        *counter = counter.saturating_add(1);
    }

    /// Batches dropped for any reason
    pub fn abandoned(&self) -> u32 {
        self.unknown_opcode
            .saturating_add(self.protocol_overflow)
            .saturating_add(self.channel_timeout)
            .saturating_add(self.mismatched)
    }
}

/// One client session
pub struct Session<C, I, T, K> {
    config: SessionConfig,
    channel: C,
    input: I,
    target: T,
    clock: K,
    decoder: CommandDecoder,
    table: DispatchTable,
    telemetry: TelemetryReporter,
    state: FrameState,
    stats: SessionStats,
}

impl<C, I, T, K> Session<C, I, T, K>
where
    C: Channel,
    I: InputPoller,
    T: RenderTarget,
    K: FrameClock,
{
    /// Create a session; nothing is sent until [`Session::start`] or the first tick
    pub fn new(config: SessionConfig, channel: C, input: I, target: T, clock: K) -> Self {
        Self {
            config,
            channel,
            input,
            target,
            clock,
            decoder: CommandDecoder::new(config.version),
            table: DispatchTable::new(&config.version),
            telemetry: TelemetryReporter::new(&config.version),
            state: FrameState::Idle,
            stats: SessionStats::default(),
        }
    }

    /// Send the handshake and enter the frame loop
    ///
    /// Does nothing once the session has started.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            FrameState::Idle => {}
            FrameState::Closed => return Err(SessionError::LinkClosed),
            _ => return Ok(()),
        }

        debug_assert!(self.state.writes_channel());
        match send_handshake(&mut self.channel, &self.config) {
            Ok(_) => {}
            Err(ChannelError::Timeout) => warn!("handshake write timed out"),
            Err(ChannelError::Closed) => return Err(self.close()),
        }

        debug!("session started with {} opcodes", self.table.len());
        self.state = self.state.transition(FrameEvent::SessionStarted);
        Ok(())
    }

    /// Run one full frame
    pub fn tick(&mut self) -> Result<FrameReport, SessionError> {
        self.start()?;

        // ReportTelemetry
        debug_assert!(self.state.writes_channel());
        let input = match self.telemetry.report(&mut self.channel, &mut self.input) {
            Ok(input) => input,
            Err(ChannelError::Timeout) => {
                warn!("telemetry write timed out");
                None
            }
            Err(ChannelError::Closed) => return Err(self.close()),
        };
        self.state = self.state.transition(FrameEvent::TelemetryDone);

        // DecodeAndDispatch
        debug_assert!(self.state.reads_channel());
        let mut report = decode_batch(
            &self.table,
            &mut self.decoder,
            &mut self.channel,
            &mut self.target,
        );
        report.input = input;
        if report.outcome == BatchOutcome::Abandoned(DecodeError::ChannelClosed) {
            return Err(self.close());
        }
        self.state = self.state.transition(FrameEvent::BatchFinished);

        // Present
        self.clock.present_and_wait();
        self.stats.record(&report);
        self.state = self.state.transition(FrameEvent::FramePresented);

        Ok(report)
    }

    /// Run frames until the host closes the channel
    pub fn run(&mut self) -> SessionError {
        loop {
            if let Err(e) = self.tick() {
                return e;
            }
        }
    }

    /// Run at most `frames` frames
    pub fn run_frames(&mut self, frames: u32) -> Result<(), SessionError> {
        for _ in 0..frames {
            self.tick()?;
        }
        Ok(())
    }

    fn close(&mut self) -> SessionError {
        warn!("host closed the channel after {} frames", self.stats.frames);
        self.state = self.state.transition(FrameEvent::LinkClosed);
        SessionError::LinkClosed
    }

    /// Current frame loop state
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Counters so far
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The render target
    pub fn target(&self) -> &T {
        &self.target
    }

    /// The render target, mutably
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// The channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Take the session apart
    pub fn into_parts(self) -> (C, I, T, K) {
        (self.channel, self.input, self.target, self.clock)
    }
}
