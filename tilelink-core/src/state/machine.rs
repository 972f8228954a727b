//! Frame loop state definition

use super::events::FrameEvent;

/// Frame loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameState {
    /// Session not started; the handshake has not run
    #[default]
    Idle,
    /// Writing the input snapshot
    ReportTelemetry,
    /// Reading and applying the host's batch
    DecodeAndDispatch,
    /// Presenting the frame and waiting for the next one
    Present,
    /// Host gone; nothing more can arrive
    Closed,
}

impl FrameState {
    /// Check if the channel may be read in this state
    pub fn reads_channel(&self) -> bool {
        matches!(self, FrameState::DecodeAndDispatch)
    }

    /// Check if the client may write to the channel in this state
    pub fn writes_channel(&self) -> bool {
        matches!(self, FrameState::Idle | FrameState::ReportTelemetry)
    }

    /// Check if the session has ended
    pub fn is_closed(&self) -> bool {
        matches!(self, FrameState::Closed)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: FrameEvent) -> Self {
        use FrameEvent::*;
        use FrameState::*;

        match (self, event) {
            (Idle, SessionStarted) => ReportTelemetry,
            (ReportTelemetry, TelemetryDone) => DecodeAndDispatch,
            (DecodeAndDispatch, BatchFinished) => Present,
            (Present, FramePresented) => ReportTelemetry,

            (Closed, _) => Closed,
            (_, LinkClosed) => Closed,

            // Default: stay in current state
            _ => self,
        }
    }
}
