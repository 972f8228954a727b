//! Events that trigger frame loop transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameEvent {
    /// Handshake sent, or skipped by the version
    SessionStarted,
    /// Input byte written, or skipped by the version
    TelemetryDone,
    /// The batch was applied or abandoned
    BatchFinished,
    /// The frame was presented and the next one has begun
    FramePresented,
    /// The host went away
    LinkClosed,
}
