//! Frame presentation abstraction

/// Display frame clock
///
/// The only suspension point of the client: presenting a frame blocks until
/// the display subsystem is ready to begin the next one. The wait runs at a
/// fixed rate and cannot be cancelled.
pub trait FrameClock {
    /// Present the current frame and wait for the next frame to begin
    fn present_and_wait(&mut self);
}
