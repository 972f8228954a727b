//! Per-frame command batch execution
//!
//! Reads one batch from the channel and applies each command to the render
//! target in arrival order, each fully applied before the next opcode is
//! read. A decode error abandons the rest of the batch: without a length
//! envelope there is no point to resynchronize on before the next frame.

use tilelink_display::RenderTarget;
use tilelink_hal::Channel;
use tilelink_protocol::{CommandDecoder, DecodeError, Opcode};

use crate::dispatch::{DispatchError, DispatchTable};

/// How a batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatchOutcome {
    /// Every announced command was applied
    #[default]
    Applied,
    /// Decoding stopped; the remaining commands were dropped
    Abandoned(DecodeError),
    /// The dispatch table and the decoder disagree about an opcode; the
    /// remaining commands were dropped
    Mismatched(Opcode),
}

impl BatchOutcome {
    /// Check if the batch was cut short
    pub fn is_abandoned(&self) -> bool {
        !matches!(self, BatchOutcome::Applied)
    }
}

/// Result of one frame's decode phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameReport {
    /// Input byte reported this frame, if telemetry is enabled
    pub input: Option<u8>,
    /// Commands the batch announced
    pub declared: u16,
    /// Commands fully decoded and applied
    pub applied: u16,
    /// Render target rejections; these do not abandon the batch
    pub render_errors: u32,
    /// How the batch ended
    pub outcome: BatchOutcome,
}

/// Decode one batch and apply it to the render target
pub fn decode_batch<C, T>(
    table: &DispatchTable,
    decoder: &mut CommandDecoder,
    channel: &mut C,
    target: &mut T,
) -> FrameReport
where
    C: Channel,
    T: RenderTarget,
{
    let mut report = FrameReport::default();

    match run_batch(table, decoder, channel, target, &mut report) {
        Ok(()) => trace!("batch applied: {} commands", report.applied),
        Err(DispatchError::Decode(e)) => {
            match e {
                DecodeError::UnknownOpcode(byte) => {
                    warn!("unknown opcode {}, dropping rest of batch", byte)
                }
                DecodeError::ProtocolOverflow { declared, capacity } => {
                    warn!("declared length {} exceeds capacity {}", declared, capacity)
                }
                DecodeError::ChannelTimeout => {
                    warn!("channel timeout after {} of {} commands", report.applied, report.declared)
                }
                DecodeError::ChannelClosed => warn!("channel closed mid-batch"),
            }
            report.outcome = BatchOutcome::Abandoned(e);
        }
        Err(DispatchError::Mismatch { operation, opcode }) => {
            warn!("{:?} decoded for {:?}, dropping rest of batch", opcode, operation);
            report.outcome = BatchOutcome::Mismatched(opcode);
        }
    }

    report
}

fn run_batch<C, T>(
    table: &DispatchTable,
    decoder: &mut CommandDecoder,
    channel: &mut C,
    target: &mut T,
    report: &mut FrameReport,
) -> Result<(), DispatchError>
where
    C: Channel,
    T: RenderTarget,
{
    report.declared = decoder.read_batch_len(channel)?;

    for _ in 0..report.declared {
        let byte = channel.read().map_err(DecodeError::from)?;
        let entry = table.lookup(byte).ok_or(DecodeError::UnknownOpcode(byte))?;
        let command = decoder.read_arguments(entry.opcode, channel)?;

        let rejected = entry.operation.apply(&command, channel, target)?;
        report.render_errors = report.render_errors.saturating_add(rejected);
        report.applied += 1;
    }

    Ok(())
}
