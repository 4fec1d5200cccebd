//! SWITCH_BINARY command class (0x25)

use bytes::{BufMut, BytesMut};

use super::mismatch;
use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::encoder::{EncodeError, Encoder};
use crate::entity::{BinarySwitchReport, Entity, SwitchState, Transition};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x25;

pub const SWITCH_BINARY_SET: u8 = 0x01;
pub const SWITCH_BINARY_GET: u8 = 0x02;
pub const SWITCH_BINARY_REPORT: u8 = 0x03;

pub const REPORT: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, SWITCH_BINARY_REPORT);

const VALUE_OFF: u8 = 0x00;
const VALUE_UNKNOWN: u8 = 0xFE;
const VALUE_ON: u8 = 0xFF;

fn switch_state(value: u8) -> Result<SwitchState, DecodeError> {
    match value {
        VALUE_OFF => Ok(SwitchState::Off),
        0x01..=0x63 | VALUE_ON => Ok(SwitchState::On),
        VALUE_UNKNOWN => Ok(SwitchState::Unknown),
        other => Err(DecodeError::malformed(format!(
            "invalid binary switch value {other:#04x}"
        ))),
    }
}

fn switch_value(state: SwitchState) -> u8 {
    match state {
        SwitchState::Off => VALUE_OFF,
        SwitchState::On => VALUE_ON,
        SwitchState::Unknown => VALUE_UNKNOWN,
    }
}

/// Layout: `[current value]` or, from v2, `[current value][target value][duration]`
pub struct BinarySwitchReportDecoder;

impl Decoder for BinarySwitchReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(1)?;

        let current_value = switch_state(reader.u8()?)?;
        let transition = if reader.remaining() > 0 {
            let target = switch_state(reader.u8()?)?;
            let duration = reader.u8()?;
            Some(Transition::new(target, duration))
        } else {
            None
        };
        reader.finish()?;

        Ok(Entity::BinarySwitchReport(BinarySwitchReport::new(
            current_value,
            transition,
        )))
    }
}

pub struct BinarySwitchReportEncoder;

impl Encoder for BinarySwitchReportEncoder {
    fn encode(&self, entity: &Entity, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Entity::BinarySwitchReport(report) = entity else {
            return Err(mismatch(REPORT, entity));
        };
        buf.put_u8(switch_value(report.current_value()));
        if let Some(transition) = report.transition() {
            buf.put_u8(switch_value(transition.target()));
            buf.put_u8(transition.duration());
        }
        Ok(())
    }
}
