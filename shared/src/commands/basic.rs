//! BASIC command class (0x20)

use bytes::{BufMut, BytesMut};

use super::mismatch;
use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::encoder::{EncodeError, Encoder};
use crate::entity::{BasicReport, Entity, Transition};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x20;

pub const BASIC_SET: u8 = 0x01;
pub const BASIC_GET: u8 = 0x02;
pub const BASIC_REPORT: u8 = 0x03;

pub const REPORT: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, BASIC_REPORT);

/// Layout: `[current value]` or, from v2, `[current value][target value][duration]`
pub struct BasicReportDecoder;

impl Decoder for BasicReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(1)?;

        let current_value = reader.u8()?;
        let transition = if reader.remaining() > 0 {
            let target = reader.u8()?;
            let duration = reader.u8()?;
            Some(Transition::new(target, duration))
        } else {
            None
        };
        reader.finish()?;

        Ok(Entity::BasicReport(BasicReport::new(current_value, transition)))
    }
}

pub struct BasicReportEncoder;

impl Encoder for BasicReportEncoder {
    fn encode(&self, entity: &Entity, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Entity::BasicReport(report) = entity else {
            return Err(mismatch(REPORT, entity));
        };
        buf.put_u8(report.current_value());
        if let Some(transition) = report.transition() {
            buf.put_u8(transition.target());
            buf.put_u8(transition.duration());
        }
        Ok(())
    }
}
