//! BATTERY command class (0x80)

use bytes::{BufMut, BytesMut};

use super::mismatch;
use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::encoder::{EncodeError, Encoder};
use crate::entity::{BatteryLevel, BatteryReport, Entity};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x80;

pub const BATTERY_GET: u8 = 0x02;
pub const BATTERY_REPORT: u8 = 0x03;

pub const REPORT: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, BATTERY_REPORT);

const LOW_BATTERY_WARNING: u8 = 0xFF;

pub struct BatteryReportDecoder;

impl Decoder for BatteryReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(1)?;

        let level = match reader.u8()? {
            LOW_BATTERY_WARNING => BatteryLevel::LowWarning,
            percent @ 0..=100 => BatteryLevel::Percent(percent),
            other => {
                return Err(DecodeError::malformed(format!(
                    "battery level {other} out of range"
                )))
            }
        };
        reader.finish()?;

        Ok(Entity::BatteryReport(BatteryReport::new(level)))
    }
}

pub struct BatteryReportEncoder;

impl Encoder for BatteryReportEncoder {
    fn encode(&self, entity: &Entity, buf: &mut BytesMut) -> Result<(), EncodeError> {
        let Entity::BatteryReport(report) = entity else {
            return Err(mismatch(REPORT, entity));
        };
        match report.level() {
            BatteryLevel::LowWarning => buf.put_u8(LOW_BATTERY_WARNING),
            BatteryLevel::Percent(percent) if percent <= 100 => buf.put_u8(percent),
            BatteryLevel::Percent(percent) => {
                return Err(EncodeError::ValueOutOfRange(format!(
                    "battery level {percent}"
                )))
            }
        }
        Ok(())
    }
}
