//! SENSOR_MULTILEVEL command class (0x31)

use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::entity::{Entity, SensorMultilevelReport};
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x31;

pub const SENSOR_MULTILEVEL_GET: u8 = 0x04;
pub const SENSOR_MULTILEVEL_REPORT: u8 = 0x05;

pub const REPORT: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, SENSOR_MULTILEVEL_REPORT);

pub const SENSOR_TYPE_TEMPERATURE: u8 = 0x01;
pub const SENSOR_TYPE_LUMINANCE: u8 = 0x03;
pub const SENSOR_TYPE_HUMIDITY: u8 = 0x05;

/// Sensor type, level byte and at least one value byte
const REPORT_MIN_LEN: usize = 3;

/// Split the level byte into (precision, scale, size)
pub(crate) fn split_level(level: u8) -> (u8, u8, usize) {
    let precision = level >> 5;
    let scale = (level >> 3) & 0x03;
    let size = (level & 0x07) as usize;
    (precision, scale, size)
}

/// Layout: `[sensor type][precision:3|scale:2|size:3][value; size]`
pub struct SensorMultilevelReportDecoder;

impl Decoder for SensorMultilevelReportDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        let mut reader = PayloadReader::new(payload);
        reader.require(REPORT_MIN_LEN)?;

        let sensor_type = reader.u8()?;
        let (precision, scale, size) = split_level(reader.u8()?);
        if !matches!(size, 1 | 2 | 4) {
            return Err(DecodeError::malformed(format!("invalid sensor value size {size}")));
        }

        let raw = reader.take(size)?;
        let value = PayloadReader::new(raw).signed(size)?;
        reader.finish()?;

        Ok(Entity::SensorMultilevelReport(SensorMultilevelReport::new(
            sensor_type,
            scale,
            precision,
            value,
        )))
    }
}
