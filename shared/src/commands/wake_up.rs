//! WAKE_UP command class (0x84)

use crate::decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
use crate::entity::Entity;
use crate::identity::CommandIdentity;

pub const COMMAND_CLASS: u8 = 0x84;

pub const WAKE_UP_NOTIFICATION: u8 = 0x07;
pub const WAKE_UP_NO_MORE_INFORMATION: u8 = 0x08;

pub const NOTIFICATION: CommandIdentity = CommandIdentity::new(COMMAND_CLASS, WAKE_UP_NOTIFICATION);

/// Sleeping node announcing it is awake; carries no payload
pub struct WakeUpNotificationDecoder;

impl Decoder for WakeUpNotificationDecoder {
    fn decode(&self, payload: &[u8], _ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        PayloadReader::new(payload).finish()?;
        Ok(Entity::WakeUpNotification)
    }
}
