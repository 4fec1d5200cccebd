//! Decoder contract and bounds-checked payload reading
//!
//! A decoder receives the command payload with the command class and command
//! bytes already stripped. Decoders are stateless: identity and name live on
//! the [`CommandDescriptor`](crate::CommandDescriptor), never on the decoder.

use bytes::Buf;
use thiserror::Error;

use crate::entity::Entity;

/// Errors a decoder can report for a single payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated frame: need {needed} bytes, have {available}")]
    TruncatedFrame { needed: usize, available: usize },

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}

impl DecodeError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DecodeError::MalformedFrame(reason.into())
    }
}

/// Metadata about where a payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecodeContext {
    /// Originating node id on the mesh
    pub node_id: u8,
    /// Transport session that delivered the frame
    pub session_id: u64,
}

impl DecodeContext {
    pub fn new(node_id: u8, session_id: u64) -> Self {
        Self {
            node_id,
            session_id,
        }
    }
}

/// Turns a raw command payload into one [`Entity`]
///
/// Implementations must be pure: no I/O, no shared mutable state, and the same
/// input always yields the same output.
pub trait Decoder: Send + Sync {
    fn decode(&self, payload: &[u8], ctx: &DecodeContext) -> Result<Entity, DecodeError>;
}

/// Cursor over a payload that never reads past the provided bytes
#[derive(Debug)]
pub struct PayloadReader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            buf: payload,
            total: payload.len(),
        }
    }

    /// Fail with `TruncatedFrame` unless the whole payload is at least `min` bytes
    pub fn require(&self, min: usize) -> Result<(), DecodeError> {
        if self.total < min {
            return Err(DecodeError::TruncatedFrame {
                needed: min,
                available: self.total,
            });
        }
        Ok(())
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn consumed(&self) -> usize {
        self.total - self.buf.remaining()
    }

    fn ensure(&self, n: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < n {
            return Err(DecodeError::TruncatedFrame {
                needed: self.consumed() + n,
                available: self.total,
            });
        }
        Ok(())
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Big-endian u16
    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    /// Big-endian two's complement integer of 1, 2 or 4 bytes
    pub fn signed(&mut self, size: usize) -> Result<i32, DecodeError> {
        self.ensure(size)?;
        match size {
            1 => Ok(self.buf.get_i8() as i32),
            2 => Ok(self.buf.get_i16() as i32),
            4 => Ok(self.buf.get_i32()),
            other => Err(DecodeError::malformed(format!(
                "unsupported value size {other}"
            ))),
        }
    }

    /// Take exactly `n` bytes, where `n` usually comes from an embedded length field
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.buf.remaining() < n {
            return Err(DecodeError::malformed(format!(
                "length field claims {n} bytes but only {} remain",
                self.buf.remaining()
            )));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    /// Take everything that is left
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = self.buf;
        self.buf = &[];
        rest
    }

    /// Fail with `MalformedFrame` if any bytes were left unconsumed
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.buf.has_remaining() {
            return Err(DecodeError::malformed(format!(
                "{} unexpected trailing bytes",
                self.buf.remaining()
            )));
        }
        Ok(())
    }
}
