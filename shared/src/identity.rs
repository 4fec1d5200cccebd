//! Command identity: the (command class, command) pair naming a decodable command

use std::fmt;

/// Uniquely names a command within the Z-Wave command namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandIdentity {
    command_class: u8,
    command: u8,
}

impl CommandIdentity {
    /// Create an identity from a command class id and a command id
    pub const fn new(command_class: u8, command: u8) -> Self {
        Self {
            command_class,
            command,
        }
    }

    pub const fn command_class(&self) -> u8 {
        self.command_class
    }

    pub const fn command(&self) -> u8 {
        self.command
    }
}

impl fmt::Display for CommandIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}/{:#04x}", self.command_class, self.command)
    }
}

impl From<(u8, u8)> for CommandIdentity {
    fn from((command_class, command): (u8, u8)) -> Self {
        Self::new(command_class, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_equality_covers_both_bytes() {
        let a = CommandIdentity::new(0x86, 0x12);
        assert_eq!(a, CommandIdentity::from((0x86, 0x12)));
        assert_ne!(a, CommandIdentity::new(0x86, 0x14));
        assert_ne!(a, CommandIdentity::new(0x20, 0x12));

        let set: HashSet<_> = [a, a, CommandIdentity::new(0x12, 0x86)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(CommandIdentity::new(0x86, 0x12).to_string(), "0x86/0x12");
        assert_eq!(CommandIdentity::new(0x05, 0x00).to_string(), "0x05/0x00");
    }
}
