//! Entities carrying a declared type, and how a selection maps to one.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifies a function (or other typed item) in the host database.
///
/// In practice this is the item's start address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    /// Parses hex, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        u64::from_str_radix(digits, 16).map(EntityId)
    }
}

impl From<u64> for EntityId {
    fn from(address: u64) -> Self {
        EntityId(address)
    }
}

/// What the user had selected when an edit was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The function node itself (e.g. the pseudocode header line).
    FunctionDefinition(EntityId),
    /// A call expression; the edit applies to the called function.
    CallOperand { callee: EntityId },
    /// A plain cursor address in a listing.
    Address(EntityId),
}

impl Selection {
    /// The entity whose declared type an edit should rewrite.
    pub fn entity(&self) -> EntityId {
        match *self {
            Selection::FunctionDefinition(id) => id,
            Selection::CallOperand { callee } => callee,
            Selection::Address(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_display() {
        assert_eq!(EntityId(0x1000).to_string(), "0x1000");
        assert_eq!(EntityId(0).to_string(), "0x0");
    }

    #[test]
    fn test_entity_from_str() {
        assert_eq!("0x401000".parse::<EntityId>().unwrap(), EntityId(0x401000));
        assert_eq!("401000".parse::<EntityId>().unwrap(), EntityId(0x401000));
        assert_eq!("0XfF".parse::<EntityId>().unwrap(), EntityId(0xff));
        assert!("main".parse::<EntityId>().is_err());
        assert!("".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_selection_entity() {
        let func = EntityId(0x1000);
        let callee = EntityId(0x2000);
        assert_eq!(Selection::FunctionDefinition(func).entity(), func);
        assert_eq!(Selection::CallOperand { callee }.entity(), callee);
        assert_eq!(Selection::Address(func).entity(), func);
    }
}
