//! Account type bitmask.
//!
//! # Design Decisions
//! - `UNKNOWN` (no bits) is a wildcard: it overlaps every other value
//! - `UNIFIED` is the union of the two unified variants, so a route for
//!   `UNIFIED` also serves unified-margin and unified-trading callers

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Bitmask classifying a caller's account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccountType(u8);

impl AccountType {
    pub const UNKNOWN: AccountType = AccountType(0);
    pub const NORMAL: AccountType = AccountType(1 << 0);
    pub const UNIFIED_MARGIN: AccountType = AccountType(1 << 1);
    pub const UNIFIED_TRADING: AccountType = AccountType(1 << 2);
    pub const UNIFIED: AccountType = AccountType((1 << 1) | (1 << 2));
    pub const ALL: AccountType = AccountType((1 << 0) | (1 << 1) | (1 << 2));

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_unknown(self) -> bool {
        self.0 == 0
    }

    /// True on exact equality or any bit overlap. `UNKNOWN` matches anything.
    pub const fn is(self, target: AccountType) -> bool {
        self.0 == target.0 || self.0 == 0 || target.0 == 0 || (self.0 & target.0) != 0
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UNKNOWN => "unknown",
            Self::NORMAL => "normal",
            Self::UNIFIED_MARGIN => "unified_margin",
            Self::UNIFIED_TRADING => "unified_trading",
            Self::UNIFIED => "unified",
            Self::ALL => "all",
            _ => "mixed",
        }
    }
}

impl std::ops::BitOr for AccountType {
    type Output = AccountType;

    fn bitor(self, rhs: AccountType) -> AccountType {
        AccountType(self.0 | rhs.0)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            "mixed" => write!(f, "mixed({:#05b})", self.0),
            name => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown account type '{0}'")]
pub struct ParseAccountTypeError(pub String);

impl FromStr for AccountType {
    type Err = ParseAccountTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unknown" => Ok(Self::UNKNOWN),
            "normal" => Ok(Self::NORMAL),
            "unified_margin" | "uma" => Ok(Self::UNIFIED_MARGIN),
            "unified_trading" | "uta" => Ok(Self::UNIFIED_TRADING),
            "unified" => Ok(Self::UNIFIED),
            "all" => Ok(Self::ALL),
            other => Err(ParseAccountTypeError(other.to_string())),
        }
    }
}

impl Serialize for AccountType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_is_wildcard() {
        assert!(AccountType::UNKNOWN.is(AccountType::NORMAL));
        assert!(AccountType::UNIFIED_TRADING.is(AccountType::UNKNOWN));
        assert!(AccountType::UNKNOWN.is(AccountType::UNKNOWN));
    }

    #[test]
    fn test_bit_overlap() {
        assert!(AccountType::UNIFIED.is(AccountType::UNIFIED_MARGIN));
        assert!(AccountType::UNIFIED_TRADING.is(AccountType::UNIFIED));
        assert!(AccountType::ALL.is(AccountType::NORMAL));
        assert!(!AccountType::NORMAL.is(AccountType::UNIFIED));
        assert!(!AccountType::UNIFIED_MARGIN.is(AccountType::UNIFIED_TRADING));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Unified".parse::<AccountType>().unwrap(), AccountType::UNIFIED);
        assert_eq!("".parse::<AccountType>().unwrap(), AccountType::UNKNOWN);
        assert!("gold".parse::<AccountType>().is_err());
        assert_eq!(AccountType::UNIFIED_MARGIN.to_string(), "unified_margin");
        assert_eq!(
            (AccountType::NORMAL | AccountType::UNIFIED_MARGIN).to_string(),
            "mixed(0b011)"
        );
    }
}
