use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of options on the buy grid.
pub const BET_OPTIONS: u8 = 16;

/// One buy-grid option. Labels run `0`-`9` then `a`-`f`, matching the
/// possible trailing characters of a block hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BetTag(u8);

impl BetTag {
    pub fn new(index: u8) -> Option<Self> {
        (index < BET_OPTIONS).then_some(Self(index))
    }

    pub fn all() -> impl Iterator<Item = BetTag> {
        (0..BET_OPTIONS).map(BetTag)
    }

    /// The single byte sent with the contract call.
    pub fn as_byte(self) -> u8 {
        self.0
    }

    pub fn label(self) -> char {
        // index < 16, so this always yields a hex digit
        char::from_digit(u32::from(self.0), 16).unwrap_or('?')
    }
}

impl fmt::Display for BetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BetTag {
    type Err = String;

    /// Accepts a grid label (`0`-`9`, `a`-`f`, any case) or a decimal index up to 15.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(digit) = c.to_digit(16) {
                return Ok(Self(digit as u8));
            }
        }
        s.parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("unknown option '{}', expected 0-9 or a-f", s))
    }
}
