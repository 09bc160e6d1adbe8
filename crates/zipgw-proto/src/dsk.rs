//! Device-specific keys (DSK) and their dashed-decimal text form.
//!
//! A DSK is the 16-byte public half of a device's Security-2 identity. It
//! is printed on device labels as eight dash-separated five-digit decimal
//! groups, each group being one big-endian 16-bit chunk:
//!
//! ```text
//! 50285-18819-09924-30691-15973-33711-04005-03623
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DecodeError, Result};

/// A 16-byte device-specific key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dsk([u8; Dsk::LENGTH]);

impl Dsk {
    /// Length of a DSK in bytes
    pub const LENGTH: usize = 16;

    /// Number of text groups and bytes per group
    const GROUPS: usize = 8;

    /// Wrap raw key bytes.
    #[must_use]
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build a DSK from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidDskLength`] unless the slice is exactly
    /// 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; Self::LENGTH] =
            bytes.try_into().map_err(|_| DecodeError::InvalidDskLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// The raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    /// The first group as its decimal value - the PIN a user types during
    /// client-side authenticated inclusion.
    #[must_use]
    pub fn pin(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }
}

impl fmt::Display for Dsk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in 0..Self::GROUPS {
            if group > 0 {
                write!(f, "-")?;
            }
            let chunk = u16::from_be_bytes([self.0[group * 2], self.0[group * 2 + 1]]);
            write!(f, "{chunk:05}")?;
        }
        Ok(())
    }
}

/// The `Debug` form reuses the dashed text form rather than dumping bytes.
impl fmt::Debug for Dsk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dsk({self})")
    }
}

impl FromStr for Dsk {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        let groups: Vec<&str> = s.split('-').collect();
        if groups.len() != Self::GROUPS {
            return Err(DecodeError::InvalidDskLength(groups.len() * 2));
        }

        let mut bytes = [0u8; Self::LENGTH];
        for (i, group) in groups.iter().enumerate() {
            let chunk: u16 = group
                .parse()
                .map_err(|_| DecodeError::InvalidDskGroup((*group).to_string()))?;
            bytes[i * 2..i * 2 + 2].copy_from_slice(&chunk.to_be_bytes());
        }
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const TEXT: &str = "50285-18819-09924-30691-15973-33711-04005-03623";
    const BYTES: [u8; 16] = [
        0xC4, 0x6D, 0x49, 0x83, 0x26, 0xC4, 0x77, 0xE3, 0x3E, 0x65, 0x83, 0xAF, 0x0F, 0xA5, 0x0E,
        0x27,
    ];

    #[test]
    fn parse_label_text() {
        let dsk: Dsk = TEXT.parse().unwrap();
        assert_eq!(dsk.as_bytes(), &BYTES);
    }

    #[test]
    fn format_label_text() {
        assert_eq!(Dsk::new(BYTES).to_string(), TEXT);
    }

    #[test]
    fn groups_are_zero_padded() {
        let dsk = Dsk::new([0; 16]);
        assert_eq!(dsk.to_string(), "00000-00000-00000-00000-00000-00000-00000-00000");
    }

    #[test]
    fn pin_is_first_group() {
        let dsk: Dsk = TEXT.parse().unwrap();
        assert_eq!(dsk.pin(), 50285);
    }

    #[test]
    fn reject_wrong_group_count() {
        assert!("12345-12345".parse::<Dsk>().is_err());
    }

    #[test]
    fn reject_out_of_range_group() {
        let text = "99999-18819-09924-30691-15973-33711-04005-03623";
        assert!(matches!(text.parse::<Dsk>(), Err(DecodeError::InvalidDskGroup(_))));
    }

    proptest! {
        #[test]
        fn text_round_trip(bytes in any::<[u8; 16]>()) {
            let dsk = Dsk::new(bytes);
            let parsed: Dsk = dsk.to_string().parse().unwrap();
            prop_assert_eq!(parsed, dsk);
        }
    }
}
