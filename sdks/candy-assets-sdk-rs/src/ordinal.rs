//! Ordinal Extractor

use std::fmt;

use crate::{error::ParseError, metadata::MetadataDocument};

/// Zero-based position of an NFT in its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ordinal(u32);

impl Ordinal {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }

    /// 1-based number used in progress messages.
    pub const fn display_number(self) -> u64 {
        self.0 as u64 + 1
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recover the ordinal from `"<collection> #<n>"`.
///
/// Names are 1-indexed so `n` becomes `n - 1`, except that `#0` stays `0`.
pub fn extract_ordinal(doc: &MetadataDocument) -> Result<Ordinal, ParseError> {
    ordinal_from_name(&doc.name)
}

pub fn ordinal_from_name(name: &str) -> Result<Ordinal, ParseError> {
    let segment = name
        .split('#')
        .nth(1)
        .ok_or_else(|| ParseError::MissingNumber(name.to_string()))?;
    let digits = segment.split(' ').next().unwrap_or_default();
    let n: u32 = digits.parse().map_err(|_| ParseError::InvalidNumber {
        name: name.to_string(),
        segment: digits.to_string(),
    })?;
    Ok(Ordinal(n.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> MetadataDocument {
        MetadataDocument::new(name, "https://arweave.net/x")
    }

    #[test]
    fn first_item_maps_to_zero() {
        assert_eq!(extract_ordinal(&doc("X #1")), Ok(Ordinal::new(0)));
    }

    #[test]
    fn later_items_shift_down_by_one() {
        assert_eq!(extract_ordinal(&doc("X #5")), Ok(Ordinal::new(4)));
        assert_eq!(extract_ordinal(&doc("Coll #3")), Ok(Ordinal::new(2)));
    }

    #[test]
    fn zero_is_left_unchanged() {
        assert_eq!(extract_ordinal(&doc("X #0")), Ok(Ordinal::new(0)));
    }

    #[test]
    fn trailing_words_are_ignored() {
        assert_eq!(
            extract_ordinal(&doc("Tiny Turtle #42 Gold")),
            Ok(Ordinal::new(41))
        );
    }

    #[test]
    fn display_number_is_one_based() {
        assert_eq!(Ordinal::new(2).display_number(), 3);
        assert_eq!(Ordinal::new(0).display_number(), 1);
    }

    #[test]
    fn missing_hash_is_an_error() {
        assert_eq!(
            extract_ordinal(&doc("No Number")),
            Err(ParseError::MissingNumber("No Number".into()))
        );
    }

    #[test]
    fn non_numeric_segment_is_an_error() {
        assert!(matches!(
            extract_ordinal(&doc("X #abc")),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            extract_ordinal(&doc("X # 4")),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            extract_ordinal(&doc("X #-1")),
            Err(ParseError::InvalidNumber { .. })
        ));
    }
}
