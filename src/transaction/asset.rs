//! Fixed-point asset amounts such as `1.000 STEEM`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::transaction::encoding::{Encode, Encoder};

/// Longest symbol that fits the 7-byte wire field.
const MAX_SYMBOL_LEN: usize = 7;

/// Highest supported decimal precision.
const MAX_PRECISION: u8 = 14;

/// Errors raised while building or parsing an asset.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("Invalid asset '{0}': expected '<amount> <SYMBOL>'")]
    InvalidFormat(String),

    #[error("Invalid asset amount '{0}'")]
    InvalidAmount(String),

    #[error("Asset amount '{0}' out of range")]
    OutOfRange(String),

    #[error("Invalid asset symbol '{0}'")]
    InvalidSymbol(String),

    #[error("Asset precision {0} is too large")]
    PrecisionTooLarge(usize),
}

/// Result type for asset construction.
pub type AssetResult<T> = Result<T, AssetError>;

/// An amount with its precision and symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    amount: i64,
    precision: u8,
    symbol: String,
}

impl Asset {
    /// Build an asset from a raw integer amount.
    pub fn new(amount: i64, precision: u8, symbol: &str) -> AssetResult<Self> {
        validate_symbol(symbol)?;
        if precision > MAX_PRECISION {
            return Err(AssetError::PrecisionTooLarge(precision as usize));
        }
        Ok(Self {
            amount,
            precision,
            symbol: symbol.to_string(),
        })
    }

    /// Amount in the smallest unit.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

fn validate_symbol(symbol: &str) -> AssetResult<()> {
    if symbol.is_empty()
        || symbol.len() > MAX_SYMBOL_LEN
        || !symbol.chars().all(|c| c.is_ascii_uppercase())
    {
        return Err(AssetError::InvalidSymbol(symbol.to_string()));
    }
    Ok(())
}

impl FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> AssetResult<Self> {
        let mut parts = s.split_whitespace();
        let (Some(number), Some(symbol), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AssetError::InvalidFormat(s.to_string()));
        };

        let invalid = || AssetError::InvalidAmount(number.to_string());
        let (whole, fraction) = match number.split_once('.') {
            // A trailing dot carries no precision.
            Some((_, "")) => return Err(invalid()),
            Some(split) => split,
            None => (number, ""),
        };
        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
            return Err(invalid());
        }

        if fraction.len() > MAX_PRECISION as usize {
            return Err(AssetError::PrecisionTooLarge(fraction.len()));
        }
        let amount: i64 = format!("{}{}", whole, fraction)
            .parse()
            .map_err(|_| AssetError::OutOfRange(number.to_string()))?;

        Asset::new(amount, fraction.len() as u8, symbol)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precision == 0 {
            return write!(f, "{} {}", self.amount, self.symbol);
        }

        let scale = 10i64.pow(self.precision as u32);
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        write!(
            f,
            "{}{}.{:0width$} {}",
            sign,
            abs / scale as u64,
            abs % scale as u64,
            self.symbol,
            width = self.precision as usize
        )
    }
}

impl Encode for Asset {
    fn encode(&self, out: &mut Encoder) {
        out.i64(self.amount);
        out.u8(self.precision);
        let mut symbol = [0u8; MAX_SYMBOL_LEN];
        symbol[..self.symbol.len()].copy_from_slice(self.symbol.as_bytes());
        out.bytes(&symbol);
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::encoding::to_bytes;

    #[test]
    fn test_parse() {
        let asset: Asset = "1.000 STEEM".parse().unwrap();
        assert_eq!(asset.amount(), 1000);
        assert_eq!(asset.precision(), 3);
        assert_eq!(asset.symbol(), "STEEM");

        let vests: Asset = "123.456789 VESTS".parse().unwrap();
        assert_eq!(vests.amount(), 123_456_789);
        assert_eq!(vests.precision(), 6);
    }

    #[test]
    fn test_display() {
        assert_eq!("0.001 SBD".parse::<Asset>().unwrap().to_string(), "0.001 SBD");
        assert_eq!("10 TOKEN".parse::<Asset>().unwrap().to_string(), "10 TOKEN");
        assert_eq!(Asset::new(-1500, 3, "STEEM").unwrap().to_string(), "-1.500 STEEM");
    }

    #[test]
    fn test_parse_errors() {
        for input in ["", "1.000", "STEEM", "1.0x0 STEEM", "1.000 steem", "1.000 TOOLONGSYM", "-1.000 STEEM", "1.000 STEEM extra"] {
            assert!(input.parse::<Asset>().is_err(), "{} should be rejected", input);
        }
    }

    #[test]
    fn test_parse_error_kinds() {
        assert!(matches!("1.000".parse::<Asset>(), Err(AssetError::InvalidFormat(_))));
        assert!(matches!("1.000 steem".parse::<Asset>(), Err(AssetError::InvalidSymbol(ref s)) if s == "steem"));
        assert!(matches!("1.0x0 STEEM".parse::<Asset>(), Err(AssetError::InvalidAmount(_))));
        assert!(matches!(
            "99999999999999999999.000 STEEM".parse::<Asset>(),
            Err(AssetError::OutOfRange(_))
        ));
        assert!(matches!(
            "1.000000000000000 STEEM".parse::<Asset>(),
            Err(AssetError::PrecisionTooLarge(15))
        ));
        assert!(matches!(Asset::new(1, 15, "STEEM"), Err(AssetError::PrecisionTooLarge(15))));
    }

    #[test]
    fn test_trailing_dot_is_rejected() {
        assert!(matches!("1. STEEM".parse::<Asset>(), Err(AssetError::InvalidAmount(ref a)) if a == "1."));
        assert!(matches!(".5 STEEM".parse::<Asset>(), Err(AssetError::InvalidAmount(_))));
    }

    #[test]
    fn test_encoding() {
        let asset: Asset = "1.000 STEEM".parse().unwrap();
        assert_eq!(
            to_bytes(&asset),
            vec![
                0xe8, 0x03, 0, 0, 0, 0, 0, 0, // amount
                3,    // precision
                b'S', b'T', b'E', b'E', b'M', 0, 0,
            ]
        );
    }

    #[test]
    fn test_json_form() {
        let asset: Asset = serde_json::from_str("\"2.500 SBD\"").unwrap();
        assert_eq!(serde_json::to_string(&asset).unwrap(), "\"2.500 SBD\"");
    }
}
