// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Dash amounts expressed in duffs, the smallest unit of the currency.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::AmountError;

pub const DUFFS_PER_DASH: u64 = 100_000_000;
pub const MAX_DUFFS: u64 = 21_000_000 * DUFFS_PER_DASH;
const DECIMALS: usize = 8;

/// An amount of Dash, stored as an integer number of duffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Duffs(u64);

impl Duffs {
    pub const ZERO: Duffs = Duffs(0);

    pub fn new(value: u64) -> Result<Self, AmountError> {
        if value > MAX_DUFFS {
            return Err(AmountError::AboveMaximum { value });
        }
        Ok(Self(value))
    }

    /// Parses a decimal DASH string such as `"1.5"` or `"0.00000001"`.
    pub fn from_dash_str(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::EmptyInput);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::NegativeNotAllowed);
        }

        let (whole_str, frac_str) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (trimmed, None),
        };
        if frac_str.is_some_and(|frac| frac.contains('.')) {
            return Err(AmountError::InvalidFormat);
        }
        if whole_str.is_empty() && frac_str.map_or(true, str::is_empty) {
            return Err(AmountError::InvalidFormat);
        }

        let whole = if whole_str.is_empty() {
            0
        } else {
            parse_digits(whole_str)?
        };
        let whole_duffs = whole
            .checked_mul(DUFFS_PER_DASH)
            .ok_or(AmountError::Overflow)?;

        let frac_duffs = match frac_str {
            None | Some("") => 0,
            Some(fraction) => {
                if fraction.len() > DECIMALS {
                    return Err(AmountError::TooManyDecimals {
                        decimals: fraction.len(),
                    });
                }
                let padded = format!("{fraction:0<DECIMALS$}");
                parse_digits(&padded)?
            }
        };

        let combined = whole_duffs
            .checked_add(frac_duffs)
            .ok_or(AmountError::Overflow)?;
        Self::new(combined)
    }

    /// Formats the amount in DASH without trailing zeros, e.g. `"1.5"`.
    pub fn to_dash_string(&self) -> String {
        let whole = self.0 / DUFFS_PER_DASH;
        let frac = self.0 % DUFFS_PER_DASH;
        if frac == 0 {
            return whole.to_string();
        }

        let frac_str = format!("{frac:08}");
        format!("{whole}.{}", frac_str.trim_end_matches('0'))
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u64> for Duffs {
    type Error = AmountError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Duffs> for u64 {
    fn from(value: Duffs) -> Self {
        value.0
    }
}

impl Display for Duffs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} DASH", self.to_dash_string())
    }
}

fn parse_digits(input: &str) -> Result<u64, AmountError> {
    if !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(AmountError::InvalidNumeric);
    }
    input.parse::<u64>().map_err(|_| AmountError::Overflow)
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::{AmountError, Duffs, DUFFS_PER_DASH, MAX_DUFFS};

    #[rstest]
    #[case::whole("1", 100_000_000)]
    #[case::trailing_dot("1.", 100_000_000)]
    #[case::half("1.5", 150_000_000)]
    #[case::leading_dot(".5", 50_000_000)]
    #[case::one_duff("0.00000001", 1)]
    #[case::full_precision("1.12345678", 112_345_678)]
    #[case::zero("0", 0)]
    #[case::supply_cap("21000000", MAX_DUFFS)]
    fn parses_dash_strings(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(Duffs::from_dash_str(input).unwrap().as_u64(), expected);
    }

    #[rstest]
    #[case::too_precise("0.123456789", AmountError::TooManyDecimals { decimals: 9 })]
    #[case::negative("-1", AmountError::NegativeNotAllowed)]
    #[case::empty("  ", AmountError::EmptyInput)]
    #[case::letters("abc", AmountError::InvalidNumeric)]
    #[case::two_dots("1.2.3", AmountError::InvalidFormat)]
    #[case::lone_dot(".", AmountError::InvalidFormat)]
    #[case::above_cap("21000000.00000001", AmountError::AboveMaximum { value: MAX_DUFFS + 1 })]
    #[case::overflow("999999999999999999999", AmountError::Overflow)]
    fn rejects_invalid_dash_strings(#[case] input: &str, #[case] expected: AmountError) {
        assert_eq!(Duffs::from_dash_str(input), Err(expected));
    }

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(Duffs::new(DUFFS_PER_DASH).unwrap().to_dash_string(), "1");
        assert_eq!(Duffs::new(150_000_000).unwrap().to_dash_string(), "1.5");
        assert_eq!(Duffs::new(1).unwrap().to_dash_string(), "0.00000001");
        assert_eq!(Duffs::ZERO.to_dash_string(), "0");
    }

    #[test]
    fn formatted_amounts_parse_back_to_the_same_value() {
        for value in (0..MAX_DUFFS).step_by(7_777_777_777_777) {
            let duffs = Duffs::new(value).unwrap();
            assert_eq!(Duffs::from_dash_str(&duffs.to_dash_string()), Ok(duffs));
        }
    }

    #[test]
    fn deserialization_enforces_supply_cap() {
        let over: Result<Duffs, _> = serde_json::from_str(&(MAX_DUFFS + 1).to_string());
        assert!(over.is_err());
        let ok: Duffs = serde_json::from_str("150000000").unwrap();
        assert_eq!(ok.to_dash_string(), "1.5");
    }
}
