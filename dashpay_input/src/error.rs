// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::Network;

/// Errors produced while turning raw text into a payment input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("malformed payment URI {uri:?}: {reason}")]
    MalformedUri { uri: String, reason: String },
    #[error("invalid Dash address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("address {address} does not belong to {expected}")]
    WrongNetwork { address: String, expected: Network },
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Errors produced while parsing or building a [`crate::Duffs`] amount.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    EmptyInput,
    #[error("negative amounts are not allowed")]
    NegativeNotAllowed,
    #[error("amount is not a decimal number")]
    InvalidFormat,
    #[error("amount contains non-digit characters")]
    InvalidNumeric,
    #[error("amount has {decimals} decimals, at most 8 are allowed")]
    TooManyDecimals { decimals: usize },
    #[error("amount overflows")]
    Overflow,
    #[error("amount {value} duffs exceeds the maximum supply")]
    AboveMaximum { value: u64 },
}

pub type Result<T> = std::result::Result<T, InputError>;
