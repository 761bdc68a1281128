// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! # Payment inputs
//!
//! A payment can be started from several places in the wallet: a scanned or
//! tapped payment request, a deep link, an address copied to the clipboard,
//! or a DashPay contact. Whatever the origin, it ends up as a single
//! [`PaymentInput`] that the confirmation flow can display and submit.
//!
//! This crate holds the value types shared by those flows:
//! - [`Duffs`]: amounts, with exact decimal parsing and formatting
//! - [`DashAddress`]: base58check address validation per [`Network`]
//! - [`PaymentUri`]: BIP-21 style `dash:` payment request URIs
//! - [`PaymentInput`]: the normalized payment description

mod address;
mod amount;
mod error;
mod input;
pub mod uri;

pub use address::{AddressKind, DashAddress, Network};
pub use amount::{Duffs, DUFFS_PER_DASH, MAX_DUFFS};
pub use error::{AmountError, InputError, Result};
pub use input::{Destination, IdentityRef, PaymentInput, PaymentSource};
pub use uri::PaymentUri;
