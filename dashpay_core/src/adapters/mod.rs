// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Context adapters for the payment flows.
//!
//! Each adapter is implemented by the embedding application on top of the
//! platform it runs on: the identity platform client, the NFC reader, the
//! system pasteboard and the transaction broadcaster. An in-memory
//! implementation of all of them lives in [`crate::context::memory`].

mod broadcast;
mod identity;
mod nfc;
mod pasteboard;

pub use broadcast::PaymentBroadcast;
pub use dashpay_request::adapters::{ContactRequestService, ContactsDataSource, RequestObserver};
pub use identity::IdentityLookup;
pub use nfc::{NfcError, NfcSession, NfcSessionProvider};
pub use pasteboard::Pasteboard;
