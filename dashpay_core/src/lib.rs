// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! # DashPay payment flows
//!
//! This crate wires the payment entry points of the wallet to their platform
//! collaborators:
//! - [`resolver::PaymentInputResolver`] turns URLs, pasteboard text, NFC
//!   tags and DashPay contacts into a [`PaymentInput`].
//! - [`confirmation::PaymentConfirmationCoordinator`] presents a resolved
//!   payment and guards its submission.
//! - [`Config::incoming_requests`] builds the list of incoming contact
//!   requests, see [`dashpay_request`].
//!
//! Platform services are reached through the traits in [`adapters`]. They
//! are implemented all at once by a single context value, such as
//! [`context::memory::InMemoryContext`] when the `in_memory` feature is
//! enabled.

pub mod adapters;
mod config;
pub mod confirmation;
pub mod context;
mod error;
pub mod resolver;

pub use config::Config;
pub use confirmation::{
    ConfirmationDelegate, ConfirmationOutcome, ConfirmationState, PaymentConfirmationCoordinator,
    PendingConfirmation,
};
pub use dashpay_input::{
    AddressKind, DashAddress, Destination, Duffs, IdentityRef, Network, PaymentInput, PaymentSource,
    PaymentUri,
};
pub use dashpay_request::{ContactRequestStateMachine, IncomingRequestList, RequestState};
pub use error::{Error, Result};
pub use resolver::PaymentInputResolver;
