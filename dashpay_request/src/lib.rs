// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! # Incoming contact requests
//!
//! When another DashPay user sends a contact request, it shows up in the
//! contacts screen with accept and decline buttons. Each such request is
//! wrapped into a [`ContactRequestStateMachine`] that can be in one of the
//! following states:
//! - `Ready`: waiting for the user.
//! - `Processing`: an accept or decline call is in flight.
//! - `Accepted` / `Declined`: the call succeeded. These are final.
//! - `Failed`: the call failed and may be retried.
//!
//! The transition table itself lives in [`transition`] and has no side
//! effects. Network calls go through a user supplied
//! [`adapters::ContactRequestService`], and outcomes are reported to an
//! [`adapters::RequestObserver`].

pub mod adapters;
mod error;
mod item;
mod list;
mod machine;
pub mod state;
pub mod transition;

pub use error::{RequestError, Result};
pub use item::ContactRequestItem;
pub use list::{IncomingRequestList, ReloadSummary};
pub use machine::ContactRequestStateMachine;
pub use state::{RequestAction, RequestState};
