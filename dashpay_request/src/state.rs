// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! # Request State
//!
//! The states an incoming contact request can be in, as seen by the UI.
//!
//! - `Ready`: nothing has been done with the request yet.
//! - `Processing`: an accept or decline call is in flight.
//! - `Accepted`: the request was accepted. Terminal.
//! - `Declined`: the request was declined. Terminal.
//! - `Failed`: the last accept or decline call failed. The user may try again.

use serde::{Deserialize, Serialize};

/// What the user asked to do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestAction {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case", tag = "state")]
#[strum(serialize_all = "snake_case")]
pub enum RequestState {
    #[default]
    Ready,
    Processing {
        action: RequestAction,
    },
    Accepted,
    Declined,
    Failed {
        action: RequestAction,
        reason: String,
    },
}

impl RequestState {
    /// Accepted and declined requests never change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Accepted | RequestState::Declined)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, RequestState::Processing { .. })
    }

    /// Whether a new accept or decline may be started from this state.
    pub fn accepts_user_action(&self) -> bool {
        matches!(self, RequestState::Ready | RequestState::Failed { .. })
    }
}
