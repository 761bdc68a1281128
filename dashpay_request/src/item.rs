// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use dashpay_input::IdentityRef;
use serde::{Deserialize, Serialize};

use crate::state::RequestState;

/// An incoming contact request as shown in the contacts list.
///
/// The requesting identity is only referenced; it is owned by the contacts
/// data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequestItem {
    identity: IdentityRef,
    state: RequestState,
}

impl ContactRequestItem {
    /// Creates a request in the `Ready` state.
    pub fn new(identity: IdentityRef) -> Self {
        Self {
            identity,
            state: RequestState::Ready,
        }
    }

    pub fn identity(&self) -> &IdentityRef {
        &self.identity
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: RequestState) {
        self.state = state;
    }
}
