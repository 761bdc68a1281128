// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Pure transition function of the contact request lifecycle.
//!
//! ```text
//! Ready | Failed --Accept-->  Processing(accept)  --Succeeded--> Accepted
//! Ready | Failed --Decline--> Processing(decline) --Succeeded--> Declined
//!                             Processing(_)       --Failed-----> Failed
//! ```
//!
//! [`transition`] performs no I/O. It returns the next state together with
//! the [`Effect`] the caller has to carry out, so the whole table can be
//! exercised without a network service or an observer.

use serde::{Deserialize, Serialize};

use crate::{
    state::{RequestAction, RequestState},
    RequestError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RequestEvent {
    /// The user tapped accept.
    Accept,
    /// The user tapped decline.
    Decline,
    /// The in-flight network call succeeded.
    Succeeded,
    /// The in-flight network call failed.
    Failed { reason: String },
}

impl From<RequestAction> for RequestEvent {
    fn from(action: RequestAction) -> Self {
        match action {
            RequestAction::Accept => RequestEvent::Accept,
            RequestAction::Decline => RequestEvent::Decline,
        }
    }
}

/// Side effect scheduled by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the accept or decline network call.
    Dispatch(RequestAction),
    NotifyAccepted,
    NotifyDeclined,
    NotifyFailed { action: RequestAction },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: RequestState,
    pub to: RequestState,
    pub effect: Effect,
}

/// Computes the state that follows `state` when `event` happens.
///
/// # Errors
///
/// Returns [`RequestError::InvalidStateTransition`] when `event` is not
/// allowed in `state`, e.g. accepting a request that is already processing
/// or that was already accepted.
pub fn transition(state: &RequestState, event: RequestEvent) -> Result<Transition, RequestError> {
    let (to, effect) = match (state, &event) {
        // A failed attempt may be retried with either action.
        (RequestState::Ready | RequestState::Failed { .. }, RequestEvent::Accept) => (
            RequestState::Processing {
                action: RequestAction::Accept,
            },
            Effect::Dispatch(RequestAction::Accept),
        ),
        (RequestState::Ready | RequestState::Failed { .. }, RequestEvent::Decline) => (
            RequestState::Processing {
                action: RequestAction::Decline,
            },
            Effect::Dispatch(RequestAction::Decline),
        ),
        (
            RequestState::Processing {
                action: RequestAction::Accept,
            },
            RequestEvent::Succeeded,
        ) => (RequestState::Accepted, Effect::NotifyAccepted),
        (
            RequestState::Processing {
                action: RequestAction::Decline,
            },
            RequestEvent::Succeeded,
        ) => (RequestState::Declined, Effect::NotifyDeclined),
        (RequestState::Processing { action }, RequestEvent::Failed { reason }) => (
            RequestState::Failed {
                action: *action,
                reason: reason.clone(),
            },
            Effect::NotifyFailed { action: *action },
        ),
        _ => {
            return Err(RequestError::InvalidStateTransition {
                state: state.clone(),
                event,
            })
        }
    };

    Ok(Transition {
        from: state.clone(),
        to,
        effect,
    })
}
