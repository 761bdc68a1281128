// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use crate::{state::RequestState, transition::RequestEvent};

#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("invalid transition: cannot apply {event} to a request that is {state}")]
    InvalidStateTransition {
        state: RequestState,
        event: RequestEvent,
    },
    #[error("contact request network call failed: {source_error}")]
    NetworkFailure { source_error: anyhow::Error },
}

pub type Result<T> = std::result::Result<T, RequestError>;
