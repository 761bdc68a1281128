// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Error type of the payment and contact request flows.
//!
//! Parse errors (`MalformedUri`, `InvalidInput`, `NoReceivingAddress`) are
//! returned directly to the caller. Protocol violations
//! (`InvalidStateTransition`, `AlreadyPresenting`) indicate a UI that did not
//! gate its controls; they are returned and logged. Infrastructure failures
//! (`NfcReadFailure`, `NetworkFailure`) can always be retried.

use dashpay_input::InputError;
use dashpay_request::RequestError;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("malformed payment URI {uri:?}: {reason}")]
    MalformedUri { uri: String, reason: String },
    #[error(transparent)]
    InvalidInput(InputError),
    #[error("{identity} has no receiving address yet")]
    NoReceivingAddress { identity: String },
    #[error("NFC read failed: {reason}")]
    NfcReadFailure { reason: String },
    #[error("NFC is not supported on this device")]
    NfcUnsupported,
    #[error("an NFC session is already active")]
    SessionBusy,
    #[error("cannot {operation} while {state}")]
    InvalidStateTransition { state: String, operation: String },
    #[error("a payment is already being presented")]
    AlreadyPresenting,
    #[error("network request failed: {source_error}")]
    NetworkFailure { source_error: anyhow::Error },
    #[error("{feature} is disabled in this configuration")]
    FeatureDisabled { feature: &'static str },
}

impl From<InputError> for Error {
    fn from(err: InputError) -> Self {
        match err {
            InputError::MalformedUri { uri, reason } => Error::MalformedUri { uri, reason },
            other => Error::InvalidInput(other),
        }
    }
}

impl From<RequestError> for Error {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::InvalidStateTransition { state, event } => {
                Error::InvalidStateTransition {
                    state: state.to_string(),
                    operation: event.to_string(),
                }
            }
            RequestError::NetworkFailure { source_error } => Error::NetworkFailure { source_error },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
