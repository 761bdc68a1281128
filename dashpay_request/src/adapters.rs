// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Collaborators of the contact request lifecycle.
//!
//! These are implemented by the embedding application: the network service
//! that talks to the identity platform, the observer that re-renders the UI,
//! and the data source that lists pending requests.

use async_trait::async_trait;
use dashpay_input::IdentityRef;

use crate::{ContactRequestItem, RequestError};

/// Sends accept and decline decisions to the network.
///
/// # Example
///
/// For example code see `dashpay_core::context::memory::InMemoryContext`
#[async_trait]
pub trait ContactRequestService: Send + Sync {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from
    /// the standard library.
    /// Errors of this type are reported to the observer as
    /// [`RequestError::NetworkFailure`].
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Accepts the request, typically by sending the reciprocal contact
    /// request.
    async fn accept_request(&self, item: &ContactRequestItem) -> Result<(), Self::AdapterError>;

    /// Declines the request.
    async fn decline_request(&self, item: &ContactRequestItem)
        -> Result<(), Self::AdapterError>;
}

/// Receives terminal outcomes of contact requests.
///
/// All methods have empty default implementations so observers only need to
/// implement the events they render.
pub trait RequestObserver: Send + Sync {
    fn request_accepted(&self, _item: &ContactRequestItem) {}

    fn request_declined(&self, _item: &ContactRequestItem) {}

    fn request_failed(&self, _item: &ContactRequestItem, _error: &RequestError) {}
}

/// Lists the identities that currently have a pending incoming request.
pub trait ContactsDataSource {
    fn incoming_requests(&self) -> Vec<IdentityRef>;
}
