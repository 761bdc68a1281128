// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use dashpay_input::{DashAddress, IdentityRef};

/// Looks up DashPay identities on the identity platform.
///
/// # Example
///
/// For example code see [crate::context::memory::InMemoryContext]
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from
    /// the standard library.
    /// Errors of this type are reported as [`crate::Error::NetworkFailure`].
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Returns the next address to pay `identity` at, or `None` while the
    /// contact relationship has not established one yet.
    async fn resolve_receiving_address(
        &self,
        identity: &IdentityRef,
    ) -> Result<Option<DashAddress>, Self::AdapterError>;
}
