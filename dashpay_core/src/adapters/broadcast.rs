// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use dashpay_input::PaymentInput;

/// Builds, signs and broadcasts the transaction for a confirmed payment.
///
/// # Example
///
/// For example code see [crate::context::memory::InMemoryContext]
#[async_trait]
pub trait PaymentBroadcast: Send + Sync {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from
    /// the standard library.
    /// Errors of this type are reported as [`crate::Error::NetworkFailure`].
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Submits the payment. Resolves once the network accepted or rejected
    /// the transaction.
    async fn submit(&self, input: &PaymentInput) -> Result<(), Self::AdapterError>;
}
