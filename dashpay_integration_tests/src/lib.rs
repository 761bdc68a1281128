// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! A wallet assembled from the payment and contact request components over
//! an in-memory context, as an application would wire them.

use std::sync::Arc;

use dashpay_core::{
    context::memory::InMemoryContext, AddressKind, Config, DashAddress, IncomingRequestList,
    Network, PaymentConfirmationCoordinator, PaymentInputResolver,
};

pub struct Wallet {
    pub context: InMemoryContext,
    pub resolver: PaymentInputResolver<InMemoryContext>,
    pub confirmation: PaymentConfirmationCoordinator<InMemoryContext>,
    pub requests: Option<IncomingRequestList<InMemoryContext>>,
}

impl Wallet {
    pub fn new(config: &Config) -> Self {
        let context = InMemoryContext::new();
        let requests = config.incoming_requests(Arc::new(context.clone())).ok();
        Self {
            resolver: PaymentInputResolver::new(config, context.clone()),
            confirmation: PaymentConfirmationCoordinator::new(context.clone()),
            requests,
            context,
        }
    }

    /// Reloads the incoming contact requests from the context.
    pub fn reload_requests(&mut self) -> anyhow::Result<usize> {
        let requests = self
            .requests
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("DashPay is disabled"))?;
        requests.reload(&self.context);
        Ok(requests.len())
    }
}

/// A mainnet pay-to-pubkey-hash address derived from `seed`.
pub fn address(seed: u8) -> DashAddress {
    DashAddress::from_hash(Network::Mainnet, AddressKind::PubkeyHash, [seed; 20])
}
