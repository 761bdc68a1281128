// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use dashpay_input::{uri::DEFAULT_SCHEMES, Network};
use dashpay_request::IncomingRequestList;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Settings shared by the payment and contact request flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network whose addresses are accepted.
    pub network: Network,
    /// Enables DashPay: paying contacts and handling contact requests.
    pub dashpay_enabled: bool,
    /// URI schemes recognized as payment requests.
    pub accepted_schemes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            dashpay_enabled: true,
            accepted_schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_dashpay(mut self, enabled: bool) -> Self {
        self.dashpay_enabled = enabled;
        self
    }

    /// Creates the incoming contact request list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeatureDisabled`] when DashPay is disabled.
    pub fn incoming_requests<S>(&self, service: Arc<S>) -> Result<IncomingRequestList<S>> {
        self.ensure_dashpay()?;
        Ok(IncomingRequestList::new(service))
    }

    pub(crate) fn ensure_dashpay(&self) -> Result<()> {
        if self.dashpay_enabled {
            Ok(())
        } else {
            Err(Error::FeatureDisabled { feature: "DashPay" })
        }
    }
}
