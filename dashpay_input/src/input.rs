// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{DashAddress, Duffs, PaymentUri};

/// Where a payment input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSource {
    Url,
    Pasteboard,
    Nfc,
    ContactIdentity,
}

/// Non-owning reference to a DashPay identity.
///
/// The identity itself is owned by the identity service; this only carries
/// what is needed to look it up again and to display it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityRef {
    pub unique_id: String,
    pub username: String,
}

impl IdentityRef {
    pub fn new(unique_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            username: username.into(),
        }
    }
}

impl Display for IdentityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.username)
    }
}

/// The payee of a payment: either a plain address or a DashPay identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Destination {
    Address { address: DashAddress },
    /// An identity together with the receiving address it resolved to when
    /// the input was created.
    Identity {
        identity: IdentityRef,
        receiving_address: DashAddress,
    },
}

impl Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Address { address } => address.fmt(f),
            Destination::Identity { identity, .. } => identity.fmt(f),
        }
    }
}

/// A normalized, immutable description of a pending payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInput {
    source: PaymentSource,
    destination: Destination,
    amount: Option<Duffs>,
    label: Option<String>,
    message: Option<String>,
    request_url: Option<Url>,
}

impl PaymentInput {
    /// Builds an input from a parsed payment URI.
    pub fn from_uri(uri: PaymentUri, source: PaymentSource) -> Self {
        Self {
            source,
            destination: Destination::Address {
                address: uri.address,
            },
            amount: uri.amount,
            label: uri.label,
            message: uri.message,
            request_url: uri.request_url,
        }
    }

    /// Builds an open-amount input paying a bare address.
    pub fn to_address(address: DashAddress, source: PaymentSource) -> Self {
        Self::from_uri(PaymentUri::new(address), source)
    }

    /// Builds an open-amount input paying a DashPay identity.
    pub fn to_identity(identity: IdentityRef, receiving_address: DashAddress) -> Self {
        Self {
            source: PaymentSource::ContactIdentity,
            destination: Destination::Identity {
                identity,
                receiving_address,
            },
            amount: None,
            label: None,
            message: None,
            request_url: None,
        }
    }

    pub fn source(&self) -> PaymentSource {
        self.source
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// The address funds will be sent to, whatever the destination kind.
    pub fn pay_to_address(&self) -> &DashAddress {
        match &self.destination {
            Destination::Address { address } => address,
            Destination::Identity {
                receiving_address, ..
            } => receiving_address,
        }
    }

    pub fn identity(&self) -> Option<&IdentityRef> {
        match &self.destination {
            Destination::Address { .. } => None,
            Destination::Identity { identity, .. } => Some(identity),
        }
    }

    /// `None` for open-amount payments.
    pub fn amount(&self) -> Option<Duffs> {
        self.amount
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn request_url(&self) -> Option<&Url> {
        self.request_url.as_ref()
    }
}
