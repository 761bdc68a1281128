// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! # Payment input resolution
//!
//! The [`PaymentInputResolver`] turns the raw input of every payment entry
//! point into a [`PaymentInput`]:
//!
//! | entry point                    | accepts                    | adapter              |
//! |--------------------------------|----------------------------|----------------------|
//! | [`from_url`]                   | payment URI                | none                 |
//! | [`from_pasteboard_string`]     | URI or address in any text | none                 |
//! | [`from_pasteboard`]            | same, read from the system | [`Pasteboard`]       |
//! | [`from_nfc_read`]              | URI or address on a tag    | [`NfcSessionProvider`] |
//! | [`from_contact_identity`]      | DashPay contact            | [`IdentityLookup`]   |
//!
//! Methods that need an adapter are only available when the context
//! implements it.
//!
//! [`from_url`]: PaymentInputResolver::from_url
//! [`from_pasteboard_string`]: PaymentInputResolver::from_pasteboard_string
//! [`from_pasteboard`]: PaymentInputResolver::from_pasteboard
//! [`from_nfc_read`]: PaymentInputResolver::from_nfc_read
//! [`from_contact_identity`]: PaymentInputResolver::from_contact_identity
//! [`Pasteboard`]: crate::adapters::Pasteboard
//! [`NfcSessionProvider`]: crate::adapters::NfcSessionProvider
//! [`IdentityLookup`]: crate::adapters::IdentityLookup

mod session;

use std::sync::atomic::{AtomicBool, Ordering};

use dashpay_input::{DashAddress, IdentityRef, InputError, PaymentInput, PaymentSource, PaymentUri};
use log::{debug, info, warn};

use self::session::{OpenSession, ReaderSlot};
use crate::{
    adapters::{IdentityLookup, NfcError, NfcSession, NfcSessionProvider, Pasteboard},
    Config, Error, Result,
};

pub struct PaymentInputResolver<E> {
    context: E,
    config: Config,
    nfc_busy: AtomicBool,
}

impl<E> PaymentInputResolver<E> {
    pub fn new(config: &Config, context: E) -> Self {
        Self {
            context,
            config: config.clone(),
            nfc_busy: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &E {
        &self.context
    }

    /// Parses a payment URI received as a deep link or from the QR scanner.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedUri`] for anything that is not a valid
    /// payment URI on the configured network.
    pub fn from_url(&self, url: &str) -> Result<PaymentInput> {
        let uri = PaymentUri::parse_with_schemes(
            url,
            self.config.network,
            self.config.accepted_schemes.as_slice(),
        )
        .inspect_err(|err| debug!("Rejected payment URL: {err}"))?;
        Ok(PaymentInput::from_uri(uri, PaymentSource::Url))
    }

    /// Scans pasted text for the first payment URI or address.
    ///
    /// Each line is tried as a whole, then word by word, so a URI or address
    /// embedded in a longer message is found. Returns `None` when nothing in
    /// the text is payable.
    pub fn from_pasteboard_string(&self, text: &str) -> Option<PaymentInput> {
        let found = text
            .lines()
            .flat_map(|line| std::iter::once(line.trim()).chain(line.split_whitespace()))
            .filter(|candidate| !candidate.is_empty())
            .find_map(|candidate| self.parse_text(candidate, PaymentSource::Pasteboard).ok());

        match &found {
            Some(input) => debug!("Found payment to {} on the pasteboard", input.pay_to_address()),
            None => debug!("Nothing payable on the pasteboard"),
        }
        found
    }

    /// Returns true while an NFC read is in progress.
    pub fn is_nfc_session_active(&self) -> bool {
        self.nfc_busy.load(Ordering::Acquire)
    }

    /// Parses a single payment URI or bare address.
    fn parse_text(&self, text: &str, source: PaymentSource) -> Result<PaymentInput> {
        let text = text.trim();
        let schemes = self.config.accepted_schemes.as_slice();
        if PaymentUri::has_scheme(text, schemes) {
            let uri = PaymentUri::parse_with_schemes(text, self.config.network, schemes)?;
            return Ok(PaymentInput::from_uri(uri, source));
        }
        let address = DashAddress::parse_for_network(text, self.config.network)?;
        Ok(PaymentInput::to_address(address, source))
    }
}

impl<E> PaymentInputResolver<E>
where
    E: Pasteboard,
{
    /// Reads the system pasteboard and scans it like
    /// [`Self::from_pasteboard_string`]. String items come before URL items,
    /// all joined by newlines.
    pub fn from_pasteboard(&self) -> Option<PaymentInput> {
        let mut items = self.context.strings();
        items.extend(self.context.urls());
        self.from_pasteboard_string(&items.join("\n"))
    }

    /// Returns true if the pasteboard holds any text or URL, for enabling the
    /// paste button without reading the pasteboard.
    pub fn pasteboard_has_content(&self) -> bool {
        self.context.has_strings() || self.context.has_urls()
    }
}

impl<E> PaymentInputResolver<E>
where
    E: NfcSessionProvider,
{
    /// Reads a payment URI or address from an NFC tag.
    ///
    /// Only one read can be in progress at a time. The reader session is
    /// closed when the read ends, including when the returned future is
    /// dropped before completion.
    ///
    /// # Errors
    ///
    /// - [`Error::NfcUnsupported`] if the device has no NFC reader.
    /// - [`Error::SessionBusy`] if another read is in progress.
    /// - [`Error::NfcReadFailure`] if the session fails or is cancelled.
    /// - [`Error::MalformedUri`] or [`Error::InvalidInput`] if the tag does
    ///   not hold a payment.
    pub async fn from_nfc_read(&self) -> Result<PaymentInput> {
        if !self.context.is_supported() {
            return Err(Error::NfcUnsupported);
        }
        let _slot = ReaderSlot::acquire(&self.nfc_busy)
            .inspect_err(|_| warn!("NFC read requested while another one is active"))?;

        let mut session = OpenSession::new(self.context.open().await.map_err(nfc_failure)?);
        let payload = session.read().await.map_err(nfc_failure)?;
        let input = self.parse_text(&payload, PaymentSource::Nfc)?;
        info!("Read payment to {} from NFC", input.pay_to_address());
        Ok(input)
    }
}

impl<E> PaymentInputResolver<E>
where
    E: IdentityLookup,
{
    /// Prepares a payment to a DashPay contact.
    ///
    /// # Errors
    ///
    /// - [`Error::FeatureDisabled`] if DashPay is disabled.
    /// - [`Error::NoReceivingAddress`] if the contact has no address for us
    ///   yet.
    /// - [`Error::NetworkFailure`] if the lookup fails.
    pub async fn from_contact_identity(&self, identity: &IdentityRef) -> Result<PaymentInput> {
        self.config.ensure_dashpay()?;

        let address = self
            .context
            .resolve_receiving_address(identity)
            .await
            .map_err(|err| Error::NetworkFailure {
                source_error: anyhow::Error::new(err),
            })?
            .ok_or_else(|| Error::NoReceivingAddress {
                identity: identity.to_string(),
            })?;

        if address.network() != self.config.network {
            return Err(InputError::WrongNetwork {
                address: address.to_string(),
                expected: self.config.network,
            }
            .into());
        }

        debug!("Resolved {identity} to {address}");
        Ok(PaymentInput::to_identity(identity.clone(), address))
    }
}

fn nfc_failure(err: NfcError) -> Error {
    match err {
        NfcError::Unsupported => Error::NfcUnsupported,
        NfcError::Read(reason) => Error::NfcReadFailure { reason },
    }
}
