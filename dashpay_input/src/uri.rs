// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Payment request URIs.
//!
//! The accepted form follows BIP-21 as used by Dash wallets:
//!
//! ```text
//! dash:<address>[?amount=<DASH>][&label=<text>][&message=<text>][&r=<url>]
//! ```
//!
//! `dash://<address>?...` is accepted as well, since deep links are commonly
//! written with an authority. Unknown parameters are ignored unless they are
//! prefixed with `req-`, in which case the URI must be rejected.

use std::fmt::{self, Display};

use url::{form_urlencoded, Url};

use crate::{DashAddress, Duffs, InputError, Network, Result};

/// Schemes recognized when no explicit list is configured.
pub const DEFAULT_SCHEMES: &[&str] = &["dash", "pay"];

const REQUIRED_PREFIX: &str = "req-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUri {
    pub address: DashAddress,
    pub amount: Option<Duffs>,
    pub label: Option<String>,
    pub message: Option<String>,
    /// BIP-70 payment request location.
    pub request_url: Option<Url>,
}

impl PaymentUri {
    pub fn new(address: DashAddress) -> Self {
        Self {
            address,
            amount: None,
            label: None,
            message: None,
            request_url: None,
        }
    }

    pub fn with_amount(mut self, amount: Duffs) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Parses `input` using the [`DEFAULT_SCHEMES`].
    pub fn parse(input: &str, network: Network) -> Result<Self> {
        Self::parse_with_schemes(input, network, DEFAULT_SCHEMES)
    }

    /// Parses `input`, accepting only the given schemes (compared
    /// case-insensitively).
    pub fn parse_with_schemes<S: AsRef<str>>(
        input: &str,
        network: Network,
        schemes: &[S],
    ) -> Result<Self> {
        let raw = input.trim();
        let malformed = |reason: String| InputError::MalformedUri {
            uri: raw.to_owned(),
            reason,
        };

        let url = Url::parse(raw).map_err(|err| malformed(err.to_string()))?;

        // `Url` lowercases the scheme.
        if !schemes
            .iter()
            .any(|scheme| scheme.as_ref().eq_ignore_ascii_case(url.scheme()))
        {
            return Err(malformed(format!("unsupported scheme {:?}", url.scheme())));
        }

        let address_part = if url.cannot_be_a_base() {
            url.path()
        } else {
            url.host_str().unwrap_or_default()
        };
        if address_part.is_empty() {
            return Err(malformed("missing address".to_owned()));
        }
        let address = DashAddress::parse_for_network(address_part, network)
            .map_err(|err| malformed(err.to_string()))?;

        let mut uri = PaymentUri::new(address);
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "amount" => {
                    if uri.amount.is_some() {
                        return Err(malformed("amount given more than once".to_owned()));
                    }
                    let amount =
                        Duffs::from_dash_str(&value).map_err(|err| malformed(err.to_string()))?;
                    if amount.is_zero() {
                        return Err(malformed("amount must be positive".to_owned()));
                    }
                    uri.amount = Some(amount);
                }
                "label" => uri.label = Some(value.into_owned()),
                "message" => uri.message = Some(value.into_owned()),
                "r" => {
                    let request_url =
                        Url::parse(&value).map_err(|err| malformed(format!("r: {err}")))?;
                    uri.request_url = Some(request_url);
                }
                other if other.starts_with(REQUIRED_PREFIX) => {
                    return Err(malformed(format!("unsupported required parameter {other}")));
                }
                _ => {}
            }
        }

        Ok(uri)
    }

    /// Returns true if `input` looks like a URI of one of `schemes`, without
    /// validating the rest of it.
    pub fn has_scheme<S: AsRef<str>>(input: &str, schemes: &[S]) -> bool {
        input
            .trim()
            .split_once(':')
            .is_some_and(|(scheme, _)| {
                schemes
                    .iter()
                    .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(scheme))
            })
    }
}

impl Display for PaymentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dash:{}", self.address)?;

        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(amount) = self.amount {
            query.append_pair("amount", &amount.to_dash_string());
        }
        if let Some(label) = &self.label {
            query.append_pair("label", label);
        }
        if let Some(message) = &self.message {
            query.append_pair("message", message);
        }
        if let Some(request_url) = &self.request_url {
            query.append_pair("r", request_url.as_str());
        }
        let query = query.finish();
        if !query.is_empty() {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::PaymentUri;
    use crate::{AddressKind, DashAddress, Duffs, InputError, Network};

    #[fixture]
    fn address() -> DashAddress {
        DashAddress::from_hash(Network::Mainnet, AddressKind::PubkeyHash, [0x5a; 20])
    }

    #[rstest]
    fn parses_address_only(address: DashAddress) {
        let uri = PaymentUri::parse(&format!("dash:{address}"), Network::Mainnet).unwrap();
        assert_eq!(uri, PaymentUri::new(address));
    }

    #[rstest]
    fn parses_all_parameters(address: DashAddress) {
        let raw = format!(
            "dash:{address}?amount=0.25&label=Coffee%20Shop&message=Two+lattes&r=https%3A%2F%2Fmerchant.example%2Fpay%2F42&foo=bar"
        );
        let uri = PaymentUri::parse(&raw, Network::Mainnet).unwrap();

        assert_eq!(uri.address, address);
        assert_eq!(uri.amount, Some(Duffs::new(25_000_000).unwrap()));
        assert_eq!(uri.label.as_deref(), Some("Coffee Shop"));
        assert_eq!(uri.message.as_deref(), Some("Two lattes"));
        assert_eq!(
            uri.request_url.as_ref().map(|url| url.as_str()),
            Some("https://merchant.example/pay/42")
        );
    }

    #[rstest]
    #[case::upper_scheme("DASH:")]
    #[case::pay_scheme("pay:")]
    #[case::authority("dash://")]
    fn accepts_scheme_variants(address: DashAddress, #[case] prefix: &str) {
        let uri = PaymentUri::parse(&format!("{prefix}{address}?amount=1"), Network::Mainnet)
            .unwrap();
        assert_eq!(uri.address, address);
        assert_eq!(uri.amount, Some(Duffs::new(100_000_000).unwrap()));
    }

    #[rstest]
    #[case::wrong_scheme("bitcoin:{address}")]
    #[case::no_address("dash:?amount=1")]
    #[case::bad_amount("dash:{address}?amount=1.2.3")]
    #[case::zero_amount("dash:{address}?amount=0")]
    #[case::double_amount("dash:{address}?amount=1&amount=2")]
    #[case::required_param("dash:{address}?req-signature=abc")]
    #[case::bad_request_url("dash:{address}?r=not%20a%20url")]
    #[case::bad_address("dash:Xnotanaddress")]
    #[case::not_a_uri("just some text")]
    fn rejects_malformed_uris(address: DashAddress, #[case] template: &str) {
        let raw = template.replace("{address}", address.as_str());
        assert!(matches!(
            PaymentUri::parse(&raw, Network::Mainnet),
            Err(InputError::MalformedUri { .. })
        ));
    }

    #[rstest]
    fn rejects_address_of_other_network(address: DashAddress) {
        assert!(PaymentUri::parse(&format!("dash:{address}"), Network::Testnet).is_err());
    }

    #[rstest]
    fn display_renders_canonical_form(address: DashAddress) {
        let uri = PaymentUri::new(address.clone())
            .with_amount(Duffs::new(150_000_000).unwrap())
            .with_label("Alice & Bob");
        assert_eq!(
            uri.to_string(),
            format!("dash:{address}?amount=1.5&label=Alice+%26+Bob")
        );
        assert_eq!(PaymentUri::parse(&uri.to_string(), Network::Mainnet).unwrap(), uri);
    }

    #[test]
    fn has_scheme_only_looks_at_the_prefix() {
        assert!(PaymentUri::has_scheme("Dash:whatever", &["dash"]));
        assert!(!PaymentUri::has_scheme("Xabc", &["dash"]));
        assert!(!PaymentUri::has_scheme("bitcoin:abc", &["dash", "pay"]));
    }
}
