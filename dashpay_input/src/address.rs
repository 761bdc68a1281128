// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Base58check Dash addresses.
//!
//! A Dash address is a version byte followed by a 20 byte hash, encoded with
//! base58check. The version byte identifies both the network and whether the
//! hash is of a public key or of a script.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::InputError;

const MAINNET_PUBKEY_HASH: u8 = 76;
const MAINNET_SCRIPT_HASH: u8 = 16;
const TESTNET_PUBKEY_HASH: u8 = 140;
const TESTNET_SCRIPT_HASH: u8 = 19;
const HASH_LEN: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    PubkeyHash,
    ScriptHash,
}

impl Network {
    fn version_byte(self, kind: AddressKind) -> u8 {
        match (self, kind) {
            (Network::Mainnet, AddressKind::PubkeyHash) => MAINNET_PUBKEY_HASH,
            (Network::Mainnet, AddressKind::ScriptHash) => MAINNET_SCRIPT_HASH,
            (Network::Testnet, AddressKind::PubkeyHash) => TESTNET_PUBKEY_HASH,
            (Network::Testnet, AddressKind::ScriptHash) => TESTNET_SCRIPT_HASH,
        }
    }

    fn from_version_byte(version: u8) -> Option<(Network, AddressKind)> {
        match version {
            MAINNET_PUBKEY_HASH => Some((Network::Mainnet, AddressKind::PubkeyHash)),
            MAINNET_SCRIPT_HASH => Some((Network::Mainnet, AddressKind::ScriptHash)),
            TESTNET_PUBKEY_HASH => Some((Network::Testnet, AddressKind::PubkeyHash)),
            TESTNET_SCRIPT_HASH => Some((Network::Testnet, AddressKind::ScriptHash)),
            _ => None,
        }
    }
}

/// A validated Dash address.
///
/// The textual form is kept exactly as it was received so that it can be
/// displayed and handed to the broadcast service unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DashAddress {
    encoded: String,
    network: Network,
    kind: AddressKind,
}

impl DashAddress {
    /// Parses an address of any known network.
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let encoded = input.trim();
        let invalid = |reason: String| InputError::InvalidAddress {
            address: encoded.to_owned(),
            reason,
        };

        if encoded.is_empty() {
            return Err(invalid("address is empty".to_owned()));
        }

        let payload = bs58::decode(encoded)
            .with_check(None)
            .into_vec()
            .map_err(|err| invalid(err.to_string()))?;

        let (version, hash) = payload
            .split_first()
            .ok_or_else(|| invalid("address has no version byte".to_owned()))?;
        if hash.len() != HASH_LEN {
            return Err(invalid(format!(
                "expected a {HASH_LEN} byte hash, found {}",
                hash.len()
            )));
        }
        let (network, kind) = Network::from_version_byte(*version)
            .ok_or_else(|| invalid(format!("unknown version byte {version}")))?;

        Ok(Self {
            encoded: encoded.to_owned(),
            network,
            kind,
        })
    }

    /// Parses an address and requires it to belong to `network`.
    pub fn parse_for_network(input: &str, network: Network) -> Result<Self, InputError> {
        let address = Self::parse(input)?;
        if address.network != network {
            return Err(InputError::WrongNetwork {
                address: address.encoded,
                expected: network,
            });
        }
        Ok(address)
    }

    /// Encodes a 20 byte hash as an address of the given network and kind.
    pub fn from_hash(network: Network, kind: AddressKind, hash: [u8; HASH_LEN]) -> Self {
        let mut payload = Vec::with_capacity(HASH_LEN + 1);
        payload.push(network.version_byte(kind));
        payload.extend_from_slice(&hash);
        Self {
            encoded: bs58::encode(payload).with_check().into_string(),
            network,
            kind,
        }
    }

    /// Returns true when `input` is a valid address on `network`.
    pub fn is_valid(input: &str, network: Network) -> bool {
        Self::parse_for_network(input, network).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }
}

impl FromStr for DashAddress {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DashAddress {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DashAddress> for String {
    fn from(value: DashAddress) -> Self {
        value.encoded
    }
}

impl Display for DashAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::{AddressKind, DashAddress, Network};
    use crate::InputError;

    #[rstest]
    #[case::mainnet_p2pkh(Network::Mainnet, AddressKind::PubkeyHash, 'X')]
    #[case::mainnet_p2sh(Network::Mainnet, AddressKind::ScriptHash, '7')]
    #[case::testnet_p2pkh(Network::Testnet, AddressKind::PubkeyHash, 'y')]
    #[case::testnet_p2sh(Network::Testnet, AddressKind::ScriptHash, '8')]
    fn encoded_addresses_parse_back(
        #[case] network: Network,
        #[case] kind: AddressKind,
        #[case] prefix: char,
    ) {
        let address = DashAddress::from_hash(network, kind, [0x5a; 20]);
        assert!(address.as_str().starts_with(prefix));
        assert_eq!(address.as_str().len(), 34);

        let parsed = DashAddress::parse(address.as_str()).unwrap();
        assert_eq!(parsed, address);
        assert_eq!(parsed.network(), network);
        assert_eq!(parsed.kind(), kind);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let address = DashAddress::from_hash(Network::Mainnet, AddressKind::PubkeyHash, [7; 20]);
        let mut corrupted = address.as_str().to_owned();
        let last = corrupted.pop().unwrap();
        corrupted.push(if last == 'z' { 'y' } else { 'z' });

        assert!(matches!(
            DashAddress::parse(&corrupted),
            Err(InputError::InvalidAddress { .. })
        ));
    }

    #[rstest]
    #[case::empty("")]
    #[case::not_base58("0OIl")]
    #[case::too_short("X")]
    #[case::prose("hello world")]
    fn rejects_garbage(#[case] input: &str) {
        assert!(DashAddress::parse(input).is_err());
    }

    #[test]
    fn enforces_network() {
        let testnet = DashAddress::from_hash(Network::Testnet, AddressKind::PubkeyHash, [1; 20]);
        assert!(DashAddress::is_valid(testnet.as_str(), Network::Testnet));
        assert_eq!(
            DashAddress::parse_for_network(testnet.as_str(), Network::Mainnet),
            Err(InputError::WrongNetwork {
                address: testnet.to_string(),
                expected: Network::Mainnet,
            })
        );
    }
}
