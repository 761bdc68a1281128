// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! `dashpay`: resolves and builds Dash payment requests from the command
//! line. Results are printed as JSON on stdout.

use std::{fs, io::Read, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use dashpay_core::{Config, DashAddress, Duffs, Network, PaymentInputResolver, PaymentUri};
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file. Command line options take precedence.
    #[arg(long, env = "DASHPAY_CONFIG")]
    config: Option<PathBuf>,

    /// Network whose addresses are accepted: mainnet or testnet.
    #[arg(long, env = "DASHPAY_NETWORK")]
    network: Option<Network>,

    /// Accepted payment URI schemes, comma separated.
    /// Defaults to dash,pay.
    #[arg(long, env = "DASHPAY_SCHEMES", value_delimiter = ',')]
    schemes: Option<Vec<String>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parses a payment URI, as received from a deep link or a QR code.
    ResolveUri { uri: String },

    /// Finds the first payment URI or address in a text, as the wallet does
    /// with the pasteboard. Reads stdin when no text is given.
    Scan { text: Option<String> },

    /// Builds a payment URI.
    FormatUri {
        address: String,

        /// Amount in DASH, e.g. 0.25.
        #[arg(long, value_parser = Duffs::from_dash_str)]
        amount: Option<Duffs>,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        message: Option<String>,
    },
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
            }
            None => Config::default(),
        };
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(schemes) = &self.schemes {
            config.accepted_schemes = schemes.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Set the log level with the RUST_LOG environment variable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    debug!("Settings: {:?}", args);

    let config = args.load_config()?;
    println!("{}", run(&config, args.command)?);
    Ok(())
}

fn run(config: &Config, command: Command) -> Result<String> {
    let resolver = PaymentInputResolver::new(config, ());

    match command {
        Command::ResolveUri { uri } => {
            let input = resolver.from_url(&uri)?;
            info!("Resolved payment to {}", input.destination());
            Ok(serde_json::to_string_pretty(&input)?)
        }
        Command::Scan { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let input = resolver
                .from_pasteboard_string(&text)
                .ok_or_else(|| anyhow!("no payment found"))?;
            Ok(serde_json::to_string_pretty(&input)?)
        }
        Command::FormatUri {
            address,
            amount,
            label,
            message,
        } => {
            let mut uri = PaymentUri::new(DashAddress::parse_for_network(&address, config.network)?);
            if let Some(amount) = amount {
                uri = uri.with_amount(amount);
            }
            if let Some(label) = label {
                uri = uri.with_label(label);
            }
            if let Some(message) = message {
                uri = uri.with_message(message);
            }
            Ok(uri.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use dashpay_core::{AddressKind, Config, DashAddress, Duffs, Network};
    use rstest::*;

    use super::{run, Args, Command};

    #[fixture]
    fn address() -> DashAddress {
        DashAddress::from_hash(Network::Mainnet, AddressKind::PubkeyHash, [0x5a; 20])
    }

    #[test]
    fn options_override_defaults() {
        let args = Args::try_parse_from([
            "dashpay",
            "--network",
            "testnet",
            "--schemes",
            "dash",
            "scan",
            "hello",
        ])
        .unwrap();
        let config = args.load_config().unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.accepted_schemes, vec!["dash"]);
        assert!(config.dashpay_enabled);
    }

    #[rstest]
    fn format_then_resolve(address: DashAddress) {
        let config = Config::default();
        let uri = run(
            &config,
            Command::FormatUri {
                address: address.to_string(),
                amount: Some(Duffs::from_dash_str("0.5").unwrap()),
                label: Some("Tip jar".to_owned()),
                message: None,
            },
        )
        .unwrap();
        assert_eq!(uri, format!("dash:{address}?amount=0.5&label=Tip+jar"));

        let json = run(&config, Command::ResolveUri { uri }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "url");
        assert_eq!(value["label"], "Tip jar");
    }

    #[rstest]
    fn scan_reports_missing_payment() {
        let config = Config::default();
        assert!(run(
            &config,
            Command::Scan {
                text: Some("nothing to see".to_owned())
            }
        )
        .is_err());
    }

    #[test]
    fn invalid_amount_is_a_usage_error() {
        assert!(Args::try_parse_from(["dashpay", "format-uri", "Xaddr", "--amount", "abc"]).is_err());
    }
}
