// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use dashpay_core::{
    adapters::NfcError, context::memory::InMemoryContext, AddressKind, Config, DashAddress,
    Destination, Duffs, Error, IdentityRef, Network, PaymentInputResolver, PaymentSource,
};
use rstest::*;

#[fixture]
fn address() -> DashAddress {
    DashAddress::from_hash(Network::Mainnet, AddressKind::PubkeyHash, [0x5a; 20])
}

#[fixture]
fn testnet_address() -> DashAddress {
    DashAddress::from_hash(Network::Testnet, AddressKind::PubkeyHash, [0x5a; 20])
}

#[fixture]
fn alice() -> IdentityRef {
    IdentityRef::new("identity-alice", "alice")
}

#[fixture]
fn context() -> InMemoryContext {
    InMemoryContext::new()
}

#[fixture]
fn resolver(context: InMemoryContext) -> PaymentInputResolver<InMemoryContext> {
    PaymentInputResolver::new(&Config::default(), context)
}

#[rstest]
fn url_with_amount_and_label(resolver: PaymentInputResolver<InMemoryContext>, address: DashAddress) {
    let input = resolver
        .from_url(&format!("dash:{address}?amount=1.5&label=Coffee%20shop"))
        .unwrap();

    assert_eq!(input.source(), PaymentSource::Url);
    assert_eq!(input.pay_to_address(), &address);
    assert_eq!(input.amount(), Some(Duffs::new(150_000_000).unwrap()));
    assert_eq!(input.label(), Some("Coffee shop"));
    assert!(input.identity().is_none());
}

#[rstest]
fn pay_scheme_is_accepted_by_default(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
) {
    let input = resolver.from_url(&format!("pay:{address}")).unwrap();
    assert_eq!(input.pay_to_address(), &address);
    assert_eq!(input.amount(), None);
}

#[rstest]
#[case::empty("")]
#[case::no_address("dash:")]
#[case::other_scheme("bitcoin:XyzNotAnAddress")]
#[case::garbage_address("dash:notanaddress")]
#[case::bad_amount("dash:{address}?amount=abc")]
#[case::zero_amount("dash:{address}?amount=0")]
#[case::bare_address("{address}")]
#[case::required_parameter("dash:{address}?req-expires=10")]
fn malformed_urls_are_rejected(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
    #[case] template: &str,
) {
    let url = template.replace("{address}", address.as_str());
    assert!(matches!(
        resolver.from_url(&url),
        Err(Error::MalformedUri { .. })
    ));
}

#[rstest]
fn url_for_another_network_is_rejected(
    resolver: PaymentInputResolver<InMemoryContext>,
    testnet_address: DashAddress,
) {
    assert!(matches!(
        resolver.from_url(&format!("dash:{testnet_address}")),
        Err(Error::MalformedUri { .. })
    ));
}

#[rstest]
fn accepted_schemes_follow_the_config(context: InMemoryContext, address: DashAddress) {
    let config = Config {
        accepted_schemes: vec!["dash".to_owned()],
        ..Config::default()
    };
    let resolver = PaymentInputResolver::new(&config, context);

    assert!(resolver.from_url(&format!("dash:{address}")).is_ok());
    assert!(resolver.from_url(&format!("pay:{address}")).is_err());
}

#[rstest]
#[case::bare_address("{address}")]
#[case::padded("   {address}\n")]
#[case::in_a_sentence("please send it to {address} before friday")]
#[case::second_line("hi!\nmy address:\n{address}")]
#[case::uri_in_a_sentence("invoice dash:{address}?amount=0.25 thanks")]
fn pasteboard_text_is_scanned(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
    #[case] template: &str,
) {
    let text = template.replace("{address}", address.as_str());
    let input = resolver.from_pasteboard_string(&text).unwrap();
    assert_eq!(input.source(), PaymentSource::Pasteboard);
    assert_eq!(input.pay_to_address(), &address);
}

#[rstest]
#[case::empty("")]
#[case::whitespace(" \n\t ")]
#[case::no_payment("see you tomorrow")]
#[case::corrupted_address("XAbCdEf0OIl")]
fn pasteboard_without_payment(
    resolver: PaymentInputResolver<InMemoryContext>,
    #[case] text: &str,
) {
    assert!(resolver.from_pasteboard_string(text).is_none());
}

#[rstest]
fn pasteboard_prefers_the_first_payable_candidate(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
) {
    let other = DashAddress::from_hash(Network::Mainnet, AddressKind::ScriptHash, [0x11; 20]);
    let text = format!("{other}\n{address}");
    let input = resolver.from_pasteboard_string(&text).unwrap();
    assert_eq!(input.pay_to_address(), &other);
}

#[rstest]
fn system_pasteboard_items_are_joined(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
) {
    let context = resolver.context();
    assert!(!resolver.pasteboard_has_content());
    assert!(resolver.from_pasteboard().is_none());

    context.set_pasteboard(vec!["not a payment".to_owned(), address.to_string()]);
    assert!(resolver.pasteboard_has_content());
    let input = resolver.from_pasteboard().unwrap();
    assert_eq!(input.pay_to_address(), &address);
}

#[rstest]
fn pasteboard_url_items_count_as_content(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
) {
    let context = resolver.context();
    context.set_pasteboard_urls(vec![format!("dash:{address}?amount=0.1")]);

    assert!(resolver.pasteboard_has_content());
    let input = resolver.from_pasteboard().unwrap();
    assert_eq!(input.pay_to_address(), &address);
    assert_eq!(input.amount(), Some(Duffs::new(10_000_000).unwrap()));
}

#[rstest]
#[tokio::test]
async fn nfc_tag_with_payment_uri(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
) {
    let context = resolver.context();
    context.present_tag(Ok(format!("dash:{address}?amount=0.001")));

    let input = resolver.from_nfc_read().await.unwrap();
    assert_eq!(input.source(), PaymentSource::Nfc);
    assert_eq!(input.amount(), Some(Duffs::new(100_000).unwrap()));

    let calls = context.calls();
    assert_eq!((calls.nfc_open, calls.nfc_close), (1, 1));
    assert!(!resolver.is_nfc_session_active());
}

#[rstest]
#[tokio::test]
async fn nfc_tag_with_bare_address(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
) {
    let context = resolver.context();
    context.present_tag(Ok(address.to_string()));
    let input = resolver.from_nfc_read().await.unwrap();
    assert_eq!(input.pay_to_address(), &address);
}

#[rstest]
#[tokio::test]
async fn nfc_unsupported_opens_no_session(
    resolver: PaymentInputResolver<InMemoryContext>,
) {
    let context = resolver.context();
    context.set_nfc_supported(false);
    assert!(matches!(
        resolver.from_nfc_read().await,
        Err(Error::NfcUnsupported)
    ));
    assert_eq!(context.calls().nfc_open, 0);
}

#[rstest]
#[tokio::test]
async fn nfc_failures_close_the_session(
    resolver: PaymentInputResolver<InMemoryContext>,
) {
    let context = resolver.context();
    context.present_tag(Err(NfcError::Read("tag moved away".to_owned())));
    match resolver.from_nfc_read().await {
        Err(Error::NfcReadFailure { reason }) => assert_eq!(reason, "tag moved away"),
        other => panic!("unexpected result {other:?}"),
    }

    context.present_tag(Ok("https://example.com".to_owned()));
    assert!(matches!(
        resolver.from_nfc_read().await,
        Err(Error::InvalidInput(_))
    ));

    let calls = context.calls();
    assert_eq!((calls.nfc_open, calls.nfc_close), (2, 2));
    assert!(!resolver.is_nfc_session_active());
}

#[rstest]
#[tokio::test]
async fn second_nfc_read_while_active_is_busy(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
) {
    let context = resolver.context();
    context.present_tag(Ok(address.to_string()));
    context.hold_calls(true);

    let mut first = Box::pin(resolver.from_nfc_read());
    assert!(tokio::time::timeout(Duration::from_millis(20), &mut first)
        .await
        .is_err());
    assert!(resolver.is_nfc_session_active());

    assert!(matches!(
        resolver.from_nfc_read().await,
        Err(Error::SessionBusy)
    ));
    assert_eq!(context.calls().nfc_open, 1);

    context.release_call();
    assert!(first.await.is_ok());
    assert!(!resolver.is_nfc_session_active());
    assert_eq!(context.calls().nfc_close, 1);
}

#[rstest]
#[tokio::test]
async fn abandoned_nfc_read_releases_the_reader(
    resolver: PaymentInputResolver<InMemoryContext>,
    address: DashAddress,
) {
    let context = resolver.context();
    context.hold_calls(true);
    let mut read = Box::pin(resolver.from_nfc_read());
    assert!(tokio::time::timeout(Duration::from_millis(20), &mut read)
        .await
        .is_err());
    drop(read);

    assert!(!resolver.is_nfc_session_active());
    assert_eq!(context.calls().nfc_close, 1);

    context.hold_calls(false);
    context.present_tag(Ok(address.to_string()));
    assert!(resolver.from_nfc_read().await.is_ok());
}

#[rstest]
#[tokio::test]
async fn contact_identity_pays_its_receiving_address(
    resolver: PaymentInputResolver<InMemoryContext>,
    alice: IdentityRef,
    address: DashAddress,
) {
    let context = resolver.context();
    context.add_contact(&alice, address.clone());

    let input = resolver.from_contact_identity(&alice).await.unwrap();
    assert_eq!(input.source(), PaymentSource::ContactIdentity);
    assert_eq!(input.identity(), Some(&alice));
    assert_eq!(input.pay_to_address(), &address);
    assert_eq!(
        input.destination(),
        &Destination::Identity {
            identity: alice,
            receiving_address: address,
        }
    );
}

#[rstest]
#[tokio::test]
async fn contact_without_address(
    resolver: PaymentInputResolver<InMemoryContext>,
    alice: IdentityRef,
) {
    match resolver.from_contact_identity(&alice).await {
        Err(Error::NoReceivingAddress { identity }) => assert_eq!(identity, "@alice"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn contact_lookup_failure_is_a_network_failure(
    resolver: PaymentInputResolver<InMemoryContext>,
    alice: IdentityRef,
    address: DashAddress,
) {
    let context = resolver.context();
    context.add_contact(&alice, address);
    context.fail_next_lookups(1);

    assert!(matches!(
        resolver.from_contact_identity(&alice).await,
        Err(Error::NetworkFailure { .. })
    ));
    assert!(resolver.from_contact_identity(&alice).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn contact_address_on_another_network(
    resolver: PaymentInputResolver<InMemoryContext>,
    alice: IdentityRef,
    testnet_address: DashAddress,
) {
    let context = resolver.context();
    context.add_contact(&alice, testnet_address);
    assert!(matches!(
        resolver.from_contact_identity(&alice).await,
        Err(Error::InvalidInput(_))
    ));
}

#[rstest]
#[tokio::test]
async fn contacts_require_dashpay(
    context: InMemoryContext,
    alice: IdentityRef,
    address: DashAddress,
) {
    context.add_contact(&alice, address);
    let resolver = PaymentInputResolver::new(&Config::default().with_dashpay(false), context.clone());

    assert!(matches!(
        resolver.from_contact_identity(&alice).await,
        Err(Error::FeatureDisabled { .. })
    ));
    assert_eq!(context.calls().lookup, 0);
}
