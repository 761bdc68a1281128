// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! In-memory context implementation.
//!
//! Implements every adapter over shared in-memory state. Calls are counted,
//! their outcomes can be scripted, and network calls can be held open until
//! released to observe intermediate states.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, PoisonError, RwLock,
    },
};

use async_trait::async_trait;
use dashpay_input::{DashAddress, IdentityRef, PaymentInput};
use dashpay_request::ContactRequestItem;
use thiserror::Error;
use tokio::sync::Notify;

use crate::adapters::*;

#[derive(Debug, Error)]
pub enum InMemoryError {
    #[error("something went wrong: {error}")]
    AdapterError { error: String },
}

/// Number of calls made to each adapter method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub lookup: usize,
    pub submit: usize,
    pub accept: usize,
    pub decline: usize,
    pub nfc_open: usize,
    pub nfc_close: usize,
}

#[derive(Default)]
struct Counters {
    lookup: AtomicUsize,
    submit: AtomicUsize,
    accept: AtomicUsize,
    decline: AtomicUsize,
    nfc_open: AtomicUsize,
    nfc_close: AtomicUsize,
}

/// Number of upcoming calls that fail, per adapter.
#[derive(Default)]
struct Failures {
    lookup: usize,
    submit: usize,
    request: usize,
}

#[derive(Default)]
struct Gate {
    holding: AtomicBool,
    release: Notify,
}

impl Gate {
    async fn pass(&self) {
        if self.holding.load(Ordering::Acquire) {
            self.release.notified().await;
        }
    }
}

#[derive(Clone)]
pub struct InMemoryContext {
    receiving_addresses: Arc<RwLock<HashMap<String, DashAddress>>>,
    incoming: Arc<RwLock<Vec<IdentityRef>>>,
    pasteboard: Arc<RwLock<Vec<String>>>,
    pasteboard_urls: Arc<RwLock<Vec<String>>>,
    nfc_supported: Arc<AtomicBool>,
    nfc_payloads: Arc<Mutex<VecDeque<Result<String, NfcError>>>>,
    submitted: Arc<RwLock<Vec<PaymentInput>>>,
    failures: Arc<Mutex<Failures>>,
    counters: Arc<Counters>,
    gate: Arc<Gate>,
}

impl InMemoryContext {
    pub fn new() -> Self {
        Self {
            receiving_addresses: Default::default(),
            incoming: Default::default(),
            pasteboard: Default::default(),
            pasteboard_urls: Default::default(),
            nfc_supported: Arc::new(AtomicBool::new(true)),
            nfc_payloads: Default::default(),
            submitted: Default::default(),
            failures: Default::default(),
            counters: Default::default(),
            gate: Default::default(),
        }
    }

    /// Makes `address` the receiving address of `identity`.
    pub fn add_contact(&self, identity: &IdentityRef, address: DashAddress) {
        write(&self.receiving_addresses).insert(identity.unique_id.clone(), address);
    }

    /// Replaces the identities with a pending incoming contact request.
    pub fn set_incoming_requests(&self, identities: Vec<IdentityRef>) {
        *write(&self.incoming) = identities;
    }

    pub fn set_pasteboard(&self, strings: Vec<String>) {
        *write(&self.pasteboard) = strings;
    }

    pub fn set_pasteboard_urls(&self, urls: Vec<String>) {
        *write(&self.pasteboard_urls) = urls;
    }

    pub fn set_nfc_supported(&self, supported: bool) {
        self.nfc_supported.store(supported, Ordering::Release);
    }

    /// Queues the result of the next NFC read.
    pub fn present_tag(&self, payload: Result<String, NfcError>) {
        lock(&self.nfc_payloads).push_back(payload);
    }

    pub fn fail_next_lookups(&self, count: usize) {
        lock(&self.failures).lookup = count;
    }

    pub fn fail_next_submits(&self, count: usize) {
        lock(&self.failures).submit = count;
    }

    /// Makes the next `count` accept or decline calls fail.
    pub fn fail_next_requests(&self, count: usize) {
        lock(&self.failures).request = count;
    }

    /// Makes network calls and NFC reads wait for [`Self::release_call`].
    pub fn hold_calls(&self, holding: bool) {
        self.gate.holding.store(holding, Ordering::Release);
    }

    /// Lets one held call complete.
    pub fn release_call(&self) {
        self.gate.release.notify_one();
    }

    /// Returns the payments submitted so far, including failed ones.
    pub fn submitted(&self) -> Vec<PaymentInput> {
        self.submitted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls(&self) -> CallCounts {
        let load = |counter: &AtomicUsize| counter.load(Ordering::SeqCst);
        CallCounts {
            lookup: load(&self.counters.lookup),
            submit: load(&self.counters.submit),
            accept: load(&self.counters.accept),
            decline: load(&self.counters.decline),
            nfc_open: load(&self.counters.nfc_open),
            nfc_close: load(&self.counters.nfc_close),
        }
    }

    fn outcome(
        &self,
        select: impl FnOnce(&mut Failures) -> &mut usize,
        what: &str,
    ) -> Result<(), InMemoryError> {
        let mut failures = lock(&self.failures);
        let remaining = select(&mut *failures);
        if *remaining > 0 {
            *remaining -= 1;
            return Err(InMemoryError::AdapterError {
                error: format!("{what} rejected"),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityLookup for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn resolve_receiving_address(
        &self,
        identity: &IdentityRef,
    ) -> Result<Option<DashAddress>, Self::AdapterError> {
        self.counters.lookup.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        self.outcome(|failures| &mut failures.lookup, "identity lookup")?;
        Ok(self
            .receiving_addresses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&identity.unique_id)
            .cloned())
    }
}

#[async_trait]
impl PaymentBroadcast for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn submit(&self, input: &PaymentInput) -> Result<(), Self::AdapterError> {
        self.counters.submit.fetch_add(1, Ordering::SeqCst);
        write(&self.submitted).push(input.clone());
        self.gate.pass().await;
        self.outcome(|failures| &mut failures.submit, "transaction")
    }
}

#[async_trait]
impl ContactRequestService for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn accept_request(&self, _item: &ContactRequestItem) -> Result<(), Self::AdapterError> {
        self.counters.accept.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        self.outcome(|failures| &mut failures.request, "contact request")
    }

    async fn decline_request(
        &self,
        _item: &ContactRequestItem,
    ) -> Result<(), Self::AdapterError> {
        self.counters.decline.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        self.outcome(|failures| &mut failures.request, "contact request")
    }
}

impl ContactsDataSource for InMemoryContext {
    fn incoming_requests(&self) -> Vec<IdentityRef> {
        self.incoming
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Pasteboard for InMemoryContext {
    fn strings(&self) -> Vec<String> {
        self.pasteboard
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn urls(&self) -> Vec<String> {
        self.pasteboard_urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub struct InMemoryNfcSession {
    context: InMemoryContext,
    closed: bool,
}

#[async_trait]
impl NfcSessionProvider for InMemoryContext {
    type Session = InMemoryNfcSession;

    fn is_supported(&self) -> bool {
        self.nfc_supported.load(Ordering::Acquire)
    }

    async fn open(&self) -> Result<InMemoryNfcSession, NfcError> {
        if !self.is_supported() {
            return Err(NfcError::Unsupported);
        }
        self.counters.nfc_open.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryNfcSession {
            context: self.clone(),
            closed: false,
        })
    }
}

#[async_trait]
impl NfcSession for InMemoryNfcSession {
    async fn read(&mut self) -> Result<String, NfcError> {
        self.context.gate.pass().await;
        lock(&self.context.nfc_payloads)
            .pop_front()
            .unwrap_or_else(|| Err(NfcError::Read("session timed out".to_owned())))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.context.counters.nfc_close.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
