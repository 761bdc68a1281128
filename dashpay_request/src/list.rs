// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Weak},
};

use log::debug;

use crate::{
    adapters::{ContactsDataSource, RequestObserver},
    ContactRequestStateMachine,
};

/// Outcome of [`IncomingRequestList::reload`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    pub added: usize,
    pub removed: usize,
}

/// The visible list of incoming contact requests, one state machine per
/// request.
///
/// The list follows the data source: a machine is created when a request
/// appears and dropped when the data source stops listing it, for instance
/// once an accepted request has been merged into the contacts. Requests that
/// stay listed keep their machine and therefore their state.
pub struct IncomingRequestList<S> {
    service: Arc<S>,
    machines: Vec<Arc<ContactRequestStateMachine<S>>>,
    observer: Option<Weak<dyn RequestObserver>>,
}

impl<S> IncomingRequestList<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            machines: Vec::new(),
            observer: None,
        }
    }

    /// Registers `observer` on every current and future request.
    pub fn set_observer<O: RequestObserver + 'static>(&mut self, observer: &Arc<O>) {
        let observer = Arc::downgrade(observer) as Weak<dyn RequestObserver>;
        for machine in &self.machines {
            machine.set_weak_observer(observer.clone());
        }
        self.observer = Some(observer);
    }

    /// Synchronizes the list with `source`, keeping the data source order.
    pub fn reload<D: ContactsDataSource + ?Sized>(&mut self, source: &D) -> ReloadSummary {
        let mut previous: HashMap<String, Arc<ContactRequestStateMachine<S>>> = self
            .machines
            .drain(..)
            .map(|machine| (machine.identity().unique_id, machine))
            .collect();

        let mut seen = HashSet::new();
        let mut added = 0;
        for identity in source.incoming_requests() {
            if !seen.insert(identity.unique_id.clone()) {
                continue;
            }
            let machine = match previous.remove(&identity.unique_id) {
                Some(machine) => machine,
                None => {
                    added += 1;
                    let machine =
                        ContactRequestStateMachine::new(identity, Arc::clone(&self.service));
                    if let Some(observer) = &self.observer {
                        machine.set_weak_observer(observer.clone());
                    }
                    Arc::new(machine)
                }
            };
            self.machines.push(machine);
        }

        let summary = ReloadSummary {
            added,
            removed: previous.len(),
        };
        debug!(
            "Incoming requests reloaded: {} added, {} removed, {} listed",
            summary.added,
            summary.removed,
            self.machines.len()
        );
        summary
    }

    /// Looks up the request sent by the identity with `unique_id`.
    pub fn get(&self, unique_id: &str) -> Option<Arc<ContactRequestStateMachine<S>>> {
        self.machines
            .iter()
            .find(|machine| machine.identity().unique_id == unique_id)
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ContactRequestStateMachine<S>>> {
        self.machines.iter()
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}
