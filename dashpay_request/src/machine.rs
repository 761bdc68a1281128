// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use std::{
    future::Future,
    sync::{Arc, PoisonError, RwLock, Weak},
};

use dashpay_input::IdentityRef;
use log::{debug, info, warn};

use crate::{
    adapters::{ContactRequestService, RequestObserver},
    state::{RequestAction, RequestState},
    transition::{transition, Effect, RequestEvent, Transition},
    ContactRequestItem, RequestError, Result,
};

/// Drives one incoming contact request through its lifecycle.
///
/// `accept` and `decline` validate the transition and move the request to
/// `Processing` before they return, so a re-render right after the tap shows
/// the busy state and a second tap is rejected. The returned future performs
/// the network call and applies its outcome; it should be awaited on the
/// same context that drives the UI, which keeps state changes and observer
/// notifications for a request sequential.
///
/// The observer is held through a [`Weak`] reference and is never kept alive
/// by the state machine.
pub struct ContactRequestStateMachine<S> {
    item: RwLock<ContactRequestItem>,
    service: Arc<S>,
    observer: RwLock<Option<Weak<dyn RequestObserver>>>,
}

impl<S> ContactRequestStateMachine<S> {
    pub fn new(identity: IdentityRef, service: Arc<S>) -> Self {
        Self {
            item: RwLock::new(ContactRequestItem::new(identity)),
            service,
            observer: RwLock::new(None),
        }
    }

    /// Registers the observer notified of terminal outcomes, replacing any
    /// previous one.
    pub fn set_observer<O: RequestObserver + 'static>(&self, observer: &Arc<O>) {
        self.set_weak_observer(Arc::downgrade(observer) as Weak<dyn RequestObserver>);
    }

    pub(crate) fn set_weak_observer(&self, observer: Weak<dyn RequestObserver>) {
        *self.observer.write().unwrap_or_else(PoisonError::into_inner) = Some(observer);
    }

    /// Returns a snapshot of the request.
    pub fn item(&self) -> ContactRequestItem {
        self.item
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn state(&self) -> RequestState {
        self.item().state().clone()
    }

    pub fn identity(&self) -> IdentityRef {
        self.item().identity().clone()
    }

    fn apply(&self, event: RequestEvent) -> Result<(Transition, ContactRequestItem)> {
        let mut item = self.item.write().unwrap_or_else(PoisonError::into_inner);
        let transition = transition(item.state(), event).inspect_err(|err| {
            warn!("Contact request from {}: {err}", item.identity());
        })?;

        debug!(
            "Contact request from {}: {} -> {}",
            item.identity(),
            transition.from,
            transition.to
        );
        item.set_state(transition.to.clone());
        Ok((transition, item.clone()))
    }

    /// Fails a request whose accept or decline future was dropped before the
    /// network call completed. The request can then be retried.
    fn abandon(&self, action: RequestAction) {
        let reason = "abandoned".to_owned();
        let error = RequestError::NetworkFailure {
            source_error: anyhow::anyhow!("{reason}"),
        };
        if let Ok((transition, item)) = self.apply(RequestEvent::Failed { reason }) {
            warn!("Contact request from {}: {action} abandoned", item.identity());
            self.notify(&transition.effect, &item, Some(&error));
        }
    }

    fn notify(&self, effect: &Effect, item: &ContactRequestItem, error: Option<&RequestError>) {
        let observer = self
            .observer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade);
        let Some(observer) = observer else {
            debug!("No observer registered for {}", item.identity());
            return;
        };

        match (effect, error) {
            (Effect::NotifyAccepted, _) => observer.request_accepted(item),
            (Effect::NotifyDeclined, _) => observer.request_declined(item),
            (Effect::NotifyFailed { .. }, Some(error)) => observer.request_failed(item, error),
            _ => {}
        }
    }
}

impl<S> ContactRequestStateMachine<S>
where
    S: ContactRequestService,
{
    /// Starts accepting the request.
    ///
    /// On return the request is `Processing`. Awaiting the returned future
    /// performs the network call and resolves to the resulting state,
    /// `Accepted` or `Failed`. Dropping the future before it completes
    /// leaves the request `Failed` with the reason `abandoned`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidStateTransition`] if the request is
    /// processing or already accepted or declined. No network call is made.
    pub fn accept(&self) -> Result<impl Future<Output = RequestState> + Send + '_> {
        self.start(RequestAction::Accept)
    }

    /// Starts declining the request. See [`Self::accept`].
    pub fn decline(&self) -> Result<impl Future<Output = RequestState> + Send + '_> {
        self.start(RequestAction::Decline)
    }

    fn start(&self, action: RequestAction) -> Result<impl Future<Output = RequestState> + Send + '_> {
        let (_, item) = self.apply(action.into())?;
        let in_flight = InFlight {
            machine: self,
            action,
            armed: true,
        };
        Ok(self.dispatch(item, in_flight))
    }

    async fn dispatch(
        &self,
        item: ContactRequestItem,
        mut in_flight: InFlight<'_, S>,
    ) -> RequestState {
        let action = in_flight.action;
        let result = match action {
            RequestAction::Accept => self.service.accept_request(&item).await,
            RequestAction::Decline => self.service.decline_request(&item).await,
        }
        .map_err(|err| RequestError::NetworkFailure {
            source_error: anyhow::Error::new(err),
        });
        in_flight.armed = false;

        let (event, error) = match result {
            Ok(()) => (RequestEvent::Succeeded, None),
            Err(error) => (
                RequestEvent::Failed {
                    reason: error.to_string(),
                },
                Some(error),
            ),
        };

        match self.apply(event) {
            Ok((transition, item)) => {
                match &error {
                    None => info!("Contact request from {} is {}", item.identity(), transition.to),
                    Some(error) => info!(
                        "Contact request from {}: {action} failed: {error}",
                        item.identity()
                    ),
                }
                self.notify(&transition.effect, &item, error.as_ref());
                transition.to
            }
            // Only this future moves the request out of `Processing`.
            Err(_) => self.state(),
        }
    }
}

/// Fails the request if its dispatch future is dropped before the network
/// call completes.
struct InFlight<'a, S> {
    machine: &'a ContactRequestStateMachine<S>,
    action: RequestAction,
    armed: bool,
}

impl<S> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            self.machine.abandon(self.action);
        }
    }
}
