// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! # Payment confirmation
//!
//! Once a [`PaymentInput`] is resolved it is presented for confirmation. The
//! [`PaymentConfirmationCoordinator`] tracks that presentation:
//!
//! ```text
//!   Idle --present--> AwaitingConfirmation --confirm--> Sending
//!                       |        ^                        |   |
//!                     cancel     +--------failure---------+   success
//!                       v                                     v
//!                      Done <---------------------------------+
//! ```
//!
//! The confirm control is enabled only while awaiting confirmation, which
//! guarantees at most one submission in flight per presentation.

use std::{
    future::Future,
    sync::{Arc, PoisonError, RwLock, Weak},
};

use anyhow::anyhow;
use dashpay_input::PaymentInput;
use log::{debug, info, warn};
use serde::Serialize;
use strum::Display;

use crate::{adapters::PaymentBroadcast, Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationState {
    #[default]
    Idle,
    AwaitingConfirmation,
    Sending,
    Done,
}

/// How a finished presentation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationOutcome {
    Sent,
    Cancelled,
}

/// The payment being presented and the state of its confirm control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub input: PaymentInput,
    pub sending_enabled: bool,
}

/// Receives the result of a presentation.
///
/// All methods have empty default implementations.
pub trait ConfirmationDelegate: Send + Sync {
    fn payment_sent(&self, _input: &PaymentInput) {}

    /// The presentation stays open and the payment can be confirmed again.
    fn payment_failed(&self, _input: &PaymentInput, _error: &Error) {}

    fn payment_cancelled(&self, _input: &PaymentInput) {}
}

#[derive(Default)]
struct Presentation {
    state: ConfirmationState,
    pending: Option<PendingConfirmation>,
    outcome: Option<ConfirmationOutcome>,
    cancel_requested: bool,
}

/// Coordinates the confirmation of a single payment.
///
/// A coordinator serves one presentation; once `Done` it rejects further
/// operations and a new coordinator is created for the next payment. The
/// delegate is held through a [`Weak`] reference.
pub struct PaymentConfirmationCoordinator<E> {
    context: E,
    presentation: RwLock<Presentation>,
    delegate: RwLock<Option<Weak<dyn ConfirmationDelegate>>>,
}

impl<E> PaymentConfirmationCoordinator<E> {
    pub fn new(context: E) -> Self {
        Self {
            context,
            presentation: RwLock::new(Presentation::default()),
            delegate: RwLock::new(None),
        }
    }

    pub fn set_delegate<D: ConfirmationDelegate + 'static>(&self, delegate: &Arc<D>) {
        let delegate = Arc::downgrade(delegate) as Weak<dyn ConfirmationDelegate>;
        *self
            .delegate
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(delegate);
    }

    pub fn context(&self) -> &E {
        &self.context
    }

    pub fn state(&self) -> ConfirmationState {
        self.read().state
    }

    /// Returns true if the confirm control should be enabled.
    pub fn sending_enabled(&self) -> bool {
        self.read()
            .pending
            .as_ref()
            .is_some_and(|pending| pending.sending_enabled)
    }

    /// Returns the payment being presented, if any.
    pub fn pending(&self) -> Option<PendingConfirmation> {
        self.read().pending.clone()
    }

    /// Returns how the last presentation ended, once it is `Done`.
    pub fn outcome(&self) -> Option<ConfirmationOutcome> {
        self.read().outcome
    }

    /// Presents `input` for confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyPresenting`] unless the coordinator is `Idle`.
    pub fn present(&self, input: PaymentInput) -> Result<()> {
        let mut presentation = self.write();
        if presentation.state != ConfirmationState::Idle {
            warn!(
                "Cannot present payment to {} while {}",
                input.pay_to_address(),
                presentation.state
            );
            return Err(Error::AlreadyPresenting);
        }

        debug!("Presenting payment to {}", input.pay_to_address());
        *presentation = Presentation {
            state: ConfirmationState::AwaitingConfirmation,
            pending: Some(PendingConfirmation {
                input,
                sending_enabled: true,
            }),
            ..Default::default()
        };
        Ok(())
    }

    /// Cancels the presentation.
    ///
    /// While awaiting confirmation the presentation is `Done` immediately.
    /// While sending, the submission already left and cannot be recalled;
    /// the presentation ends once it completes. A payment that still goes
    /// through is reported with [`ConfirmationDelegate::payment_sent`], a
    /// failure is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] when `Idle`, `Done`, or
    /// already cancelled while sending.
    pub fn cancel(&self) -> Result<()> {
        let input = {
            let mut presentation = self.write();
            match presentation.state {
                ConfirmationState::AwaitingConfirmation => {
                    presentation.state = ConfirmationState::Done;
                    presentation.outcome = Some(ConfirmationOutcome::Cancelled);
                    presentation.pending.take().map(|pending| pending.input)
                }
                ConfirmationState::Sending if !presentation.cancel_requested => {
                    presentation.cancel_requested = true;
                    presentation
                        .pending
                        .as_ref()
                        .map(|pending| pending.input.clone())
                }
                state => return Err(invalid(state, "cancel")),
            }
        };

        if let Some(input) = input {
            info!("Payment to {} cancelled", input.pay_to_address());
            if let Some(delegate) = self.delegate() {
                delegate.payment_cancelled(&input);
            }
        }
        Ok(())
    }

    /// Settles a submission whose future was dropped before it completed.
    ///
    /// The outcome of the submission is unknown. A requested cancel ends the
    /// presentation, otherwise the payment can be confirmed again.
    fn abandon(&self) {
        let (input, cancelled) = {
            let mut presentation = self.write();
            if presentation.state != ConfirmationState::Sending {
                return;
            }
            let cancelled = presentation.cancel_requested;
            let input = if cancelled {
                presentation.state = ConfirmationState::Done;
                presentation.outcome = Some(ConfirmationOutcome::Cancelled);
                presentation.pending.take().map(|pending| pending.input)
            } else {
                presentation.state = ConfirmationState::AwaitingConfirmation;
                presentation.pending.as_mut().map(|pending| {
                    pending.sending_enabled = true;
                    pending.input.clone()
                })
            };
            (input, cancelled)
        };

        let Some(input) = input else {
            return;
        };
        if cancelled {
            warn!("Cancelled payment to {} abandoned", input.pay_to_address());
            return;
        }
        warn!("Payment to {} abandoned", input.pay_to_address());
        if let Some(delegate) = self.delegate() {
            let error = Error::NetworkFailure {
                source_error: anyhow!("abandoned"),
            };
            delegate.payment_failed(&input, &error);
        }
    }

    fn delegate(&self) -> Option<Arc<dyn ConfirmationDelegate>> {
        self.delegate
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Presentation> {
        self.presentation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Presentation> {
        self.presentation
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> PaymentConfirmationCoordinator<E>
where
    E: PaymentBroadcast,
{
    /// Confirms the presented payment.
    ///
    /// On return the coordinator is `Sending` and the confirm control is
    /// disabled. Awaiting the returned future submits the payment. On
    /// success the presentation is `Done`; on failure it goes back to
    /// awaiting confirmation with the control enabled again, and the error
    /// is both returned and reported to the delegate. Dropping the future
    /// before it completes is treated as a failure, or ends the presentation
    /// if it was cancelled meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] unless a payment is awaiting
    /// confirmation with sending enabled. Nothing is submitted in that case.
    pub fn confirm(&self) -> Result<impl Future<Output = Result<()>> + Send + '_> {
        let input = {
            let mut guard = self.write();
            let presentation = &mut *guard;
            let state = presentation.state;
            match presentation.pending.as_mut() {
                Some(pending)
                    if state == ConfirmationState::AwaitingConfirmation
                        && pending.sending_enabled =>
                {
                    pending.sending_enabled = false;
                    let input = pending.input.clone();
                    presentation.state = ConfirmationState::Sending;
                    input
                }
                _ => {
                    warn!("Payment confirmed while {state}");
                    return Err(invalid(state, "confirm"));
                }
            }
        };
        debug!("Submitting payment to {}", input.pay_to_address());
        let submission = Submission {
            coordinator: self,
            armed: true,
        };
        Ok(self.send(input, submission))
    }

    async fn send(&self, input: PaymentInput, mut submission: Submission<'_, E>) -> Result<()> {
        let result = self
            .context
            .submit(&input)
            .await
            .map_err(|err| Error::NetworkFailure {
                source_error: anyhow::Error::new(err),
            });
        submission.armed = false;

        let cancelled = {
            let mut presentation = self.write();
            let cancelled = presentation.cancel_requested;
            match (&result, cancelled) {
                (Ok(()), _) => {
                    presentation.state = ConfirmationState::Done;
                    presentation.outcome = Some(ConfirmationOutcome::Sent);
                    presentation.pending = None;
                }
                (Err(_), true) => {
                    presentation.state = ConfirmationState::Done;
                    presentation.outcome = Some(ConfirmationOutcome::Cancelled);
                    presentation.pending = None;
                }
                (Err(_), false) => {
                    presentation.state = ConfirmationState::AwaitingConfirmation;
                    if let Some(pending) = presentation.pending.as_mut() {
                        pending.sending_enabled = true;
                    }
                }
            }
            cancelled
        };

        let delegate = self.delegate();
        match &result {
            Ok(()) => {
                info!("Payment to {} sent", input.pay_to_address());
                if let Some(delegate) = delegate {
                    delegate.payment_sent(&input);
                }
            }
            Err(err) if cancelled => {
                warn!(
                    "Cancelled payment to {} failed: {err}",
                    input.pay_to_address()
                );
            }
            Err(err) => {
                info!("Payment to {} failed: {err}", input.pay_to_address());
                if let Some(delegate) = delegate {
                    delegate.payment_failed(&input, err);
                }
            }
        }
        result
    }
}

/// Leaves `Sending` if the submission future is dropped before it completes.
struct Submission<'a, E> {
    coordinator: &'a PaymentConfirmationCoordinator<E>,
    armed: bool,
}

impl<E> Drop for Submission<'_, E> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.abandon();
        }
    }
}

fn invalid(state: ConfirmationState, operation: &str) -> Error {
    Error::InvalidStateTransition {
        state: state.to_string(),
        operation: operation.to_owned(),
    }
}
