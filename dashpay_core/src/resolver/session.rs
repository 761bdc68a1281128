// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Scoped ownership of the NFC reader.

use std::{
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicBool, Ordering},
};

use log::debug;

use crate::{adapters::NfcSession, Error, Result};

/// Claims the single NFC reader slot until dropped.
pub(super) struct ReaderSlot<'a> {
    busy: &'a AtomicBool,
}

impl<'a> ReaderSlot<'a> {
    pub(super) fn acquire(busy: &'a AtomicBool) -> Result<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::SessionBusy)?;
        Ok(Self { busy })
    }
}

impl Drop for ReaderSlot<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// An open reader session, closed when dropped.
///
/// Dropping covers every way a read ends: a payload, an error, or the
/// caller abandoning the read future.
pub(super) struct OpenSession<S: NfcSession> {
    session: S,
}

impl<S: NfcSession> OpenSession<S> {
    pub(super) fn new(session: S) -> Self {
        debug!("NFC session opened");
        Self { session }
    }
}

impl<S: NfcSession> Deref for OpenSession<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: NfcSession> DerefMut for OpenSession<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: NfcSession> Drop for OpenSession<S> {
    fn drop(&mut self) {
        self.session.close();
        debug!("NFC session closed");
    }
}
