// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NfcError {
    #[error("NFC is not available")]
    Unsupported,
    #[error("{0}")]
    Read(String),
}

/// Opens reader sessions on the device NFC hardware.
#[async_trait]
pub trait NfcSessionProvider: Send + Sync {
    type Session: NfcSession;

    fn is_supported(&self) -> bool;

    /// Starts a reader session. On mobile platforms this presents the system
    /// scanning sheet.
    async fn open(&self) -> Result<Self::Session, NfcError>;
}

/// A single reader session.
///
/// Sessions are closed by the resolver once the read completes, fails or is
/// abandoned.
#[async_trait]
pub trait NfcSession: Send {
    /// Waits for a tag and returns the text of its first NDEF record, a
    /// payment URI or a bare address.
    async fn read(&mut self) -> Result<String, NfcError>;

    fn close(&mut self);
}
