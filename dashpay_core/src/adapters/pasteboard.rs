// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

/// Read-only access to the system pasteboard.
pub trait Pasteboard: Send + Sync {
    /// Returns every string item currently on the pasteboard.
    fn strings(&self) -> Vec<String>;

    /// Returns true if the pasteboard holds any string, without reading it.
    ///
    /// Platforms that notify the user on every read should override this.
    fn has_strings(&self) -> bool {
        !self.strings().is_empty()
    }

    /// Returns every URL item currently on the pasteboard, as text.
    fn urls(&self) -> Vec<String> {
        Vec::new()
    }

    /// Returns true if the pasteboard holds any URL, without reading it.
    fn has_urls(&self) -> bool {
        !self.urls().is_empty()
    }
}
