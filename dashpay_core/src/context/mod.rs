// Copyright 2024-, Dash Core Group
// SPDX-License-Identifier: Apache-2.0

//! Context implementations.
//!
//! A context implements the [adapters](crate::adapters) needed by the
//! resolver, the confirmation coordinator and the contact request list.
//! The only implementation shipped is [`memory::InMemoryContext`], useful
//! for testing and development.
#[cfg(feature = "in_memory")]
pub mod memory;
