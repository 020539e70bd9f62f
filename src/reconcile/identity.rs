// ABOUTME: Identity resolution for client-supplied identifier strings
// ABOUTME: Parse success against the UUID format is the sole signal that an item exists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

//! Identity resolution
//!
//! Persistent identifiers use one fixed format: UUID text. Any string
//! failing to parse is, by contract, a caller-chosen placeholder for a
//! not-yet-created record. Resolvers must attempt the parse first and
//! perform the existence lookup only on parse success — a well-formed
//! identifier that matches no record is a stale reference (client
//! error), not a new item.

use uuid::Uuid;

/// Classification of a client-supplied identifier string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIdentifier {
    /// Parses as a persistent identifier; existence must still be checked
    Persistent(Uuid),
    /// Anything else: a placeholder naming a record to be created
    Placeholder,
}

impl ClientIdentifier {
    /// Classify a raw identifier string. Parse is attempted before any
    /// lookup; parse failure is the sole signal that an item is new.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Uuid::try_parse(raw).map_or(Self::Placeholder, Self::Persistent)
    }
}

/// Outcome of resolving one desired-state entry against the store
#[derive(Debug)]
pub enum Resolution<T> {
    /// The identifier matched an existing record; update it in place
    Existing(T),
    /// The identifier was a placeholder; create a record under the minted identity
    Create(Uuid),
}

/// Mint a fresh persistent identity (UUIDv7, so ids sort by creation time)
#[must_use]
pub fn mint_id() -> Uuid {
    Uuid::now_v7()
}
