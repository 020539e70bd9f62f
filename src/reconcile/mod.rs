// ABOUTME: Full-recipe reconciliation: desired-state lists merged against the persisted graph
// ABOUTME: Ingredient pass builds the placeholder mapping the step pass resolves links with
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

//! # Reconciliation engine
//!
//! A client submits the complete desired state of a recipe's ingredient
//! and step lists in one request, including brand-new items named by
//! caller-chosen placeholder strings. Reconciliation merges that desired
//! state against the persisted graph:
//!
//! 1. The **ingredient pass** decides update-vs-insert per entry, mints
//!    identities for new ones, renumbers the list, and emits the
//!    placeholder→persistent [`IngredientIdMap`].
//! 2. The **step pass** runs the same create-or-update loop for steps
//!    and rebuilds every step's link collection, resolving link targets
//!    through the map.
//!
//! The two passes are strictly sequential and run inside one
//! transaction; any failure rolls the whole edit back.

pub mod identity;
pub mod ingredients;
pub mod steps;

use std::collections::HashMap;

use uuid::Uuid;

/// Request-scoped table from client-supplied identifier string
/// (placeholder or persistent) to the persistent identity resolved in
/// the ingredient pass.
///
/// Built once per reconciliation, read-only during the step pass,
/// discarded with the request. Never persisted.
#[derive(Debug, Default)]
pub struct IngredientIdMap {
    entries: HashMap<String, Uuid>,
}

impl IngredientIdMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the resolved persistent identity for a client identifier
    pub fn insert(&mut self, client_id: impl Into<String>, persistent_id: Uuid) {
        self.entries.insert(client_id.into(), persistent_id);
    }

    /// Resolve a client identifier to the persistent identity assigned
    /// in the ingredient pass, if the request declared it
    #[must_use]
    pub fn resolve(&self, client_id: &str) -> Option<Uuid> {
        self.entries.get(client_id).copied()
    }

    /// Number of resolved identifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
