// ABOUTME: Personal recipe manager backend library
// ABOUTME: Owner-scoped recipe storage with a transactional desired-state reconciliation core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

//! # Recipe API
//!
//! Backend library for a personal recipe manager. Recipes are aggregates
//! of ordered ingredients and ordered steps, where steps may link back to
//! ingredients of the same recipe. Every operation is scoped by the
//! owning subject.
//!
//! The core of the crate is the full-recipe update in
//! [`services::RecipeService::update_recipe`]: the client submits the
//! complete desired state of a recipe and the [`reconcile`] module merges
//! it against the persisted aggregate in a single transaction —
//! resolving placeholder identifiers to freshly minted persistent ones,
//! renumbering order indices from list position, rebuilding all
//! step-ingredient links, and removing anything absent from the
//! submission.

#![deny(unsafe_code)]

/// Configuration management
pub mod config;

/// Application-wide constants and defaults
pub mod constants;

/// Database connection, schema, and persistence modules
pub mod database;

/// Unified error handling
pub mod errors;

/// Logging initialization
pub mod logging;

/// Domain model and request types
pub mod models;

/// Desired-state reconciliation core
pub mod reconcile;

/// Domain service layer
pub mod services;
