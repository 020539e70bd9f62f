// ABOUTME: Domain models for recipes, ingredients, steps, and step-ingredient links
// ABOUTME: The Recipe aggregate owns its collections; children carry back-references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

//! Domain model types
//!
//! The [`Recipe`] aggregate is the single point of mutation for its
//! ingredient and step collections: the lists are private and only
//! reachable through add/clear accessors that fix up child
//! back-references. Order indices are dense 0-based sequences owned by
//! the reconciliation passes, never trusted from client input.

mod ingredient;
mod recipe;
mod requests;
mod step;

pub use ingredient::{Ingredient, MeasurementSystem};
pub use recipe::Recipe;
pub use requests::{
    CreateIngredientRequest, CreateRecipeRequest, CreateStepLinkRequest, CreateStepRequest,
    IngredientDraft, StepDraft, StepLinkDraft, UpdateRecipeRequest,
};
pub use step::{Step, StepIngredient};
