// ABOUTME: Domain service layer for recipe, ingredient, and step operations
// ABOUTME: Protocol-agnostic business logic reusable across transport layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

//! Domain service layer
//!
//! Business logic lives here, independent of any transport. Services
//! hold a [`crate::database::Database`] handle and expose owner-scoped
//! operations; the reconciliation core is reached through
//! [`recipes::RecipeService::update_recipe`].

/// Single-ingredient append path
pub mod ingredients;

/// Recipe CRUD and full-recipe reconciliation
pub mod recipes;

/// Single-step append path and add-ingredient-to-step
pub mod steps;

pub use ingredients::IngredientService;
pub use recipes::RecipeService;
pub use steps::StepService;
