// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database setup, recipe seeding, and draft-building helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `recipe_api`
//!
//! Common setup functions to reduce duplication across integration tests.

use std::sync::Once;

use anyhow::Result;
use recipe_api::{
    database::Database,
    models::{CreateRecipeRequest, IngredientDraft, Recipe, StepDraft, StepLinkDraft},
    services::RecipeService,
};

pub const TEST_SUBJECT: &str = "user@example.com";
pub const OTHER_SUBJECT: &str = "other@example.com";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    Ok(database)
}

/// Create a recipe with no ingredients or steps, owned by [`TEST_SUBJECT`]
pub async fn seed_recipe(service: &RecipeService, title: &str) -> Result<Recipe> {
    let request = CreateRecipeRequest {
        title: title.into(),
        slug: None,
        description: None,
        servings: None,
        original_url: None,
        prep_time: None,
        cook_time: None,
        rest_time: None,
        note: None,
    };
    let recipe = service.create_recipe(TEST_SUBJECT, &request).await?;
    Ok(recipe)
}

/// An ingredient draft carrying only an identifier and notes
pub fn ingredient_draft(id: &str, notes: &str) -> IngredientDraft {
    IngredientDraft {
        id: id.into(),
        notes: notes.into(),
        heading: None,
        parsed_ingredient: None,
        parsed_original_amount: None,
        parsed_original_unit: None,
        original_measurement_system: None,
        parsed_converted_amount: None,
        parsed_converted_unit: None,
        converted_measurement_system: None,
    }
}

/// A step draft with no links
pub fn step_draft(id: &str, description: &str) -> StepDraft {
    StepDraft {
        id: id.into(),
        description: description.into(),
        heading: None,
        linked_ingredients: Vec::new(),
    }
}

/// A step draft linking the given ingredient identifiers
pub fn step_draft_with_links(id: &str, description: &str, ingredient_ids: &[&str]) -> StepDraft {
    StepDraft {
        id: id.into(),
        description: description.into(),
        heading: None,
        linked_ingredients: ingredient_ids
            .iter()
            .map(|ingredient_id| StepLinkDraft {
                ingredient_id: (*ingredient_id).into(),
                highlight: false,
                highlight_start: 0,
                highlight_end: 0,
            })
            .collect(),
    }
}
