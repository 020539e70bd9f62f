// ABOUTME: Request types for recipe creation, full-recipe updates, and append paths
// ABOUTME: Draft types carry client-supplied identifier strings (persistent or placeholder)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use serde::{Deserialize, Serialize};

use super::MeasurementSystem;

/// Desired state for one ingredient in a full-recipe update.
///
/// `id` is either a persistent identifier (canonical UUID text) or a
/// caller-chosen placeholder naming a not-yet-created ingredient so step
/// links can reference it within the same request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientDraft {
    pub id: String,
    pub notes: String,
    #[serde(default)]
    pub heading: Option<bool>,
    #[serde(default)]
    pub parsed_ingredient: Option<String>,
    #[serde(default)]
    pub parsed_original_amount: Option<f64>,
    #[serde(default)]
    pub parsed_original_unit: Option<String>,
    #[serde(default)]
    pub original_measurement_system: Option<MeasurementSystem>,
    #[serde(default)]
    pub parsed_converted_amount: Option<f64>,
    #[serde(default)]
    pub parsed_converted_unit: Option<String>,
    #[serde(default)]
    pub converted_measurement_system: Option<MeasurementSystem>,
}

/// Desired state for one step-ingredient link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepLinkDraft {
    /// Client-supplied ingredient identifier, persistent or placeholder
    pub ingredient_id: String,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default)]
    pub highlight_start: i32,
    #[serde(default)]
    pub highlight_end: i32,
}

/// Desired state for one step in a full-recipe update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDraft {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub heading: Option<bool>,
    #[serde(default)]
    pub linked_ingredients: Vec<StepLinkDraft>,
}

/// Full-recipe update: scalar fields plus the complete desired ingredient
/// and step lists. List order is the sole source of truth for order
/// indices; members absent from the lists are removed (full-replace).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub servings: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub cook_time: Option<i32>,
    #[serde(default)]
    pub rest_time: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub ingredients: Vec<IngredientDraft>,
    #[serde(default)]
    pub steps: Vec<StepDraft>,
}

/// Request to create a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub servings: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub cook_time: Option<i32>,
    #[serde(default)]
    pub rest_time: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Request to append one ingredient to the end of a recipe's list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngredientRequest {
    pub notes: String,
    #[serde(default)]
    pub heading: Option<bool>,
    #[serde(default)]
    pub parsed_ingredient: Option<String>,
    #[serde(default)]
    pub parsed_original_amount: Option<f64>,
    #[serde(default)]
    pub parsed_original_unit: Option<String>,
    #[serde(default)]
    pub original_measurement_system: Option<MeasurementSystem>,
}

/// Request to append one step to the end of a recipe's list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStepRequest {
    pub description: String,
    #[serde(default)]
    pub heading: Option<bool>,
}

/// Request to link one existing ingredient to one existing step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStepLinkRequest {
    /// Persistent ingredient identifier; placeholders are not accepted here
    pub ingredient_id: String,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default)]
    pub highlight_start: i32,
    #[serde(default)]
    pub highlight_end: i32,
}
