// ABOUTME: Recipe aggregate root owning ordered ingredient and step collections
// ABOUTME: Collections are private; accessors fix back-references and centralize invariants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::requests::UpdateRecipeRequest;
use super::{Ingredient, Step};

/// Recipe aggregate root.
///
/// The ingredient and step collections are only reachable through the
/// add/clear accessors so child back-references and orphan-removal stay
/// centralized here instead of being duplicated in each reconciler.
/// Cascading delete-on-replace is a documented contract of the save
/// path: rows absent from the rebuilt collections are deleted within the
/// same transaction (see `services::recipes::RecipeService::update_recipe`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier
    pub id: Uuid,
    /// Owning subject; every lookup is scoped by it
    pub subject: String,
    /// URL slug, unique per subject
    pub slug: String,
    /// Recipe title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Free-text servings ("4", "one 9-inch cake", ...)
    pub servings: Option<String>,
    /// URL the recipe was imported from, if any
    pub original_url: Option<String>,
    /// Creation timestamp
    pub added: DateTime<Utc>,
    /// Last modification timestamp
    pub modified: Option<DateTime<Utc>>,
    /// When the user last cooked this recipe
    pub last_made: Option<DateTime<Utc>>,
    /// Preparation time in minutes
    pub prep_time: Option<i32>,
    /// Cooking time in minutes
    pub cook_time: Option<i32>,
    /// Resting time in minutes
    pub rest_time: Option<i32>,
    /// Free-text note
    pub note: String,
    /// Whether the user liked the recipe
    pub liked: bool,
    #[serde(rename = "ingredients")]
    ingredients: Vec<Ingredient>,
    #[serde(rename = "steps")]
    steps: Vec<Step>,
}

impl Recipe {
    /// Construct a recipe with empty collections
    #[must_use]
    pub fn new(id: Uuid, subject: String, slug: String, title: String) -> Self {
        Self {
            id,
            subject,
            slug,
            title,
            description: None,
            servings: None,
            original_url: None,
            added: Utc::now(),
            modified: None,
            last_made: None,
            prep_time: None,
            cook_time: None,
            rest_time: None,
            note: String::new(),
            liked: false,
            ingredients: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Sum of prep, cook, and rest time in minutes
    #[must_use]
    pub fn total_time(&self) -> i32 {
        self.prep_time.unwrap_or(0) + self.cook_time.unwrap_or(0) + self.rest_time.unwrap_or(0)
    }

    /// Apply scalar field updates from a full-recipe update request.
    ///
    /// The request is the complete desired state, so every scalar is
    /// overwritten unconditionally: a field absent from the request
    /// clears the stored value. This mirrors the full-replace contract
    /// of the collections; the ignore-absent partial-update policy
    /// applies to ingredients only.
    pub fn apply_update(&mut self, request: &UpdateRecipeRequest) {
        self.title.clone_from(&request.title);
        self.description.clone_from(&request.description);
        self.servings.clone_from(&request.servings);
        self.original_url.clone_from(&request.original_url);
        self.prep_time = request.prep_time;
        self.cook_time = request.cook_time;
        self.rest_time = request.rest_time;
        self.note = request.note.clone().unwrap_or_default();
        self.liked = request.liked;
    }

    /// The ordered ingredient list, read-only
    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// The ordered step list, read-only
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Append an ingredient, fixing its back-reference to this recipe.
    ///
    /// Returns the attached record so callers can persist exactly what
    /// the aggregate now holds.
    pub fn add_ingredient(&mut self, mut ingredient: Ingredient) -> &Ingredient {
        ingredient.recipe_id = self.id;
        self.ingredients.push(ingredient);
        // index valid: just pushed
        &self.ingredients[self.ingredients.len() - 1]
    }

    /// Append a step, fixing its back-reference to this recipe
    pub fn add_step(&mut self, mut step: Step) -> &Step {
        step.recipe_id = self.id;
        self.steps.push(step);
        &self.steps[self.steps.len() - 1]
    }

    /// Detach every ingredient. Deletion of rows no longer referenced is
    /// cascaded by the save path, not performed here.
    pub fn clear_ingredients(&mut self) {
        self.ingredients.clear();
    }

    /// Detach every step
    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }

    /// Append a link to one of this recipe's steps, fixing the link's
    /// back-reference. Returns `None` when the step does not belong to
    /// this recipe.
    pub fn add_step_link(&mut self, step_id: Uuid, link: super::StepIngredient) -> Option<&Step> {
        let step = self.steps.iter_mut().find(|s| s.id == step_id)?;
        step.add_linked_ingredient(link);
        Some(step)
    }

    /// Find an ingredient of this recipe by persistent identity
    #[must_use]
    pub fn find_ingredient(&self, id: Uuid) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    /// Find a step of this recipe by persistent identity
    #[must_use]
    pub fn find_step(&self, id: Uuid) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }
}
