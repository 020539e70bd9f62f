// ABOUTME: Step model with its owned collection of step-ingredient links
// ABOUTME: Links carry a highlight flag and a character range into the description
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::requests::StepDraft;

/// A link binding one step to one ingredient of the same recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepIngredient {
    /// Unique identifier; links are rebuilt in full, so ids are minted per reconciliation
    pub id: Uuid,
    /// Owning step
    pub step_id: Uuid,
    /// Referenced ingredient, always within the same recipe
    pub ingredient_id: Uuid,
    /// Whether the referenced text is highlighted in the UI
    pub highlight: bool,
    /// Start of the highlighted character range in the step description
    pub highlight_start: i32,
    /// End of the highlighted character range in the step description
    pub highlight_end: i32,
}

/// A single instruction step of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique identifier, immutable once assigned
    pub id: Uuid,
    /// Owning recipe
    pub recipe_id: Uuid,
    /// Instruction text
    pub description: String,
    /// Whether this entry is a section heading rather than an instruction
    pub heading: bool,
    /// Dense 0-based position within the recipe's step list
    pub order_idx: i32,
    /// Links to ingredients used in this step; mutate through the accessors
    #[serde(rename = "linkedIngredients")]
    linked_ingredients: Vec<StepIngredient>,
}

impl Step {
    /// Construct a step from scalar fields with an empty link collection
    #[must_use]
    pub fn new(id: Uuid, recipe_id: Uuid, description: String, heading: bool, order_idx: i32) -> Self {
        Self {
            id,
            recipe_id,
            description,
            heading,
            order_idx,
            linked_ingredients: Vec::new(),
        }
    }

    /// Construct a brand-new step from a desired-state entry.
    ///
    /// Links are not constructed here; the step reconciler rebuilds them
    /// from the placeholder mapping after the step identity is settled.
    #[must_use]
    pub fn from_draft(id: Uuid, draft: &StepDraft) -> Self {
        Self::new(id, Uuid::nil(), draft.description.clone(), draft.heading.unwrap_or(false), 0)
    }

    /// Apply a desired-state entry onto an existing record in place.
    pub fn apply_update(&mut self, draft: &StepDraft) {
        self.description.clone_from(&draft.description);
        if let Some(heading) = draft.heading {
            self.heading = heading;
        }
    }

    /// The step's link collection, read-only
    #[must_use]
    pub fn linked_ingredients(&self) -> &[StepIngredient] {
        &self.linked_ingredients
    }

    /// Append a link, fixing its back-reference to this step
    pub fn add_linked_ingredient(&mut self, mut link: StepIngredient) {
        link.step_id = self.id;
        self.linked_ingredients.push(link);
    }

    /// Drop every link; reconciliation always rebuilds the full set
    pub fn clear_linked_ingredients(&mut self) {
        self.linked_ingredients.clear();
    }
}
