// ABOUTME: Ingredient model with parsed quantity fields and measurement systems
// ABOUTME: Draft construction and partial-update application for reconciliation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::requests::IngredientDraft;

/// Measurement system an ingredient quantity was expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSystem {
    /// Metric units (g, ml, ...)
    #[default]
    Metric,
    /// Imperial / US customary units (oz, cups, ...)
    Imperial,
}

impl MeasurementSystem {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "imperial" => Self::Imperial,
            _ => Self::Metric,
        }
    }
}

/// A single ingredient line of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Unique identifier, immutable once assigned
    pub id: Uuid,
    /// Owning recipe
    pub recipe_id: Uuid,
    /// Free-text note as entered by the user
    pub notes: String,
    /// Whether this entry is a section heading rather than an ingredient
    pub heading: bool,
    /// Ingredient name extracted by the parser, if any
    pub parsed_ingredient: Option<String>,
    /// Parsed amount in the system the user entered
    pub parsed_original_amount: Option<f64>,
    /// Parsed unit in the system the user entered
    pub parsed_original_unit: Option<String>,
    /// Measurement system the user entered
    pub original_measurement_system: Option<MeasurementSystem>,
    /// Amount converted to the other measurement system
    pub parsed_converted_amount: Option<f64>,
    /// Unit converted to the other measurement system
    pub parsed_converted_unit: Option<String>,
    /// Measurement system of the converted quantity
    pub converted_measurement_system: Option<MeasurementSystem>,
    /// Dense 0-based position within the recipe's ingredient list
    pub order_idx: i32,
}

impl Ingredient {
    /// Construct a brand-new ingredient from a desired-state entry.
    ///
    /// `recipe_id` and `order_idx` are placeholders until the aggregate
    /// attaches the record and the reconciler renumbers it.
    #[must_use]
    pub fn from_draft(id: Uuid, draft: &IngredientDraft) -> Self {
        Self {
            id,
            recipe_id: Uuid::nil(),
            notes: draft.notes.clone(),
            heading: draft.heading.unwrap_or(false),
            parsed_ingredient: draft.parsed_ingredient.clone(),
            parsed_original_amount: draft.parsed_original_amount,
            parsed_original_unit: draft.parsed_original_unit.clone(),
            original_measurement_system: draft.original_measurement_system,
            parsed_converted_amount: draft.parsed_converted_amount,
            parsed_converted_unit: draft.parsed_converted_unit.clone(),
            converted_measurement_system: draft.converted_measurement_system,
            order_idx: 0,
        }
    }

    /// Apply a desired-state entry onto an existing record in place.
    ///
    /// Partial-update semantics: fields absent from the draft leave the
    /// persisted value untouched (ignore-null-on-update). `notes` is
    /// required on the wire and always overwrites.
    pub fn apply_update(&mut self, draft: &IngredientDraft) {
        self.notes.clone_from(&draft.notes);
        if let Some(heading) = draft.heading {
            self.heading = heading;
        }
        if let Some(parsed) = &draft.parsed_ingredient {
            self.parsed_ingredient = Some(parsed.clone());
        }
        if let Some(amount) = draft.parsed_original_amount {
            self.parsed_original_amount = Some(amount);
        }
        if let Some(unit) = &draft.parsed_original_unit {
            self.parsed_original_unit = Some(unit.clone());
        }
        if let Some(system) = draft.original_measurement_system {
            self.original_measurement_system = Some(system);
        }
        if let Some(amount) = draft.parsed_converted_amount {
            self.parsed_converted_amount = Some(amount);
        }
        if let Some(unit) = &draft.parsed_converted_unit {
            self.parsed_converted_unit = Some(unit.clone());
        }
        if let Some(system) = draft.converted_measurement_system {
            self.converted_measurement_system = Some(system);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(notes: &str) -> IngredientDraft {
        IngredientDraft {
            id: "tmp".into(),
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

    #[test]
    fn test_apply_update_ignores_absent_fields() {
        let mut ingredient = Ingredient::from_draft(Uuid::now_v7(), &draft("flour"));
        ingredient.parsed_original_amount = Some(500.0);
        ingredient.parsed_original_unit = Some("g".into());
        ingredient.original_measurement_system = Some(MeasurementSystem::Metric);

        ingredient.apply_update(&draft("flour, sifted"));

        assert_eq!(ingredient.notes, "flour, sifted");
        assert_eq!(ingredient.parsed_original_amount, Some(500.0));
        assert_eq!(ingredient.parsed_original_unit.as_deref(), Some("g"));
        assert_eq!(
            ingredient.original_measurement_system,
            Some(MeasurementSystem::Metric)
        );
    }

    #[test]
    fn test_apply_update_overwrites_present_fields() {
        let mut ingredient = Ingredient::from_draft(Uuid::now_v7(), &draft("sugar"));
        ingredient.parsed_original_amount = Some(100.0);

        let mut update = draft("sugar");
        update.parsed_original_amount = Some(250.0);
        update.original_measurement_system = Some(MeasurementSystem::Imperial);
        ingredient.apply_update(&update);

        assert_eq!(ingredient.parsed_original_amount, Some(250.0));
        assert_eq!(
            ingredient.original_measurement_system,
            Some(MeasurementSystem::Imperial)
        );
    }

    #[test]
    fn test_measurement_system_roundtrip() {
        assert_eq!(MeasurementSystem::parse("imperial"), MeasurementSystem::Imperial);
        assert_eq!(MeasurementSystem::parse("metric"), MeasurementSystem::Metric);
        assert_eq!(MeasurementSystem::parse("unknown"), MeasurementSystem::Metric);
        assert_eq!(MeasurementSystem::Imperial.as_str(), "imperial");
    }
}
