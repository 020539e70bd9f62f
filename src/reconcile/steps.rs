// ABOUTME: Step pass of the full-recipe reconciliation
// ABOUTME: Create-or-update loop plus full rebuild of every step's link collection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use sqlx::SqliteConnection;
use tracing::debug;

use crate::database::steps as steps_db;
use crate::errors::{AppError, AppResult};
use crate::models::{Recipe, Step, StepDraft, StepIngredient, StepLinkDraft};

use super::identity::{ClientIdentifier, Resolution};
use super::{identity, IngredientIdMap};

/// Replace the recipe's step list with the desired state, rebuilding
/// every step's link collection through the placeholder mapping.
///
/// Structurally the same create-or-update loop as the ingredient pass;
/// after each step's identity is settled, its links are destroyed and
/// rebuilt in full — no partial link update exists.
///
/// # Errors
///
/// - `STALE_REFERENCE` when a step id parses as persistent but matches
///   no record
/// - `DANGLING_LINK_REFERENCE` when a link references an ingredient the
///   request never declared (including forward references to
///   ingredients the client forgot to include)
/// - `INTERNAL_CONSISTENCY` when the mapping resolves to an identity
///   absent from the just-rebuilt ingredient list (a reconciler bug,
///   not a client mistake)
pub async fn reconcile_steps(
    conn: &mut SqliteConnection,
    recipe: &mut Recipe,
    desired: &[StepDraft],
    mapping: &IngredientIdMap,
) -> AppResult<()> {
    recipe.clear_steps();

    for (order_idx, draft) in desired.iter().enumerate() {
        let resolution = match ClientIdentifier::parse(&draft.id) {
            ClientIdentifier::Persistent(id) => match steps_db::find_by_id(&mut *conn, id).await? {
                Some(existing) => Resolution::Existing(existing),
                None => return Err(AppError::stale_reference("step", &draft.id)),
            },
            ClientIdentifier::Placeholder => Resolution::Create(identity::mint_id()),
        };

        let mut step = match resolution {
            Resolution::Existing(mut existing) => {
                existing.apply_update(draft);
                existing
            }
            Resolution::Create(minted_id) => Step::from_draft(minted_id, draft),
        };

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        {
            step.order_idx = order_idx as i32;
        }

        // Full replace: the previous link set is gone regardless of the
        // desired state's content
        step.clear_linked_ingredients();
        for link_draft in &draft.linked_ingredients {
            let link = resolve_link(recipe, mapping, link_draft)?;
            step.add_linked_ingredient(link);
        }

        let attached = recipe.add_step(step);
        steps_db::upsert(&mut *conn, attached).await?;
        for link in attached.linked_ingredients() {
            steps_db::insert_link(&mut *conn, link).await?;
        }
    }

    debug!(count = desired.len(), "step pass complete");

    Ok(())
}

/// Resolve one desired link against the mapping and the rebuilt
/// ingredient list, minting a fresh link identity.
fn resolve_link(
    recipe: &Recipe,
    mapping: &IngredientIdMap,
    draft: &StepLinkDraft,
) -> AppResult<StepIngredient> {
    let Some(persistent_id) = mapping.resolve(&draft.ingredient_id) else {
        return Err(AppError::dangling_link(&draft.ingredient_id));
    };

    let Some(ingredient) = recipe.find_ingredient(persistent_id) else {
        return Err(AppError::internal_consistency(persistent_id));
    };

    Ok(StepIngredient {
        id: identity::mint_id(),
        step_id: uuid::Uuid::nil(),
        ingredient_id: ingredient.id,
        highlight: draft.highlight,
        highlight_start: draft.highlight_start,
        highlight_end: draft.highlight_end,
    })
}
