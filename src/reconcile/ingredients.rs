// ABOUTME: Ingredient pass of the full-recipe reconciliation
// ABOUTME: Upsert-or-create per entry, dense renumbering, placeholder mapping emission
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

use sqlx::SqliteConnection;
use tracing::debug;

use crate::database::ingredients as ingredients_db;
use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, IngredientDraft, Recipe};

use super::identity::{ClientIdentifier, Resolution};
use super::{identity, IngredientIdMap};

/// Replace the recipe's ingredient list with the desired state.
///
/// For each entry, in list order: resolve the client identifier, apply
/// a partial update onto the existing record or construct a new one
/// under a minted identity, renumber, record the client→persistent
/// mapping, attach to the aggregate, and persist. The completed
/// [`IngredientIdMap`] is returned for the step pass.
///
/// # Errors
///
/// Returns `STALE_REFERENCE` when an entry's id parses as a persistent
/// identifier but matches no record; database errors propagate. Either
/// way the enclosing transaction rolls back the partial pass.
pub async fn reconcile_ingredients(
    conn: &mut SqliteConnection,
    recipe: &mut Recipe,
    desired: &[IngredientDraft],
) -> AppResult<IngredientIdMap> {
    let mut mapping = IngredientIdMap::new();

    recipe.clear_ingredients();

    for (order_idx, draft) in desired.iter().enumerate() {
        let resolution = match ClientIdentifier::parse(&draft.id) {
            ClientIdentifier::Persistent(id) => {
                match ingredients_db::find_by_id(&mut *conn, id).await? {
                    Some(existing) => Resolution::Existing(existing),
                    None => return Err(AppError::stale_reference("ingredient", &draft.id)),
                }
            }
            ClientIdentifier::Placeholder => Resolution::Create(identity::mint_id()),
        };

        let mut ingredient = match resolution {
            Resolution::Existing(mut existing) => {
                existing.apply_update(draft);
                existing
            }
            Resolution::Create(minted_id) => Ingredient::from_draft(minted_id, draft),
        };

        // List position is the sole source of truth for order
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        {
            ingredient.order_idx = order_idx as i32;
        }

        mapping.insert(draft.id.clone(), ingredient.id);

        let attached = recipe.add_ingredient(ingredient);
        ingredients_db::upsert(&mut *conn, attached).await?;
    }

    debug!(
        count = desired.len(),
        mapped = mapping.len(),
        "ingredient pass complete"
    );

    Ok(mapping)
}
