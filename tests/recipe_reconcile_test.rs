// ABOUTME: Integration tests for the full-recipe reconciliation flow
// ABOUTME: Covers placeholder resolution, ordering, link rebuild, orphan removal, and rollback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Two Small Onions

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use recipe_api::{
    errors::ErrorCode,
    models::{IngredientDraft, StepDraft, UpdateRecipeRequest},
    services::RecipeService,
};
use uuid::Uuid;

use common::{
    create_test_database, ingredient_draft, seed_recipe, step_draft, step_draft_with_links,
    TEST_SUBJECT,
};

fn update_request(
    title: &str,
    ingredients: Vec<IngredientDraft>,
    steps: Vec<StepDraft>,
) -> UpdateRecipeRequest {
    UpdateRecipeRequest {
        title: title.into(),
        description: None,
        servings: None,
        original_url: None,
        prep_time: None,
        cook_time: None,
        rest_time: None,
        note: None,
        liked: false,
        ingredients,
        steps,
    }
}

#[tokio::test]
async fn test_placeholders_become_persistent_identities() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Pancakes").await.unwrap();

    let request = update_request(
        "Pancakes",
        vec![
            ingredient_draft("tmp-flour", "200g flour"),
            ingredient_draft("tmp-sugar", "50g sugar"),
        ],
        vec![step_draft_with_links(
            "tmp-mix",
            "Mix flour and sugar",
            &["tmp-flour", "tmp-sugar"],
        )],
    );

    let updated = service
        .update_recipe(recipe.id, TEST_SUBJECT, &request)
        .await
        .unwrap();

    assert_eq!(updated.ingredients().len(), 2);
    assert_eq!(updated.steps().len(), 1);

    // Placeholders are gone: every child carries a real persistent identity
    let flour = &updated.ingredients()[0];
    let sugar = &updated.ingredients()[1];
    assert_ne!(flour.id, Uuid::nil());
    assert_ne!(sugar.id, Uuid::nil());
    assert_ne!(flour.id, sugar.id);

    // Both links resolved through the placeholder mapping
    let step = &updated.steps()[0];
    let linked: Vec<Uuid> = step
        .linked_ingredients()
        .iter()
        .map(|l| l.ingredient_id)
        .collect();
    assert!(linked.contains(&flour.id));
    assert!(linked.contains(&sugar.id));

    // And the persisted state matches what was returned
    let fetched = service.get_recipe(recipe.id, TEST_SUBJECT).await.unwrap();
    assert_eq!(fetched.ingredients().len(), 2);
    assert_eq!(fetched.steps()[0].linked_ingredients().len(), 2);
}

#[tokio::test]
async fn test_mixed_persistent_and_placeholder_in_one_request() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Shortbread").await.unwrap();

    // Seed one persisted ingredient and one persisted step linking it
    let first = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Shortbread",
                vec![ingredient_draft("tmp-flour", "flour")],
                vec![step_draft_with_links("tmp-mix", "Mix", &["tmp-flour"])],
            ),
        )
        .await
        .unwrap();
    let flour = first.ingredients()[0].clone();
    let mix = first.steps()[0].clone();

    // One request mixing both identifier kinds: the existing flour under
    // its persistent id with changed notes, a brand-new sugar under a
    // placeholder, and the existing step linking the two
    let second = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Shortbread",
                vec![
                    ingredient_draft(&flour.id.to_string(), "flour, sifted"),
                    ingredient_draft("tmp-sugar", "sugar"),
                ],
                vec![step_draft_with_links(
                    &mix.id.to_string(),
                    "Mix everything",
                    &[&flour.id.to_string(), "tmp-sugar"],
                )],
            ),
        )
        .await
        .unwrap();

    // The existing records kept their identities; the update went through
    assert_eq!(second.ingredients().len(), 2);
    let updated_flour = &second.ingredients()[0];
    let sugar = &second.ingredients()[1];
    assert_eq!(updated_flour.id, flour.id);
    assert_eq!(updated_flour.notes, "flour, sifted");
    assert_ne!(sugar.id, flour.id);
    assert_eq!(sugar.notes, "sugar");
    assert_eq!(updated_flour.order_idx, 0);
    assert_eq!(sugar.order_idx, 1);

    let step = &second.steps()[0];
    assert_eq!(step.id, mix.id);
    assert_eq!(step.description, "Mix everything");
    assert_eq!(step.order_idx, 0);

    // Links resolved through both map paths: persistent key and placeholder
    let linked: Vec<Uuid> = step
        .linked_ingredients()
        .iter()
        .map(|l| l.ingredient_id)
        .collect();
    assert_eq!(linked.len(), 2);
    assert!(linked.contains(&flour.id));
    assert!(linked.contains(&sugar.id));

    let fetched = service.get_recipe(recipe.id, TEST_SUBJECT).await.unwrap();
    assert_eq!(fetched.ingredients()[0].notes, "flour, sifted");
    assert_eq!(fetched.steps()[0].linked_ingredients().len(), 2);
}

#[tokio::test]
async fn test_resubmission_with_persistent_ids_is_stable() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Bread").await.unwrap();

    let first = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Bread",
                vec![ingredient_draft("a", "flour"), ingredient_draft("b", "water")],
                vec![step_draft("s1", "Knead")],
            ),
        )
        .await
        .unwrap();

    // Resubmit the exact state, now using persistent identifiers
    let resubmit = update_request(
        "Bread",
        first
            .ingredients()
            .iter()
            .map(|i| ingredient_draft(&i.id.to_string(), &i.notes))
            .collect(),
        first
            .steps()
            .iter()
            .map(|s| step_draft(&s.id.to_string(), &s.description))
            .collect(),
    );

    let second = service
        .update_recipe(recipe.id, TEST_SUBJECT, &resubmit)
        .await
        .unwrap();

    // Identities survive the round trip, nothing is duplicated
    assert_eq!(second.ingredients().len(), 2);
    assert_eq!(second.steps().len(), 1);
    assert_eq!(second.ingredients()[0].id, first.ingredients()[0].id);
    assert_eq!(second.ingredients()[1].id, first.ingredients()[1].id);
    assert_eq!(second.steps()[0].id, first.steps()[0].id);
}

#[tokio::test]
async fn test_list_position_renumbers_order_indices() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Soup").await.unwrap();

    let first = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Soup",
                vec![
                    ingredient_draft("a", "onion"),
                    ingredient_draft("b", "carrot"),
                    ingredient_draft("c", "celery"),
                ],
                vec![],
            ),
        )
        .await
        .unwrap();

    let order: Vec<i32> = first.ingredients().iter().map(|i| i.order_idx).collect();
    assert_eq!(order, vec![0, 1, 2]);

    // Reverse the list; submitted order wins regardless of stored indices
    let reversed = update_request(
        "Soup",
        first
            .ingredients()
            .iter()
            .rev()
            .map(|i| ingredient_draft(&i.id.to_string(), &i.notes))
            .collect(),
        vec![],
    );

    let second = service
        .update_recipe(recipe.id, TEST_SUBJECT, &reversed)
        .await
        .unwrap();

    let notes: Vec<&str> = second
        .ingredients()
        .iter()
        .map(|i| i.notes.as_str())
        .collect();
    assert_eq!(notes, vec!["celery", "carrot", "onion"]);
    let order: Vec<i32> = second.ingredients().iter().map(|i| i.order_idx).collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_absent_members_are_removed() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Salad").await.unwrap();

    let first = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Salad",
                vec![
                    ingredient_draft("a", "lettuce"),
                    ingredient_draft("b", "tomato"),
                ],
                vec![step_draft("s1", "Chop"), step_draft("s2", "Toss")],
            ),
        )
        .await
        .unwrap();

    // Resubmit keeping only the first ingredient and the second step
    let keep_ingredient = &first.ingredients()[0];
    let keep_step = &first.steps()[1];
    let second = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Salad",
                vec![ingredient_draft(
                    &keep_ingredient.id.to_string(),
                    &keep_ingredient.notes,
                )],
                vec![step_draft(&keep_step.id.to_string(), &keep_step.description)],
            ),
        )
        .await
        .unwrap();

    assert_eq!(second.ingredients().len(), 1);
    assert_eq!(second.ingredients()[0].id, keep_ingredient.id);
    assert_eq!(second.steps().len(), 1);
    assert_eq!(second.steps()[0].id, keep_step.id);
    // The survivor moved to the front of the order
    assert_eq!(second.steps()[0].order_idx, 0);

    let fetched = service.get_recipe(recipe.id, TEST_SUBJECT).await.unwrap();
    assert_eq!(fetched.ingredients().len(), 1);
    assert_eq!(fetched.steps().len(), 1);
}

#[tokio::test]
async fn test_empty_lists_clear_the_recipe() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Toast").await.unwrap();

    service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Toast",
                vec![ingredient_draft("a", "bread")],
                vec![step_draft("s1", "Toast it")],
            ),
        )
        .await
        .unwrap();

    let cleared = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request("Toast", vec![], vec![]),
        )
        .await
        .unwrap();

    assert!(cleared.ingredients().is_empty());
    assert!(cleared.steps().is_empty());
}

#[tokio::test]
async fn test_dangling_link_rejected_and_rolled_back() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Stew").await.unwrap();

    let first = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Stew",
                vec![ingredient_draft("a", "beef")],
                vec![step_draft("s1", "Brown the beef")],
            ),
        )
        .await
        .unwrap();

    // A link naming an identifier never declared in the ingredient list
    let bad = update_request(
        "Stew renamed",
        vec![ingredient_draft("a2", "beef")],
        vec![step_draft_with_links("s2", "Brown", &["never-declared"])],
    );

    let err = service
        .update_recipe(recipe.id, TEST_SUBJECT, &bad)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DanglingLinkReference);
    assert_eq!(err.http_status(), 400);

    // The whole edit rolled back: prior state is untouched
    let fetched = service.get_recipe(recipe.id, TEST_SUBJECT).await.unwrap();
    assert_eq!(fetched.title, "Stew");
    assert_eq!(fetched.ingredients().len(), 1);
    assert_eq!(fetched.ingredients()[0].id, first.ingredients()[0].id);
    assert_eq!(fetched.steps().len(), 1);
    assert_eq!(fetched.steps()[0].id, first.steps()[0].id);
}

#[tokio::test]
async fn test_stale_ingredient_reference_rejected() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Curry").await.unwrap();

    // Parses as a persistent identity but matches no record
    let ghost = Uuid::now_v7();
    let err = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Curry",
                vec![ingredient_draft(&ghost.to_string(), "ghost")],
                vec![],
            ),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::StaleReference);
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn test_stale_step_reference_rejected() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Curry").await.unwrap();

    let ghost = Uuid::now_v7();
    let err = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request("Curry", vec![], vec![step_draft(&ghost.to_string(), "??")]),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::StaleReference);
}

#[tokio::test]
async fn test_step_may_link_any_placeholder_in_the_request() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Cake").await.unwrap();

    // The first step links the last ingredient; resolution happens after
    // the whole ingredient pass, so declaration order within the list is
    // irrelevant
    let updated = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Cake",
                vec![
                    ingredient_draft("first", "flour"),
                    ingredient_draft("last", "eggs"),
                ],
                vec![step_draft_with_links("s1", "Crack the eggs", &["last"])],
            ),
        )
        .await
        .unwrap();

    let eggs = updated
        .ingredients()
        .iter()
        .find(|i| i.notes == "eggs")
        .unwrap();
    assert_eq!(
        updated.steps()[0].linked_ingredients()[0].ingredient_id,
        eggs.id
    );
}

#[tokio::test]
async fn test_links_are_rebuilt_not_merged() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Pasta").await.unwrap();

    let first = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Pasta",
                vec![
                    ingredient_draft("a", "pasta"),
                    ingredient_draft("b", "garlic"),
                ],
                vec![step_draft_with_links("s1", "Combine", &["a", "b"])],
            ),
        )
        .await
        .unwrap();

    // Resubmit the step with a single link; the old pair must not survive
    let pasta = &first.ingredients()[0];
    let step = &first.steps()[0];
    let second = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request(
                "Pasta",
                first
                    .ingredients()
                    .iter()
                    .map(|i| ingredient_draft(&i.id.to_string(), &i.notes))
                    .collect(),
                vec![step_draft_with_links(
                    &step.id.to_string(),
                    &step.description,
                    &[&pasta.id.to_string()],
                )],
            ),
        )
        .await
        .unwrap();

    let links = second.steps()[0].linked_ingredients();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].ingredient_id, pasta.id);

    let fetched = service.get_recipe(recipe.id, TEST_SUBJECT).await.unwrap();
    assert_eq!(fetched.steps()[0].linked_ingredients().len(), 1);
}

#[tokio::test]
async fn test_update_sets_modified_timestamp() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Tea").await.unwrap();
    assert!(recipe.modified.is_none());

    let updated = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request("Tea", vec![], vec![]),
        )
        .await
        .unwrap();
    assert!(updated.modified.is_some());
}

#[tokio::test]
async fn test_oversized_list_rejected_before_touching_state() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Big").await.unwrap();

    let ingredients: Vec<IngredientDraft> = (0..=500)
        .map(|i| ingredient_draft(&format!("tmp-{i}"), "x"))
        .collect();

    let err = service
        .update_recipe(
            recipe.id,
            TEST_SUBJECT,
            &update_request("Big", ingredients, vec![]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let fetched = service.get_recipe(recipe.id, TEST_SUBJECT).await.unwrap();
    assert!(fetched.ingredients().is_empty());
}

#[tokio::test]
async fn test_update_requires_matching_subject() {
    let db = create_test_database().await.unwrap();
    let service = RecipeService::new(db);
    let recipe = seed_recipe(&service, "Private").await.unwrap();

    let err = service
        .update_recipe(
            recipe.id,
            common::OTHER_SUBJECT,
            &update_request("Hijacked", vec![], vec![]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let fetched = service.get_recipe(recipe.id, TEST_SUBJECT).await.unwrap();
    assert_eq!(fetched.title, "Private");
}
