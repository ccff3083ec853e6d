//! End-to-end tests for the capability-resolution pipeline: name
//! resolution, restriction enforcement, parameter validation, ranking, and
//! listing against one provider.

use std::sync::Arc;

use modelcaps::prelude::*;

fn catalogue() -> Vec<ModelCapabilities> {
    vec![
        ModelCapabilities::new(ProviderType::OpenAi, "gpt-5")
            .with_friendly_name("GPT-5")
            .with_alias("fast")
            .with_context_window(400_000)
            .with_function_calling()
            .with_images(20.0)
            .with_temperature_constraint(TemperatureConstraint::range(0.0, 2.0, Some(0.3))),
        ModelCapabilities::new(ProviderType::OpenAi, "o3")
            .with_friendly_name("O3")
            .with_alias("reasoning")
            .with_context_window(200_000)
            .with_extended_thinking(32_000)
            .without_temperature()
            .with_temperature_constraint(TemperatureConstraint::fixed(1.0)),
        ModelCapabilities::new(ProviderType::OpenAi, "gpt-5-mini")
            .with_context_window(400_000),
    ]
}

fn provider() -> CatalogProvider {
    CatalogProvider::builder(ProviderType::OpenAi)
        .models(catalogue())
        .build()
}

fn restricted_provider() -> CatalogProvider {
    // Only o3 is allowed.
    let policy = Arc::new(AllowListPolicy::new().allow(ProviderType::OpenAi, "o3"));
    CatalogProvider::builder(ProviderType::OpenAi)
        .models(catalogue())
        .restriction_policy(policy)
        .build()
}

#[test]
fn canonical_names_resolve_regardless_of_casing() {
    let provider = provider();
    for requested in ["gpt-5", "GPT-5", "Gpt-5"] {
        assert_eq!(provider.resolve_model_name(requested), "gpt-5");
    }
}

#[test]
fn alias_requests_return_the_owning_model() {
    let capabilities = provider().capabilities("FAST").unwrap();
    assert_eq!(capabilities.model_name, "gpt-5");
    assert_eq!(capabilities.friendly_name, "GPT-5");
}

#[test]
fn capability_lookup_is_idempotent() {
    let provider = provider();
    let first = provider.capabilities("reasoning").unwrap();
    let second = provider.capabilities("reasoning").unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_model_errors_reference_the_requested_name() {
    let err = provider().capabilities("gpt-4").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("gpt-4"));
    assert!(message.contains("openai"));
    assert!(matches!(err, ProviderError::UnsupportedModel { .. }));
}

#[test]
fn validate_model_name_is_the_boolean_form_of_the_pipeline() {
    let provider = provider();
    assert!(provider.validate_model_name("fast"));
    assert!(provider.validate_model_name("o3"));
    assert!(!provider.validate_model_name("gpt-4"));

    let restricted = restricted_provider();
    assert!(restricted.validate_model_name("o3"));
    assert!(!restricted.validate_model_name("gpt-5"));
}

#[test]
fn restricted_models_fail_lookup_and_disappear_from_listing() {
    let restricted = restricted_provider();

    let err = restricted.capabilities("gpt-5").unwrap_err();
    assert!(matches!(err, ProviderError::RestrictedModel { .. }));

    let listed = restricted.list_models(&ListModelsOptions::default());
    assert!(!listed.iter().any(|name| name == "gpt-5"));
    assert!(!listed.iter().any(|name| name == "fast"));
    assert_eq!(listed, vec!["o3", "reasoning"]);
}

#[test]
fn restricted_listing_is_a_subset_of_unrestricted_listing() {
    let restricted = restricted_provider();
    let all = restricted.list_models(&ListModelsOptions {
        respect_restrictions: false,
        ..ListModelsOptions::default()
    });
    let allowed = restricted.list_models(&ListModelsOptions::default());
    assert!(allowed.iter().all(|name| all.contains(name)));
    assert!(allowed.len() < all.len());
}

#[test]
fn missing_policy_fails_open() {
    // No restriction policy injected: everything in the catalogue is usable.
    let provider = provider();
    assert!(provider.restriction_policy().is_none());
    assert!(provider.validate_model_name("gpt-5"));
    assert_eq!(
        provider.list_models(&ListModelsOptions::default()).len(),
        provider.list_models(&ListModelsOptions {
            respect_restrictions: false,
            ..ListModelsOptions::default()
        })
        .len()
    );
}

#[test]
fn ranking_is_descending_with_name_tie_break() {
    let provider = provider();
    let ranked = provider.capabilities_by_rank();

    let ranks: Vec<u32> = ranked
        .iter()
        .map(|(_, capabilities)| capabilities.effective_capability_rank())
        .collect();
    assert!(ranks.windows(2).all(|pair| pair[0] >= pair[1]));

    // gpt-5 and o3 share a rank of 50; the name decides.
    let names: Vec<&str> = ranked.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["gpt-5", "o3", "gpt-5-mini"]);
}

#[test]
fn ranked_view_is_cached_until_invalidated() {
    let provider = provider();
    let first = provider.capabilities_by_rank();
    let second = provider.capabilities_by_rank();
    assert!(Arc::ptr_eq(&first, &second));

    provider.invalidate_capability_cache();
    let third = provider.capabilities_by_rank();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(*first, *third);
}

#[test]
fn out_of_range_temperature_is_rejected_with_the_constraint_description() {
    let err = provider().validate_parameters("gpt-5", 3.0).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, ProviderError::InvalidParameter(_)));
    assert!(message.contains("0.0 to 2.0"));
}

#[test]
fn in_range_temperature_passes_validation() {
    let provider = provider();
    assert!(provider.validate_parameters("gpt-5", 0.0).is_ok());
    assert!(provider.validate_parameters("gpt-5", 2.0).is_ok());
    assert!(provider.validate_parameters("fast", 0.7).is_ok());
}

#[test]
fn effective_temperature_clamps_or_omits() {
    let provider = provider();
    assert_eq!(provider.effective_temperature("gpt-5", 5.0).unwrap(), Some(2.0));
    assert_eq!(provider.effective_temperature("gpt-5", 0.7).unwrap(), Some(0.7));
    // o3 does not accept the parameter at all.
    assert_eq!(provider.effective_temperature("o3", 0.7).unwrap(), None);
}

#[test]
fn token_estimation_uses_the_character_heuristic() {
    let provider = provider();
    assert_eq!(provider.count_tokens("", "gpt-5"), 0);
    assert_eq!(provider.count_tokens("abc", "gpt-5"), 1);
    assert_eq!(provider.count_tokens(&"x".repeat(400), "gpt-5"), 100);
}
