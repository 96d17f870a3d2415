use super::*;

#[test]
fn defaults_match_search_bar_initial_state() {
    let filters = SearchFilters::default();
    assert_eq!(filters.county, County::Maricopa);
    assert_eq!(filters.distress_type, DistressType::All);
    assert!(filters.property_types.is_empty());
    assert_eq!(filters.limit, ResultLimit::L50);
    assert!(filters.query.is_empty());
}

#[test]
fn merge_county_leaves_other_fields_unchanged() {
    let mut filters = SearchFilters::default();
    filters.merge(SearchFiltersPatch::default().query("mesa").property_types(["sfr"]));
    let before = filters.clone();

    filters.merge(SearchFiltersPatch::default().county(County::Pinal));

    assert_eq!(filters.county, County::Pinal);
    assert_eq!(filters.query, before.query);
    assert_eq!(filters.property_types, before.property_types);
    assert_eq!(filters.distress_type, before.distress_type);
    assert_eq!(filters.limit, before.limit);
}

#[test]
fn merge_is_idempotent() {
    let patch = SearchFiltersPatch::default().county(County::Pinal).limit(ResultLimit::L100);
    let mut once = SearchFilters::default();
    once.merge(patch.clone());
    let mut twice = once.clone();
    twice.merge(patch);
    assert_eq!(once, twice);
}

#[test]
fn merge_replaces_property_types_wholesale() {
    let mut filters = SearchFilters::default();
    filters.merge(SearchFiltersPatch::default().property_types(["sfr", "condo"]));
    filters.merge(SearchFiltersPatch::default().property_types(["land"]));
    assert_eq!(filters.property_types.into_iter().collect::<Vec<_>>(), vec!["land".to_owned()]);
}

#[test]
fn empty_patch_is_a_no_op() {
    let patch = SearchFiltersPatch::default();
    assert!(patch.is_empty());
    let mut filters = SearchFilters::default();
    filters.merge(patch);
    assert_eq!(filters, SearchFilters::default());
}

#[test]
fn market_query_uses_trimmed_query_as_city() {
    let mut filters = SearchFilters::default();
    assert_eq!(filters.market_query(), MarketQuery { county: County::Maricopa, city: None });

    filters.merge(SearchFiltersPatch::default().county(County::Pima).query("  Tucson "));
    assert_eq!(filters.market_query(), MarketQuery { county: County::Pima, city: Some("Tucson".into()) });
}
