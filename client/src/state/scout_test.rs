use super::*;

fn result(id: &str) -> ScoutResult {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "address": format!("{id} Desert Way"),
        "distress_signals": ["vacant"]
    }))
    .unwrap()
}

#[test]
fn default_slice_is_empty() {
    let state = ScoutState::default();
    assert!(state.query.is_empty());
    assert!(state.results.is_empty());
    assert!(!state.loading);
    assert!(state.bounds.is_none());
    assert!(state.selected_ids.is_empty());
    assert_eq!(state.generation(), 0);
}

#[test]
fn apply_touches_only_patched_fields() {
    let mut state = ScoutState::default();
    state.apply(ScoutPatch::default().query("casa grande"));
    state.apply(ScoutPatch::default().highlight(Some(LeadId::from("7"))));

    assert_eq!(state.query, "casa grande");
    assert_eq!(state.highlighted_lead_id, Some(LeadId::from("7")));
    assert!(state.pan_target_id.is_none());
}

#[test]
fn apply_can_clear_nullable_fields() {
    let bounds = MapBounds { north: 33.9, south: 32.8, east: -111.2, west: -112.4 };
    let mut state = ScoutState::default();
    state.apply(ScoutPatch::default().bounds(Some(bounds)).pan_to(Some(LeadId::from("3"))));
    assert_eq!(state.bounds, Some(bounds));

    state.apply(ScoutPatch::default().bounds(None).pan_to(None));
    assert!(state.bounds.is_none());
    assert!(state.pan_target_id.is_none());
}

#[test]
fn reset_restores_initial_shape_and_advances_generation() {
    let mut state = ScoutState::default();
    state.apply(ScoutPatch {
        query: Some("pinal".into()),
        results: Some(vec![result("1")]),
        loading: Some(true),
        ..ScoutPatch::default()
    });
    state.toggle_selected(LeadId::from("1"));

    state.reset();

    assert_eq!(state.generation(), 1);
    assert_eq!(state, ScoutState { generation: 1, ..ScoutState::default() });
}

#[test]
fn toggle_selected_flips_membership() {
    let mut state = ScoutState::default();
    state.toggle_selected(LeadId::from("4"));
    assert!(state.selected_ids.contains(&LeadId::from("4")));
    state.toggle_selected(LeadId::from("4"));
    assert!(state.selected_ids.is_empty());
}

#[test]
fn selected_results_follow_result_order() {
    let mut state = ScoutState::default();
    state.apply(ScoutPatch { results: Some(vec![result("1"), result("2"), result("3")]), ..ScoutPatch::default() });
    state.toggle_selected(LeadId::from("3"));
    state.toggle_selected(LeadId::from("1"));
    state.toggle_selected(LeadId::from("99"));

    let ids: Vec<&str> = state.selected_results().map(|r| r.id().as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert!(state.result(&LeadId::from("2")).is_some());
    assert!(state.result(&LeadId::from("99")).is_none());
}

#[test]
fn loading_clears_only_after_every_pending_search_settles() {
    let mut state = ScoutState::default();
    assert_eq!(state.begin_search(), 0);
    state.begin_search();
    state.finish_search(Some(vec![result("1")]));
    assert!(state.loading);

    state.finish_search(None);
    assert!(!state.loading);
    assert_eq!(state.results.len(), 1);
}
