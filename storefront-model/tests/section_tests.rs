use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use storefront_model::{
    NormalizationError, NormalizationErrorKind, RawSection, RawSectionInput, RawSectionPatch,
    Section, SectionContent, SectionId, SectionInput, SectionPatch, SectionType, normalize,
    reorder_sections, sort_by_order,
};

fn banner(image: &str) -> SectionContent {
    normalize(SectionType::Banner, &json!([{ "imageUrl": image }])).unwrap()
}

fn section(id: &str, order: i64) -> Section {
    Section::new(id, order, format!("Section {id}"), SectionContent::empty(SectionType::Custom))
}

fn ids(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.id.as_str()).collect()
}

// ── Wire form ────────────────────────────────────────────────────

#[test]
fn section_deserializes_with_normalized_content() {
    let wire = json!({
        "id": "sec_1",
        "order": 2,
        "title": "Hero",
        "type": "banner",
        "content": "{\"image\":\"/hero.jpg\"}",
        "active": false
    });
    let section: Section = serde_json::from_value(wire).unwrap();
    assert_eq!(section.id, SectionId::new("sec_1"));
    assert_eq!(section.order, 2);
    assert!(!section.active);
    assert_eq!(section.section_type(), SectionType::Banner);
    assert_eq!(section.content, banner("/hero.jpg"));
}

#[test]
fn section_serializes_canonical_wire_form() {
    let section = Section::new("sec_1", 0, "Hero", banner("/hero.jpg"));
    assert_eq!(
        serde_json::to_value(&section).unwrap(),
        json!({
            "id": "sec_1",
            "order": 0,
            "title": "Hero",
            "type": "banner",
            "content": {"slides": [{"imageUrl": "/hero.jpg"}]},
            "active": true
        })
    );
}

#[test]
fn section_accepts_numeric_and_underscore_ids() {
    let numeric: RawSection =
        serde_json::from_value(json!({"id": 17, "type": "custom", "content": {}})).unwrap();
    assert_eq!(numeric.id.as_str(), "17");
    assert!(numeric.active);
    assert_eq!(numeric.order, 0);

    let underscore: RawSection =
        serde_json::from_value(json!({"_id": "abc", "type": "custom"})).unwrap();
    assert_eq!(underscore.id.as_str(), "abc");
    assert_eq!(underscore.content, Value::Null);
}

#[test]
fn section_with_unknown_type_fails_to_deserialize() {
    let wire = json!({"id": "x", "type": "hero", "content": {}});
    let err = serde_json::from_value::<Section>(wire).unwrap_err();
    assert!(err.to_string().contains("unknown section type"));
}

#[test]
fn raw_section_reports_normalization_error() {
    let raw: RawSection = serde_json::from_value(json!({
        "id": "x",
        "type": "products",
        "content": "[1, {\"id\": 2}]"
    }))
    .unwrap();
    let err = raw.normalize().unwrap_err();
    assert_eq!(err.kind(), NormalizationErrorKind::InvalidEntry);
    assert_eq!(err.index(), Some(1));
}

#[test]
fn section_list_round_trips_through_cache_form() {
    let sections = vec![
        Section::new("a", 0, "A", banner("blob:tmp")),
        Section::new(
            "b",
            1,
            "B",
            normalize(SectionType::Products, &json!([1, "two"])).unwrap(),
        ),
    ];
    let text = serde_json::to_string(&sections).unwrap();
    let back: Vec<Section> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, sections);
}

// ── Create input ─────────────────────────────────────────────────

#[test]
fn input_normalizes_content() {
    let raw = RawSectionInput::new(
        SectionType::Categories,
        "Shop by category",
        json!("[{\"name\":\"Rings\"}]"),
    )
    .with_order(4);
    let input = raw.normalize().unwrap();
    assert_eq!(input.order, Some(4));
    assert_eq!(input.section_type(), SectionType::Categories);
    assert_eq!(
        input.content.to_value(),
        json!({"categories": [{"name": "Rings"}]})
    );

    let section = input.into_section(SectionId::new("sec_9"), 4);
    assert_eq!(section.id.as_str(), "sec_9");
    assert!(section.active);
}

#[test]
fn input_wire_form_has_no_order_when_unset() {
    let input = RawSectionInput::new(SectionType::Custom, "Note", json!({"html": "<b>hi</b>"}))
        .normalize()
        .unwrap();
    assert_eq!(
        serde_json::to_value(&input).unwrap(),
        json!({
            "title": "Note",
            "type": "custom",
            "content": {"html": "<b>hi</b>"},
            "active": true
        })
    );
}

#[test]
fn input_deserialize_rejects_bad_content() {
    let err = serde_json::from_value::<SectionInput>(json!({
        "title": "Broken",
        "type": "banner",
        "content": [{"title": "no image"}]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("no imageUrl"));
}

// ── Patch ────────────────────────────────────────────────────────

#[test]
fn patch_content_without_type_uses_current_type() {
    let patch = RawSectionPatch::default()
        .with_untyped_content(json!("{\"productIds\":[5]}"))
        .normalize(Some(SectionType::Products))
        .unwrap();
    assert_eq!(patch.content.unwrap().to_value(), json!({"productIds": [5]}));
}

#[test]
fn patch_needs_current_type_only_when_half_typed() {
    assert!(!RawSectionPatch::default().with_title("x").needs_current_type());
    assert!(RawSectionPatch::default().with_untyped_content(json!([1])).needs_current_type());
    assert!(
        !RawSectionPatch::default()
            .with_content(SectionType::Products, json!([1]))
            .needs_current_type()
    );
    let type_only = RawSectionPatch {
        section_type: Some("banner".into()),
        ..Default::default()
    };
    assert!(type_only.needs_current_type());
}

#[test]
fn patch_content_without_any_type_is_missing_type() {
    let err = RawSectionPatch::default()
        .with_untyped_content(json!({}))
        .normalize(None)
        .unwrap_err();
    assert_eq!(err, NormalizationError::MissingType);
}

#[test]
fn patch_type_change_without_content_resets_content() {
    let patch = RawSectionPatch {
        section_type: Some("icon-categories".into()),
        ..Default::default()
    }
    .normalize(Some(SectionType::Banner))
    .unwrap();
    assert_eq!(
        patch.content,
        Some(SectionContent::empty(SectionType::IconCategories))
    );
}

#[test]
fn patch_same_type_without_content_leaves_content() {
    let patch = RawSectionPatch {
        section_type: Some("banner".into()),
        ..Default::default()
    }
    .with_title("Renamed")
    .normalize(Some(SectionType::Banner))
    .unwrap();
    assert_eq!(patch.content, None);
    assert_eq!(patch.title.as_deref(), Some("Renamed"));
}

#[test]
fn patch_serializes_only_present_fields() {
    assert_eq!(
        serde_json::to_value(SectionPatch::active_only(false)).unwrap(),
        json!({"active": false})
    );

    let patch = RawSectionPatch::default()
        .with_content(SectionType::Products, json!([1]))
        .normalize(None)
        .unwrap();
    assert_eq!(
        serde_json::to_value(&patch).unwrap(),
        json!({"type": "products", "content": {"productIds": [1]}})
    );
}

#[test]
fn apply_leaves_absent_fields() {
    let mut section = Section::new("a", 3, "Hero", banner("/a.jpg"));
    section.apply(&SectionPatch::active_only(false));
    assert_eq!(section.title, "Hero");
    assert_eq!(section.order, 3);
    assert!(!section.active);

    section.apply(&SectionPatch {
        title: Some("New".into()),
        content: Some(banner("/b.jpg")),
        ..Default::default()
    });
    assert_eq!(section.title, "New");
    assert_eq!(section.content, banner("/b.jpg"));
    assert!(SectionPatch::default().is_empty());
}

// ── Ordering ─────────────────────────────────────────────────────

#[test]
fn sort_is_stable_on_ties() {
    let mut sections = vec![section("a", 1), section("b", 0), section("c", 1)];
    sort_by_order(&mut sections);
    assert_eq!(ids(&sections), vec!["b", "a", "c"]);
}

#[test]
fn reorder_places_listed_ids_at_their_index() {
    let mut sections = vec![section("a", 0), section("b", 1), section("c", 2)];
    reorder_sections(
        &mut sections,
        &[SectionId::new("c"), SectionId::new("a"), SectionId::new("b")],
    );
    assert_eq!(ids(&sections), vec!["c", "a", "b"]);
    let orders: Vec<i64> = sections.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn reorder_appends_unlisted_sections_in_prior_order() {
    let mut sections = vec![section("a", 0), section("b", 1), section("c", 2), section("d", 3)];
    reorder_sections(&mut sections, &[SectionId::new("c")]);
    assert_eq!(ids(&sections), vec!["c", "a", "b", "d"]);
    let orders: Vec<i64> = sections.iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
}
