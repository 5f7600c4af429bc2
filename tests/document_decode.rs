use probe_render::document::{
    NO_DESCRIPTION, ProbeDocument, UNKNOWN_VERSION, UNTITLED_RESULT, sample_document,
    sample_value,
};

fn decode(raw: &str) -> ProbeDocument {
    ProbeDocument::from_json(raw.as_bytes()).expect("decode")
}

#[test]
fn missing_fields_get_placeholders() {
    let doc = decode(r#"{"results":[{}]}"#);
    assert_eq!(doc.probe_version, UNKNOWN_VERSION);
    assert_eq!(doc.results[0].title, UNTITLED_RESULT);
    assert_eq!(doc.results[0].description, NO_DESCRIPTION);
}

#[test]
fn details_backs_up_description() {
    let doc = decode(
        r#"{"results":[{"title":"t","details":"d"},{"description":"x","details":"d"}]}"#,
    );
    assert_eq!(doc.results[0].description, "d");
    assert_eq!(doc.results[1].description, "x");
}

#[test]
fn empty_strings_fall_back() {
    let doc = decode(
        r#"{"probeVersion":"","results":[{"title":"","description":"","details":"kept"}]}"#,
    );
    assert_eq!(doc.probe_version, UNKNOWN_VERSION);
    assert_eq!(doc.results[0].title, UNTITLED_RESULT);
    assert_eq!(doc.results[0].description, "kept");
}

#[test]
fn odd_shapes_degrade() {
    let doc = decode(r#"{"probeVersion":2,"results":"nope"}"#);
    assert_eq!(doc.probe_version, "2");
    assert!(doc.results.is_empty());

    let doc = decode(r#"{"results":[7, null, {"title":["a"]}]}"#);
    assert_eq!(doc.results.len(), 3);
    assert!(doc.results.iter().all(|r| r.title == UNTITLED_RESULT));
}

#[test]
fn integral_numbers_print_without_fraction() {
    let doc = decode(r#"{"probeVersion":1e2,"results":[{"title":2.50,"description":-3}]}"#);
    assert_eq!(doc.probe_version, "100");
    assert_eq!(doc.results[0].title, "2.5");
    assert_eq!(doc.results[0].description, "-3");

    let doc = decode(r#"{"probeVersion":0,"results":[{"title":0.0}]}"#);
    assert_eq!(doc.probe_version, UNKNOWN_VERSION);
    assert_eq!(doc.results[0].title, UNTITLED_RESULT);
}

#[test]
fn order_is_preserved() {
    let doc = decode(r#"{"results":[{"title":"b"},{"title":"a"},{"title":"b"}]}"#);
    let titles: Vec<_> = doc.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["b", "a", "b"]);
}

#[test]
fn top_level_must_be_object() {
    assert!(ProbeDocument::from_json(b"[1,2]").is_err());
    assert!(ProbeDocument::from_json(b"null").is_err());
    assert!(ProbeDocument::from_json(b"<html>").is_err());
}

#[test]
fn sample_literal_decodes_to_sample_document() {
    let doc = ProbeDocument::from_value(sample_value()).expect("decode");
    assert_eq!(doc, sample_document());
}
