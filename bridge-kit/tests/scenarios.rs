use std::sync::Arc;

use bridge_kit::a2ui::*;
use proptest::prelude::*;
use serde_json::json;

fn apply(processor: &mut Processor, message: serde_json::Value) -> Option<Arc<SurfaceSnapshot>> {
    processor.process(Message::from_value(message).unwrap())
}

fn card_with_title(processor: &mut Processor, title: &str) -> Option<Arc<SurfaceSnapshot>> {
    apply(
        processor,
        json!({"surfaceUpdate": {"surfaceId": "@default", "components": [
            {"id": "card", "component": {"Card": {"children": ["title"]}}},
            {"id": "title", "component": {"Text": {"text": {"literalString": title}}}}
        ]}}),
    )
}

fn text_of<'a>(node: &TreeNode<'a>, snapshot: &'a SurfaceSnapshot) -> Option<String> {
    match node.kind() {
        ComponentKind::Text(text) => snapshot.resolve(&text.text).map(|l| l.to_string()),
        _ => None,
    }
}

#[test]
fn card_with_text_renders() {
    let mut processor = Processor::with_standard_catalog();
    apply(
        &mut processor,
        json!({"beginRendering": {"surfaceId": "@default", "root": "card"}}),
    );
    let snapshot = card_with_title(&mut processor, "Hello").unwrap();

    let tree = snapshot.tree().unwrap();
    assert_eq!(tree.kind().type_name(), "Card");
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].kind().type_name(), "Text");
    assert_eq!(text_of(&tree.children[0], &snapshot).as_deref(), Some("Hello"));
}

#[test]
fn delete_then_recreate_starts_fresh() {
    let mut processor = Processor::with_standard_catalog();
    apply(
        &mut processor,
        json!({"beginRendering": {"surfaceId": "@default", "root": "card"}}),
    );
    card_with_title(&mut processor, "Hello");

    let deleted = apply(&mut processor, json!({"deleteSurface": {"surfaceId": "@default"}}));
    assert!(deleted.is_none());
    assert!(processor.current_snapshot("@default").is_none());

    let fresh = apply(
        &mut processor,
        json!({"surfaceUpdate": {"surfaceId": "@default", "components": [
            {"id": "other", "component": {"Divider": {}}}
        ]}}),
    )
    .unwrap();
    assert_eq!(fresh.components().len(), 1);
    assert!(fresh.component("card").is_none());
    assert_eq!(fresh.root(), None);
    assert!(fresh.data_model().is_empty());
}

#[test]
fn partial_update_touches_only_named_component() {
    let mut processor = Processor::with_standard_catalog();
    apply(
        &mut processor,
        json!({"beginRendering": {"surfaceId": "@default", "root": "card"}}),
    );
    let before = card_with_title(&mut processor, "Hello").unwrap();

    let after = apply(
        &mut processor,
        json!({"surfaceUpdate": {"surfaceId": "@default", "components": [
            {"id": "title", "component": {"Text": {"text": {"literalString": "Goodbye"}}}}
        ]}}),
    )
    .unwrap();

    assert_eq!(after.component("card"), before.component("card"));
    let tree = after.tree().unwrap();
    assert_eq!(tree.ids(), vec!["card", "title"]);
    assert_eq!(text_of(&tree.children[0], &after).as_deref(), Some("Goodbye"));

    // The earlier snapshot is unchanged.
    let old_tree = before.tree().unwrap();
    assert_eq!(text_of(&old_tree.children[0], &before).as_deref(), Some("Hello"));
}

#[test]
fn bound_text_follows_data_model() {
    let mut processor = Processor::with_standard_catalog();
    processor
        .process_json(
            r#"[
            {"beginRendering": {"surfaceId": "@default", "root": "name"}},
            {"surfaceUpdate": {"surfaceId": "@default", "components": [
                {"id": "name", "component": {"Text": {"text": {"path": "form.firstName"}}}}
            ]}}
        ]"#,
        )
        .unwrap();

    let snapshot = processor.current_snapshot("@default").unwrap();
    let tree = snapshot.tree().unwrap();
    assert_eq!(text_of(&tree, &snapshot), None);

    processor
        .process_json(
            r#"{"dataModelUpdate": {"surfaceId": "@default", "path": "/", "contents": [
                {"key": "form.firstName", "value": {"valueString": "John"}},
                {"key": "form.lastName", "value": {"valueString": "Doe"}}
            ]}}"#,
        )
        .unwrap();

    let snapshot = processor.current_snapshot("@default").unwrap();
    let tree = snapshot.tree().unwrap();
    assert_eq!(text_of(&tree, &snapshot).as_deref(), Some("John"));
}

#[test]
fn dispatch_resolves_edited_input() {
    let mut processor = Processor::with_standard_catalog();
    processor
        .process_json(
            r#"[
            {"beginRendering": {"surfaceId": "@default", "root": "form"}},
            {"surfaceUpdate": {"surfaceId": "@default", "components": [
                {"id": "form", "component": {"Column": {"children": {"explicitList": ["input", "submit"]}}}},
                {"id": "input", "component": {"TextField": {"text": {"path": "form.name"}, "label": "Name"}}},
                {"id": "submit", "component": {"Button": {"child": "submit-label", "action": {
                    "name": "submit",
                    "context": [{"key": "v", "value": {"path": "form.name"}}]
                }}}},
                {"id": "submit-label", "component": {"Text": {"text": "Send"}}}
            ]}}
        ]"#,
        )
        .unwrap();

    processor.apply_local_edit("@default", "form.name", Literal::from("Ada"));

    let action = processor.dispatch("@default", "submit").unwrap();
    let wire = serde_json::to_value(&action).unwrap();
    assert_eq!(wire["actionName"], json!("submit"));
    assert_eq!(wire["sourceComponentId"], json!("submit"));
    assert_eq!(wire["context"], json!({"v": "Ada"}));
}

#[test]
fn link_action_reaches_host() {
    let mut processor = Processor::with_standard_catalog();
    processor
        .process_json(
            r#"[
            {"beginRendering": {"surfaceId": "@default", "root": "docs"}},
            {"surfaceUpdate": {"surfaceId": "@default", "components": [
                {"id": "docs", "component": {"Link": {
                    "text": "Read the docs",
                    "action": {"name": "openDocs", "context": [{"key": "topic", "value": "setup"}]}
                }}}
            ]}}
        ]"#,
        )
        .unwrap();

    let (_events_tx, events) = std::sync::mpsc::channel();
    let (actions_tx, actions) = std::sync::mpsc::channel();
    let host = A2uiHost::new(processor, events, actions_tx);

    assert!(host.trigger("@default", "docs").unwrap());
    let sent = actions.try_recv().unwrap();
    assert_eq!(sent.action_name, "openDocs");
    assert_eq!(sent.source_component_id, "docs");
    assert_eq!(sent.context.get("topic"), Some(&json!("setup")));
}

#[test]
fn cyclic_components_terminate() {
    let mut processor = Processor::with_standard_catalog();
    processor
        .process_json(
            r#"[
            {"beginRendering": {"surfaceId": "s", "root": "a"}},
            {"surfaceUpdate": {"surfaceId": "s", "components": [
                {"id": "a", "component": {"Column": {"children": ["a", "b"]}}},
                {"id": "b", "component": {"Row": {"children": ["a", "c"]}}},
                {"id": "c", "component": {"Text": {"text": "leaf"}}}
            ]}}
        ]"#,
        )
        .unwrap();

    let snapshot = processor.current_snapshot("s").unwrap();
    assert_eq!(snapshot.tree().unwrap().ids(), vec!["a", "b", "c"]);
}

#[test]
fn unknown_types_and_kinds_are_tolerated() {
    let mut processor = Processor::with_standard_catalog();
    let applied = processor
        .process_json(
            r#"[
            {"beginRendering": {"surfaceId": "s", "root": "root"}},
            {"futureMessage": {"surfaceId": "s"}},
            {"surfaceUpdate": {"surfaceId": "s", "components": [
                {"id": "root", "component": {"Carousel": {"children": ["x"], "title": "More"}}},
                {"id": "x", "component": {"Text": {"text": "inside"}}}
            ]}}
        ]"#,
        )
        .unwrap();
    assert_eq!(applied, 3);

    let snapshot = processor.current_snapshot("s").unwrap();
    let tree = snapshot.tree().unwrap();
    assert!(matches!(tree.kind(), ComponentKind::Other { type_name, .. } if type_name == "Carousel"));
    assert_eq!(tree.ids(), vec!["root", "x"]);
}

#[test]
fn rebegin_keeps_components() {
    let mut processor = Processor::with_standard_catalog();
    apply(
        &mut processor,
        json!({"beginRendering": {"surfaceId": "@default", "root": "card"}}),
    );
    card_with_title(&mut processor, "Hello");

    let snapshot = apply(
        &mut processor,
        json!({"beginRendering": {"surfaceId": "@default", "root": "title", "styles": {"primaryColor": "#fff"}}}),
    )
    .unwrap();

    assert_eq!(snapshot.components().len(), 2);
    assert_eq!(snapshot.tree().unwrap().ids(), vec!["title"]);
    assert_eq!(
        snapshot.styles().and_then(|s| s.primary_color.as_deref()),
        Some("#fff")
    );
}

#[test]
fn surfaces_are_isolated() {
    let mut processor = Processor::with_standard_catalog();
    processor
        .process_json(
            r#"[
            {"dataModelUpdate": {"surfaceId": "a", "contents": [{"key": "x", "valueString": "from a"}]}},
            {"surfaceUpdate": {"surfaceId": "b", "components": [
                {"id": "t", "component": {"Text": {"text": {"path": "x"}}}}
            ]}}
        ]"#,
        )
        .unwrap();

    let b = processor.current_snapshot("b").unwrap();
    let ComponentKind::Text(text) = &b.component("t").unwrap().kind else {
        panic!("Expected Text");
    };
    assert_eq!(b.resolve(&text.text), None);
    assert_eq!(processor.surface_ids().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn sse_stream_replays_through_host() {
    let stream = concat!(
        ": keep-alive\n",
        "data: {\"beginRendering\": {\"surfaceId\": \"@default\", \"root\": \"t\"}}\n",
        "\n",
        "data: {\"surfaceUpdate\": {\"surfaceId\": \"@default\", \"components\": [\n",
        "data: {\"id\": \"t\", \"component\": {\"Text\": {\"text\": \"streamed\"}}}]}}\n",
        "\n",
    );

    let events = A2uiHost::spawn_reader(stream.as_bytes(), StreamFormat::Sse);
    let (actions, _rx) = std::sync::mpsc::channel();
    let mut host = A2uiHost::new(Processor::with_standard_catalog(), events, actions);

    assert_eq!(host.run_to_end(), 2);
    let snapshot = host.processor().current_snapshot("@default").unwrap();
    let tree = snapshot.tree().unwrap();
    assert_eq!(text_of(&tree, &snapshot).as_deref(), Some("streamed"));
}

proptest! {
    #[test]
    fn repeated_upserts_keep_one_node_per_id(
        updates in proptest::collection::vec(("[a-e]", "[a-z]{0,6}"), 1..30),
    ) {
        let mut processor = Processor::with_standard_catalog();
        let mut latest = std::collections::HashMap::new();

        for (id, text) in &updates {
            apply(
                &mut processor,
                json!({"surfaceUpdate": {"surfaceId": "s", "components": [
                    {"id": id, "component": {"Text": {"text": {"literalString": text}}}}
                ]}}),
            );
            latest.insert(id.clone(), text.clone());
        }

        let snapshot = processor.current_snapshot("s").unwrap();
        prop_assert_eq!(snapshot.components().len(), latest.len());
        for (id, text) in &latest {
            let node = snapshot.component(id).unwrap();
            let ComponentKind::Text(component) = &node.kind else {
                panic!("Expected Text");
            };
            prop_assert_eq!(snapshot.resolve(&component.text), Some(&Literal::from(text.as_str())));
        }
    }
}
