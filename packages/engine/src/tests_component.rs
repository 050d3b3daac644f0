/// Component mutators: attributes, classes, content, children, events
use crate::*;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use tessera_dom::{Document, DomError};

#[cfg(test)]
mod component_tests {
    use super::*;

    #[test]
    fn test_new_component_wraps_unmounted_element() {
        let doc = Document::new();
        let component = Component::new(&doc, "div").unwrap();
        assert_eq!(component.tag(), "div");
        assert_eq!(doc.tag_name(component.node()).as_deref(), Some("div"));
        assert!(!component.is_mounted());
        assert!(!doc.is_connected(component.node()));
        assert!(component.children().is_empty());
    }

    #[test]
    fn test_invalid_tag_is_dom_error() {
        let doc = Document::new();
        assert_eq!(
            Component::new(&doc, "not a tag"),
            Err(EngineError::Dom(DomError::InvalidTagName("not a tag".into())))
        );
    }

    #[test]
    fn test_wrap_existing_element() {
        let doc = Document::new();
        let node = doc.create_element("section").unwrap();
        let component = Component::wrap(&doc, node).unwrap();
        assert_eq!(component.node(), node);
        assert_eq!(component.tag(), "section");

        let text = doc.create_text("x");
        assert!(matches!(
            Component::wrap(&doc, text),
            Err(EngineError::Dom(DomError::NotAnElement(_)))
        ));
    }

    #[test]
    fn test_components_compare_by_identity() {
        let doc = Document::new();
        let a = Component::new(&doc, "div").unwrap();
        let b = Component::new(&doc, "div").unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_attributes_and_id() {
        let doc = Document::new();
        let component = Component::new(&doc, "div").unwrap();
        component.set_id("my-component").unwrap();
        component
            .set_attributes([("data-test", "test"), ("aria-label", "test label")])
            .unwrap();

        assert_eq!(component.attribute("id").as_deref(), Some("my-component"));
        assert_eq!(component.attribute("data-test").as_deref(), Some("test"));
        assert_eq!(component.attribute("aria-label").as_deref(), Some("test label"));
        assert!(component.remove_attribute("data-test").unwrap());
        assert_eq!(doc.get_element_by_id("my-component"), None);
    }

    #[test]
    fn test_set_attributes_json_accepts_objects_and_pairs() {
        let doc = Document::new();
        let component = Component::new(&doc, "input").unwrap();
        component
            .set_attributes_json(&json!({"type": "number", "step": 0.01, "required": true}))
            .unwrap();
        component
            .set_attributes_json(&json!([["name", "amount"], ["min", 0]]))
            .unwrap();

        assert_eq!(component.attribute("type").as_deref(), Some("number"));
        assert_eq!(component.attribute("step").as_deref(), Some("0.01"));
        assert_eq!(component.attribute("required").as_deref(), Some("true"));
        assert_eq!(component.attribute("name").as_deref(), Some("amount"));
        assert_eq!(component.attribute("min").as_deref(), Some("0"));
    }

    #[test]
    fn test_set_attributes_json_rejects_other_shapes_atomically() {
        let doc = Document::new();
        let component = Component::new(&doc, "div").unwrap();
        for value in [
            json!("not an object"),
            json!(42),
            json!(null),
            json!([1, 2]),
            json!([["ok", "1"], ["broken"]]),
            json!({"nested": {"a": 1}}),
        ] {
            assert!(
                matches!(component.set_attributes_json(&value), Err(EngineError::Type { .. })),
                "{value} should be rejected"
            );
        }
        assert_eq!(component.attribute("ok"), None);
    }

    #[test]
    fn test_class_operations() {
        let doc = Document::new();
        let component = Component::with_classes(&doc, "button", "btn btn-primary").unwrap();
        assert_eq!(component.class_list(), vec!["btn", "btn-primary"]);

        component.add_class("my-class").unwrap();
        assert!(component.has_class("my-class"));
        component.remove_class("btn-primary").unwrap();
        assert!(!component.toggle_class("my-class").unwrap());

        component.set_class_list(["hidden", "fixed", "inset-0"]).unwrap();
        assert_eq!(component.class_list(), vec!["hidden", "fixed", "inset-0"]);
        component.set_class_list("flex").unwrap();
        assert_eq!(component.attribute("class").as_deref(), Some("flex"));
    }

    #[test]
    fn test_styles() {
        let doc = Document::new();
        let component = Component::new(&doc, "div").unwrap();
        component
            .set_styles([("display", "flex"), ("gap", "1rem")])
            .unwrap();
        component.set_style("display", "none").unwrap();
        assert_eq!(component.style("display").as_deref(), Some("none"));
        assert_eq!(component.attribute("style").as_deref(), Some("display: none; gap: 1rem;"));
    }

    #[test]
    fn test_set_text_and_content() {
        let doc = Document::new();
        let component = Component::new(&doc, "div").unwrap();
        component.set_content("Hello, world!").unwrap();
        assert_eq!(doc.inner_html(component.node()), "Hello, world!");

        component.set_text("<b>escaped</b>").unwrap();
        assert_eq!(component.text(), "<b>escaped</b>");
        assert_eq!(doc.inner_html(component.node()), "&lt;b&gt;escaped&lt;/b&gt;");

        let node = doc.create_element("em").unwrap();
        component.set_content(node).unwrap();
        assert_eq!(doc.children(component.node()), vec![node]);

        component.set_content_json(&json!(12.5)).unwrap();
        assert_eq!(component.text(), "12.5");
        for bad in [json!(null), json!({}), json!([1])] {
            assert!(matches!(
                component.set_content_json(&bad),
                Err(EngineError::Type { .. })
            ));
        }
    }

    #[test]
    fn test_set_content_removes_owned_children() {
        let doc = Document::new();
        let container = Component::new(&doc, "div").unwrap();
        let old = Component::new(&doc, "span").unwrap();
        let new = Component::new(&doc, "strong").unwrap();
        container.append(&old).unwrap();

        container.set_content(&new).unwrap();
        assert!(old.is_removed());
        assert_eq!(container.children(), vec![new.clone()]);
        assert_eq!(doc.children(container.node()), vec![new.node()]);

        // Setting an owned child as content keeps it alive.
        container.set_content(&new).unwrap();
        assert!(!new.is_removed());
        assert_eq!(container.children().len(), 1);
    }

    #[test]
    fn test_set_text_leaves_ownership_untouched() {
        let doc = Document::new();
        let container = Component::new(&doc, "div").unwrap();
        let child = Component::new(&doc, "span").unwrap();
        container.append(&child).unwrap();

        container.set_text("plain").unwrap();
        assert_eq!(container.children(), vec![child.clone()]);
        assert!(!doc.contains(container.node(), child.node()));
        assert!(!child.is_removed());
    }

    #[test]
    fn test_append_three_children_in_order() {
        let doc = Document::new();
        let container = Component::new(&doc, "div").unwrap();
        let spans: Vec<Component> = (0..3)
            .map(|_| Component::new(&doc, "span").unwrap())
            .collect();

        container.render(RenderOptions::default()).unwrap();
        container.append(spans.clone()).unwrap();

        let nodes: Vec<_> = spans.iter().map(Component::node).collect();
        assert_eq!(doc.children(container.node()), nodes);
        assert_eq!(container.children(), spans);
        assert!(spans.iter().all(Component::is_mounted));
    }

    #[test]
    fn test_child_of_detached_parent_is_not_mounted() {
        let doc = Document::new();
        let parent = Component::new(&doc, "div").unwrap();
        let child = Component::new(&doc, "span").unwrap();

        parent.append(&child).unwrap();
        assert!(!child.is_mounted());

        parent.render(RenderOptions::default()).unwrap();
        assert!(child.is_mounted());

        doc.detach(parent.node()).unwrap();
        assert!(!parent.is_mounted());
        assert!(!child.is_mounted());
    }

    #[test]
    fn test_replaced_component_is_no_longer_mounted() {
        let doc = Document::new();
        let old = Component::new(&doc, "p").unwrap();
        old.render(RenderOptions::default()).unwrap();
        let new = Component::new(&doc, "p").unwrap();

        new.render(
            RenderOptions::default()
                .method(InsertionMode::Replace)
                .reference(&old),
        )
        .unwrap();

        assert!(new.is_mounted());
        assert!(!old.is_mounted());
        assert!(!old.is_removed());
    }

    #[test]
    fn test_removed_child_leaves_parent_children() {
        let doc = Document::new();
        let parent = Component::new(&doc, "ul").unwrap();
        let first = Component::new(&doc, "li").unwrap();
        let second = Component::new(&doc, "li").unwrap();
        parent.append(vec![first.clone(), second.clone()]).unwrap();

        first.remove().unwrap();

        assert_eq!(parent.children(), vec![second.clone()]);
        assert_eq!(doc.children(parent.node()), vec![second.node()]);
    }

    #[test]
    fn test_appending_elsewhere_transfers_ownership() {
        let doc = Document::new();
        let first = Component::new(&doc, "div").unwrap();
        let second = Component::new(&doc, "div").unwrap();
        let child = Component::new(&doc, "span").unwrap();
        first.append(&child).unwrap();

        second.append(&child).unwrap();
        assert!(first.children().is_empty());
        assert_eq!(second.children(), vec![child.clone()]);

        first.remove().unwrap();
        assert!(!child.is_removed());
    }

    #[test]
    fn test_remove_releases_owned_nodes_only() {
        let doc = Document::new();
        let baseline = doc.node_count();
        let card = Component::new(&doc, "div").unwrap();
        let amount = Component::new(&doc, "em").unwrap();
        card.append(vec![Content::from("Total: "), Content::from(&amount)])
            .unwrap();
        card.render(RenderOptions::default()).unwrap();

        card.remove().unwrap();
        assert_eq!(doc.node_count(), baseline);
        assert!(!doc.exists(card.node()) && !doc.exists(amount.node()));
        assert!(amount.is_removed());

        let host = doc.create_element("section").unwrap();
        let wrapped = Component::wrap(&doc, host).unwrap();
        wrapped.append_to(doc.body()).unwrap();
        wrapped.remove().unwrap();
        assert!(doc.exists(host));
        assert_eq!(doc.parent(host), None);
    }

    #[test]
    fn test_append_mixed_content_and_duplicates() {
        let doc = Document::new();
        let container = Component::new(&doc, "p").unwrap();
        let child = Component::new(&doc, "em").unwrap();
        let raw = doc.create_element("br").unwrap();

        container
            .append(vec![
                Content::from("Total: "),
                Content::from(&child),
                Content::from(raw),
            ])
            .unwrap();
        container.append(&child).unwrap();

        assert_eq!(container.children().len(), 1);
        assert_eq!(doc.children(container.node()).len(), 3);
        assert_eq!(doc.children(container.node())[2], child.node());
    }

    #[test]
    fn test_append_to_targets() {
        let doc = Document::new();
        let host = doc.create_element("main").unwrap();
        doc.set_attribute(host, "id", "app").unwrap();
        doc.append_child(doc.body(), host).unwrap();

        let component = Component::new(&doc, "div").unwrap();
        component.append_to("#app").unwrap();
        assert_eq!(doc.parent(component.node()), Some(host));
        assert!(component.is_mounted());

        assert_eq!(
            component.append_to("#missing"),
            Err(EngineError::Resolution("#missing".into()))
        );
        assert!(matches!(
            component.append_to_json(&json!(null)),
            Err(EngineError::MissingTarget(_))
        ));
        assert!(matches!(
            component.append_to_json(&json!(7)),
            Err(EngineError::Type { .. })
        ));
    }

    #[test]
    fn test_event_listener_fires_once_then_never() {
        let doc = Document::new();
        let component = Component::new(&doc, "button").unwrap();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let callback = Callback::new(move |_| counter.set(counter.get() + 1));

        component.add_event_listener("click", &callback).unwrap();
        doc.click(component.node()).unwrap();
        assert_eq!(clicks.get(), 1);

        component.remove_event_listener("click", &callback);
        doc.click(component.node()).unwrap();
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_clear_event_listeners_covers_every_event() {
        let doc = Document::new();
        let component = Component::new(&doc, "input").unwrap();
        let fired = Rc::new(Cell::new(0));
        for event in ["input", "change", "change"] {
            let fired = Rc::clone(&fired);
            component.on(event, move |_| fired.set(fired.get() + 1)).unwrap();
        }
        assert_eq!(component.events().listener_count(), 3);

        component.clear_event_listeners();
        for event in ["input", "change"] {
            doc.dispatch_event(component.node(), tessera_dom::Event::new(event))
                .unwrap();
        }
        assert_eq!(fired.get(), 0);
        assert_eq!(doc.listener_count(component.node()), 0);
    }

    #[test]
    fn test_json_state_accessors() {
        let doc = Document::new();
        let component = Component::new(&doc, "div").unwrap();
        component.set_state(json!({"count": 2, "label": "two"})).unwrap();
        component.set_state(json!({"count": 3})).unwrap();

        assert_eq!(component.state_as::<u32>("count"), Some(3));
        assert_eq!(component.state_as::<String>("label").as_deref(), Some("two"));
        assert_eq!(component.state_as::<u32>("label"), None);
        assert_eq!(component.state_value("missing"), None);
        assert!(matches!(
            component.set_state(json!(["not", "an", "object"])),
            Err(EngineError::Type { .. })
        ));
    }
}
