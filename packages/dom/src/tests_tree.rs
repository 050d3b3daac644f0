/// Tree structure tests: creation, insertion, replacement, detaching
use crate::*;

#[cfg(test)]
mod tree_tests {
    use super::*;

    fn tags(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
        nodes.iter().map(|n| doc.tag_name(*n).unwrap_or_default()).collect()
    }

    #[test]
    fn test_new_document_has_html_head_body() {
        let doc = Document::new();
        let html = doc.parent(doc.body()).expect("body has a parent");
        assert_eq!(doc.tag_name(html).as_deref(), Some("html"));
        assert_eq!(doc.parent(html), Some(doc.root()));
        assert_eq!(tags(&doc, &doc.children(html)), vec!["head", "body"]);
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn test_create_element_lowercases_and_validates() {
        let doc = Document::new();
        let node = doc.create_element("DIV").unwrap();
        assert_eq!(doc.tag_name(node).as_deref(), Some("div"));
        assert!(doc.create_element("my-widget").is_ok());

        for bad in ["", "1div", "di v", "<div>", "-x"] {
            assert_eq!(
                doc.create_element(bad),
                Err(DomError::InvalidTagName(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_append_moves_node_between_parents() {
        let doc = Document::new();
        let a = doc.create_element("div").unwrap();
        let b = doc.create_element("div").unwrap();
        let child = doc.create_element("span").unwrap();

        doc.append_child(a, child).unwrap();
        doc.append_child(b, child).unwrap();

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), vec![child]);
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn test_insert_before_reference() {
        let doc = Document::new();
        let list = doc.create_element("ul").unwrap();
        let first = doc.create_element("li").unwrap();
        let last = doc.create_element("li").unwrap();
        let middle = doc.create_element("li").unwrap();
        doc.append_child(list, first).unwrap();
        doc.append_child(list, last).unwrap();

        doc.insert_before(list, middle, Some(last)).unwrap();
        assert_eq!(doc.children(list), vec![first, middle, last]);
        assert_eq!(doc.next_sibling(first), Some(middle));
        assert_eq!(doc.previous_sibling(last), Some(middle));
        assert_eq!(doc.previous_sibling(first), None);
    }

    #[test]
    fn test_insert_before_foreign_reference_fails() {
        let doc = Document::new();
        let parent = doc.create_element("div").unwrap();
        let stranger = doc.create_element("p").unwrap();
        let child = doc.create_element("span").unwrap();

        let result = doc.insert_before(parent, child, Some(stranger));
        assert_eq!(
            result,
            Err(DomError::NotAChild {
                parent,
                child: stranger
            })
        );
        assert_eq!(doc.parent(child), None);
    }

    #[test]
    fn test_replace_child_takes_position() {
        let doc = Document::new();
        let parent = doc.create_element("div").unwrap();
        let a = doc.create_element("a").unwrap();
        let b = doc.create_element("b").unwrap();
        let c = doc.create_element("i").unwrap();
        doc.append_child(parent, a).unwrap();
        doc.append_child(parent, b).unwrap();

        doc.replace_child(parent, c, a).unwrap();
        assert_eq!(doc.children(parent), vec![c, b]);
        assert_eq!(doc.parent(a), None);
    }

    #[test]
    fn test_cannot_insert_ancestor_into_descendant() {
        let doc = Document::new();
        let outer = doc.create_element("div").unwrap();
        let inner = doc.create_element("div").unwrap();
        doc.append_child(outer, inner).unwrap();

        assert!(matches!(
            doc.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            doc.append_child(outer, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_text_nodes_cannot_have_children() {
        let doc = Document::new();
        let text = doc.create_text("hello");
        let span = doc.create_element("span").unwrap();
        assert!(matches!(
            doc.append_child(text, span),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_detach_is_noop_without_parent() {
        let doc = Document::new();
        let node = doc.create_element("div").unwrap();
        doc.detach(node).unwrap();
        doc.append_child(doc.body(), node).unwrap();
        doc.detach(node).unwrap();
        assert!(!doc.is_connected(node));
        assert!(doc.exists(node));
    }

    #[test]
    fn test_set_text_content_discards_children() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        let span = doc.create_element("span").unwrap();
        doc.append_child(div, span).unwrap();

        doc.set_text_content(div, "Hello, world!").unwrap();
        assert_eq!(doc.text_content(div), "Hello, world!");
        assert_eq!(doc.children(div).len(), 1);
        assert_eq!(doc.parent(span), None);

        doc.set_text_content(div, "").unwrap();
        assert!(doc.children(div).is_empty());
    }

    #[test]
    fn test_class_list_operations() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();

        doc.add_class(div, "flex").unwrap();
        doc.add_class(div, "hidden").unwrap();
        doc.add_class(div, "flex").unwrap();
        assert_eq!(doc.class_list(div).unwrap(), vec!["flex", "hidden"]);

        assert!(!doc.toggle_class(div, "hidden").unwrap());
        assert!(doc.toggle_class(div, "hidden").unwrap());

        doc.remove_class(div, "flex").unwrap();
        assert_eq!(doc.attribute(div, "class").as_deref(), Some("hidden"));

        doc.set_class_list(div, &["a", "b", "a"]).unwrap();
        assert_eq!(doc.class_list(div).unwrap(), vec!["a", "b"]);

        doc.set_class_list::<&str>(div, &[]).unwrap();
        assert!(!doc.has_attribute(div, "class"));

        assert_eq!(
            doc.add_class(div, "two words"),
            Err(DomError::InvalidToken("two words".into()))
        );
    }

    #[test]
    fn test_inline_styles() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();

        doc.set_style(div, "color", "red").unwrap();
        doc.set_style(div, "padding", "4px").unwrap();
        doc.set_style(div, "color", "blue").unwrap();
        assert_eq!(doc.attribute(div, "style").as_deref(), Some("color: blue; padding: 4px;"));
        assert_eq!(doc.style(div, "padding").as_deref(), Some("4px"));

        doc.remove_style(div, "color").unwrap();
        doc.remove_style(div, "padding").unwrap();
        assert!(!doc.has_attribute(div, "style"));
    }

    #[test]
    fn test_attribute_order_is_preserved() {
        let doc = Document::new();
        let input = doc.create_element("input").unwrap();
        doc.set_attribute(input, "type", "text").unwrap();
        doc.set_attribute(input, "name", "amount").unwrap();
        doc.set_attribute(input, "type", "number").unwrap();

        assert_eq!(
            doc.attributes(input).unwrap(),
            vec![
                ("type".to_string(), "number".to_string()),
                ("name".to_string(), "amount".to_string())
            ]
        );
        assert!(doc.remove_attribute(input, "type").unwrap());
        assert!(!doc.remove_attribute(input, "type").unwrap());
    }

    #[test]
    fn test_attribute_on_text_node_fails() {
        let doc = Document::new();
        let text = doc.create_text("x");
        assert_eq!(
            doc.set_attribute(text, "id", "nope"),
            Err(DomError::NotAnElement(text))
        );
    }

    #[test]
    fn test_weak_handle_does_not_keep_document_alive() {
        let doc = Document::new();
        let weak = doc.downgrade();
        assert!(weak.upgrade().is_some_and(|upgraded| upgraded.ptr_eq(&doc)));

        drop(doc);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_release_frees_subtree_and_listeners() {
        let doc = Document::new();
        let baseline = doc.node_count();
        let list = doc.create_element("ul").unwrap();
        let item = doc.create_element("li").unwrap();
        doc.append_child(list, item).unwrap();
        doc.set_text_content(item, "first").unwrap();
        doc.append_child(doc.body(), list).unwrap();
        doc.add_event_listener(item, "click", std::rc::Rc::new(|_: &mut Event| {}))
            .unwrap();

        assert_eq!(doc.release(list), Ok(3));

        assert_eq!(doc.node_count(), baseline);
        assert!(doc.children(doc.body()).is_empty());
        assert!(!doc.exists(list) && !doc.exists(item));
        assert_eq!(doc.listener_count(item), 0);
        assert_eq!(doc.click(item).err(), Some(DomError::NodeNotFound(item)));
        assert_eq!(doc.release(list), Err(DomError::NodeNotFound(list)));
    }

    #[test]
    fn test_released_slot_is_reused_under_a_new_id() {
        let doc = Document::new();
        let old = doc.create_element("div").unwrap();
        doc.set_attribute(old, "id", "old").unwrap();
        doc.release(old).unwrap();

        let new = doc.create_element("span").unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert_eq!(doc.tag_name(new).as_deref(), Some("span"));
        assert_eq!(doc.tag_name(old), None);
        assert_eq!(doc.attribute(old, "id"), None);
    }

    #[test]
    fn test_document_structure_cannot_be_released() {
        let doc = Document::new();
        let html = doc.parent(doc.body()).expect("body has a parent");
        for node in [doc.root(), html, doc.head(), doc.body()] {
            assert!(matches!(
                doc.release(node),
                Err(DomError::HierarchyRequest { .. })
            ));
        }
        assert!(doc.is_connected(doc.body()));
    }

    #[test]
    fn test_build_and_release_keeps_arena_bounded() {
        let doc = Document::new();
        for _ in 0..50 {
            let table = doc.create_element("table").unwrap();
            for _ in 0..10 {
                let row = doc.create_element("tr").unwrap();
                doc.set_text_content(row, "cell").unwrap();
                doc.append_child(table, row).unwrap();
            }
            doc.append_child(doc.body(), table).unwrap();
            doc.release(table).unwrap();
        }
        assert_eq!(doc.node_count(), Document::new().node_count());
    }
}
