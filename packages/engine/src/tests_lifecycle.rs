/// Mount, update and unmount hook ordering
use crate::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use tessera_dom::Document;

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        fail_unmount: bool,
    }

    impl Recorder {
        fn log(&self, hook: &str, component: &Component) {
            self.calls
                .borrow_mut()
                .push(format!("{hook}:{}", component.is_mounted()));
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Renderable for Recorder {
        fn before_mount(&self, component: &Component) -> EngineResult<()> {
            self.log("before_mount", component);
            Ok(())
        }

        fn after_mount(&self, component: &Component) -> EngineResult<()> {
            self.log("after_mount", component);
            Ok(())
        }

        fn before_update(&self, component: &Component) -> EngineResult<()> {
            self.log("before_update", component);
            Ok(())
        }

        fn render_content(&self, component: &Component) -> EngineResult<()> {
            self.log("render_content", component);
            let message = component.state_as::<String>("message").unwrap_or_default();
            component.set_text(&message)
        }

        fn after_update(&self, component: &Component) -> EngineResult<()> {
            self.log("after_update", component);
            Ok(())
        }

        fn before_unmount(&self, component: &Component) -> EngineResult<()> {
            self.log("before_unmount", component);
            if self.fail_unmount {
                return Err(EngineError::construction("unmount refused"));
            }
            Ok(())
        }
    }

    fn recorded(doc: &Document) -> (Component, Rc<Recorder>) {
        let component = Component::new(doc, "div").unwrap();
        let recorder = Rc::new(Recorder::default());
        component.set_hooks(recorder.clone()).unwrap();
        (component, recorder)
    }

    #[test]
    fn test_construction_fires_no_hooks() {
        let doc = Document::new();
        let (_, recorder) = recorded(&doc);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_render_fires_mount_hooks_around_insertion() {
        let doc = Document::new();
        let (component, recorder) = recorded(&doc);

        component.render(RenderOptions::default()).unwrap();
        assert_eq!(recorder.calls(), vec!["before_mount:false", "after_mount:true"]);
        assert!(component.is_mounted());
        assert!(doc.contains(doc.body(), component.node()));
    }

    #[test]
    fn test_rerender_reparents_and_fires_again() {
        let doc = Document::new();
        let host = doc.create_element("aside").unwrap();
        doc.append_child(doc.body(), host).unwrap();
        let (component, recorder) = recorded(&doc);

        component.render(RenderOptions::default()).unwrap();
        component.render(RenderOptions::new(host)).unwrap();

        assert_eq!(doc.parent(component.node()), Some(host));
        assert_eq!(recorder.calls().len(), 4);
    }

    #[test]
    fn test_render_with_modes_and_references() {
        let doc = Document::new();
        let list = Component::new(&doc, "ul").unwrap();
        list.render(RenderOptions::default()).unwrap();
        let last = Component::new(&doc, "li").unwrap();
        list.append(&last).unwrap();

        let first = Component::new(&doc, "li").unwrap();
        first
            .render(
                RenderOptions::new(&list)
                    .method(InsertionMode::Before)
                    .reference(&last),
            )
            .unwrap();
        let after = Component::new(&doc, "li").unwrap();
        after
            .render(RenderOptions::new(&last).method(InsertionMode::AfterSibling))
            .unwrap();

        assert_eq!(
            doc.children(list.node()),
            vec![first.node(), last.node(), after.node()]
        );
    }

    #[test]
    fn test_render_errors() {
        let doc = Document::new();
        let (component, recorder) = recorded(&doc);

        assert!(matches!(
            component.render(RenderOptions::untargeted()),
            Err(EngineError::MissingTarget(_))
        ));
        assert_eq!(
            component.render(RenderOptions::new("#nonExistentElement")),
            Err(EngineError::Resolution("#nonExistentElement".into()))
        );
        assert!(matches!(
            component.render(RenderOptions::default().method(InsertionMode::Before)),
            Err(EngineError::MissingReference(_))
        ));
        let orphan = doc.create_element("div").unwrap();
        assert!(matches!(
            component.render(RenderOptions::new(orphan).method(InsertionMode::BeforeSibling)),
            Err(EngineError::NoParent(_))
        ));
        assert!(!component.is_mounted());
        // A failed render never reaches after_mount.
        assert!(!recorder.calls().contains(&"after_mount:true".to_string()));
    }

    #[test]
    fn test_set_state_merges_and_runs_update_hooks() {
        let doc = Document::new();
        let (component, recorder) = recorded(&doc);

        component
            .set_state(json!({"message": "New message", "count": 1}))
            .unwrap();
        component.set_state(json!({"count": 2})).unwrap();

        assert_eq!(component.state_value("message"), Some(json!("New message")));
        assert_eq!(component.state_value("count"), Some(json!(2)));
        assert_eq!(component.text(), "New message");
        assert_eq!(
            &recorder.calls()[..3],
            &["before_update:false", "render_content:false", "after_update:false"]
        );
    }

    #[test]
    fn test_render_then_remove_round_trip() {
        let doc = Document::new();
        let (component, recorder) = recorded(&doc);
        let before = doc.children(doc.body()).len();

        component.render(RenderOptions::default()).unwrap();
        assert!(component.is_mounted());
        assert!(doc.contains(doc.body(), component.node()));

        component.remove().unwrap();
        assert!(!component.is_mounted());
        assert!(component.is_removed());
        assert!(!doc.contains(doc.body(), component.node()));
        assert_eq!(doc.children(doc.body()).len(), before);
        assert_eq!(recorder.calls().last().map(String::as_str), Some("before_unmount:true"));
    }

    #[test]
    fn test_remove_is_recursive_and_clears_listeners() {
        let doc = Document::new();
        let parent = Component::new(&doc, "div").unwrap();
        let child = Component::new(&doc, "span").unwrap();
        let grandchild = Component::new(&doc, "em").unwrap();
        child.append(&grandchild).unwrap();
        parent.append(&child).unwrap();
        parent.render(RenderOptions::default()).unwrap();
        grandchild.on("click", |_| {}).unwrap();
        parent.on("click", |_| {}).unwrap();

        parent.remove().unwrap();

        assert!(child.is_removed() && grandchild.is_removed());
        assert!(parent.children().is_empty());
        assert_eq!(doc.listener_count(parent.node()), 0);
        assert_eq!(doc.listener_count(grandchild.node()), 0);
    }

    #[test]
    fn test_remove_unmounted_and_twice() {
        let doc = Document::new();
        let (component, recorder) = recorded(&doc);
        component.remove().unwrap();
        component.remove().unwrap();
        assert_eq!(recorder.calls(), vec!["before_unmount:false"]);
    }

    #[test]
    fn test_removed_is_terminal() {
        let doc = Document::new();
        let component = Component::new(&doc, "div").unwrap();
        component.remove().unwrap();
        let id = component.id();

        assert_eq!(component.set_text("x"), Err(EngineError::Removed(id)));
        assert_eq!(component.add_class("x"), Err(EngineError::Removed(id)));
        assert_eq!(
            component.render(RenderOptions::default()),
            Err(EngineError::Removed(id))
        );
        assert_eq!(component.set_state(json!({})), Err(EngineError::Removed(id)));

        let container = Component::new(&doc, "div").unwrap();
        assert_eq!(container.append(&component), Err(EngineError::Removed(id)));
    }

    #[test]
    fn test_failing_unmount_keeps_component_live() {
        let doc = Document::new();
        let component = Component::new(&doc, "div").unwrap();
        component
            .set_hooks(Rc::new(Recorder {
                fail_unmount: true,
                ..Recorder::default()
            }))
            .unwrap();
        component.render(RenderOptions::default()).unwrap();

        assert!(matches!(component.remove(), Err(EngineError::Construction(_))));
        assert!(!component.is_removed());
        assert!(doc.contains(doc.body(), component.node()));
    }

    #[test]
    fn test_widget_trait_delegates_to_component() {
        struct Badge {
            component: Component,
        }

        impl Widget for Badge {
            fn component(&self) -> &Component {
                &self.component
            }
        }

        let doc = Document::new();
        let badge = Badge {
            component: Component::with_classes(&doc, "span", "badge").unwrap(),
        };
        Widget::render(&badge, RenderOptions::default()).unwrap();
        assert!(badge.component().is_mounted());
        Widget::remove(&badge).unwrap();
        assert!(badge.component().is_removed());
    }
}
