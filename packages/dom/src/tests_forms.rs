/// Form control values, form data collection and HTML serialization
use crate::*;

#[cfg(test)]
mod form_tests {
    use super::*;

    fn control(doc: &Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = doc.create_element(tag).unwrap();
        for (name, value) in attrs {
            doc.set_attribute(node, name, value).unwrap();
        }
        doc.append_child(parent, node).unwrap();
        node
    }

    #[test]
    fn test_form_data_collects_named_controls_in_order() {
        let doc = Document::new();
        let form = doc.create_element("form").unwrap();

        let amount = control(&doc, form, "input", &[("type", "number"), ("name", "amount")]);
        doc.set_value(amount, "42").unwrap();
        control(&doc, form, "input", &[("type", "text")]);
        control(&doc, form, "input", &[("name", "note"), ("value", "default")]);
        control(&doc, form, "input", &[("name", "locked"), ("disabled", "")]);
        control(&doc, form, "input", &[("type", "submit"), ("name", "go")]);
        control(&doc, form, "input", &[("type", "checkbox"), ("name", "recurring")]);
        control(&doc, form, "input", &[("type", "checkbox"), ("name", "cleared"), ("checked", "")]);

        let select = control(&doc, form, "select", &[("name", "category")]);
        for (value, text) in [("1", "Food"), ("2", "Rent")] {
            let option = control(&doc, select, "option", &[("value", value)]);
            doc.set_text_content(option, text).unwrap();
        }
        let textarea = control(&doc, form, "textarea", &[("name", "memo")]);
        doc.set_text_content(textarea, "lunch").unwrap();

        assert_eq!(
            doc.form_data(form).unwrap(),
            vec![
                ("amount".to_string(), "42".to_string()),
                ("note".to_string(), "default".to_string()),
                ("cleared".to_string(), "on".to_string()),
                ("category".to_string(), "1".to_string()),
                ("memo".to_string(), "lunch".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_value_follows_selected_option() {
        let doc = Document::new();
        let select = doc.create_element("select").unwrap();
        control(&doc, select, "option", &[("value", "a")]);
        control(&doc, select, "option", &[("value", "b"), ("selected", "")]);
        assert_eq!(doc.value(select).as_deref(), Some("b"));

        doc.set_value(select, "a").unwrap();
        assert_eq!(doc.value(select).as_deref(), Some("a"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let doc = Document::new();
        let form = doc.create_element("form").unwrap();
        let amount = control(&doc, form, "input", &[("name", "amount"), ("value", "0")]);
        let date = control(&doc, form, "input", &[("type", "date"), ("name", "date")]);

        doc.set_value(amount, "15").unwrap();
        doc.set_value(date, "2024-01-31").unwrap();
        doc.reset_form(form).unwrap();

        assert_eq!(doc.value(amount).as_deref(), Some("0"));
        assert_eq!(doc.value(date), None);
        assert_eq!(
            doc.form_data(form).unwrap(),
            vec![
                ("amount".to_string(), "0".to_string()),
                ("date".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_set_value_requires_element() {
        let doc = Document::new();
        let text = doc.create_text("plain");
        assert_eq!(doc.set_value(text, "x"), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn test_outer_html_compact() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        doc.set_attribute(div, "class", "card").unwrap();
        let label = control(&doc, div, "label", &[("for", "amount")]);
        doc.set_text_content(label, "Amount <USD>").unwrap();
        control(&doc, div, "input", &[("id", "amount"), ("name", "amount")]);

        assert_eq!(
            doc.outer_html(div),
            r#"<div class="card"><label for="amount">Amount &lt;USD&gt;</label><input id="amount" name="amount"></div>"#
        );
        assert_eq!(
            doc.inner_html(div),
            r#"<label for="amount">Amount &lt;USD&gt;</label><input id="amount" name="amount">"#
        );
    }

    #[test]
    fn test_pretty_html_indents_nested_elements() {
        let doc = Document::new();
        let list = doc.create_element("ul").unwrap();
        for text in ["one", "two"] {
            let item = control(&doc, list, "li", &[]);
            doc.set_text_content(item, text).unwrap();
        }

        assert_eq!(
            doc.to_html(list, &HtmlOptions::pretty()),
            "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>"
        );
    }

    #[test]
    fn test_document_serializes_with_doctype() {
        let doc = Document::new();
        let html = doc.outer_html(doc.root());
        assert_eq!(
            html,
            "<!DOCTYPE html><html><head></head><body></body></html>"
        );
    }
}
