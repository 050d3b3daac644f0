/// Form layout, buttons and field values
use crate::*;
use serde_json::json;
use tessera_engine::dom::Document;
use tessera_engine::{EngineError, RenderOptions, Widget};

#[cfg(test)]
mod form_tests {
    use super::*;

    fn field(value: serde_json::Value) -> FieldDescriptor {
        serde_json::from_value(value).unwrap()
    }

    fn transaction_form(doc: &Document) -> Form {
        let form = Form::new(doc, "space-y-4").unwrap();
        form.add_inputs(&[
            field(json!({
                "classList": "mb-4",
                "attributes": {"id": "description", "name": "description"},
                "labelText": "Description"
            })),
            field(json!({
                "type": "number",
                "classList": "mb-4",
                "attributes": {"id": "amount", "name": "amount", "step": "0.01"},
                "labelText": "Amount"
            })),
        ])
        .unwrap()
        .add_select(&field(json!({
            "classList": "mb-4",
            "attributes": {"id": "transaction_type", "name": "transaction_type"},
            "labelText": "Type",
            "options": [
                {"value": "expense", "text": "Expense"},
                {"value": "income", "text": "Income"}
            ]
        })))
        .unwrap();
        form
    }

    #[test]
    fn test_fields_go_above_the_buttons() {
        let doc = Document::new();
        let form = transaction_form(&doc);
        form.add_button(&ButtonDescriptor::new("btn", "Save").attribute("type", "submit"))
            .unwrap();

        let children = doc.children(form.component().node());
        assert_eq!(children.len(), 4);
        assert_eq!(children[3], form.buttons_wrapper().node());
        assert_eq!(
            form.buttons_wrapper().class_list(),
            vec!["flex", "justify-end", "space-x-2"]
        );
        let ids: Vec<String> = form
            .fields()
            .iter()
            .filter_map(|field| field.control().attribute("id"))
            .collect();
        assert_eq!(ids, vec!["description", "amount", "transaction_type"]);
        assert_eq!(doc.children(form.buttons_wrapper().node()).len(), 1);
    }

    #[test]
    fn test_submit_button_detection() {
        let doc = Document::new();
        let form = Form::new(&doc, "").unwrap();
        form.add_button(&ButtonDescriptor::new("btn", "Cancel").attribute("type", "button"))
            .unwrap();
        assert!(!form.has_submit_button());

        let result = form.listen(
            "/transactions/create/",
            std::rc::Rc::new(NeverTransport),
            std::rc::Rc::new(LogNotifier),
        );
        assert!(matches!(
            result,
            Err(WidgetError::Engine(EngineError::Construction(_)))
        ));

        form.add_button(&ButtonDescriptor::new("btn", "Save").attribute("type", "submit"))
            .unwrap();
        assert!(form.has_submit_button());
        assert_eq!(form.buttons().len(), 2);
    }

    struct NeverTransport;

    impl Transport for NeverTransport {
        async fn send(&self, _request: Request) -> WidgetResult<serde_json::Value> {
            Err(WidgetError::Transport("unreachable".into()))
        }
    }

    #[test]
    fn test_form_data_and_reset() {
        let doc = Document::new();
        let form = transaction_form(&doc);

        form.field("description").unwrap().set_value("Lunch").unwrap();
        form.field("amount").unwrap().set_value("12.50").unwrap();
        form.field("transaction_type").unwrap().set_value("income").unwrap();
        assert!(form.field("missing").is_none());

        assert_eq!(
            form.form_data().unwrap(),
            vec![
                ("description".to_string(), "Lunch".to_string()),
                ("amount".to_string(), "12.50".to_string()),
                ("transaction_type".to_string(), "income".to_string()),
            ]
        );

        form.reset().unwrap();
        assert_eq!(form.field("amount").unwrap().value(), None);
        assert_eq!(
            form.field("transaction_type").unwrap().value().as_deref(),
            Some("expense")
        );
    }

    #[test]
    fn test_invalid_field_is_rejected_without_changing_the_form() {
        let doc = Document::new();
        let form = Form::new(&doc, "").unwrap();
        let result = form.add_input(&field(json!({"attributes": {"id": "only-id"}})));
        assert!(result.is_err());
        assert!(form.fields().is_empty());
        assert_eq!(doc.children(form.component().node()).len(), 1);
    }

    #[test]
    fn test_remove_tears_down_fields_and_buttons() {
        let doc = Document::new();
        let form = transaction_form(&doc);
        let button = form
            .add_button(&ButtonDescriptor::new("btn", "Save").attribute("type", "submit"))
            .unwrap();
        form.render(RenderOptions::default()).unwrap();
        let fields = form.fields();

        form.remove().unwrap();

        assert!(fields.iter().all(|field| field.component().is_removed()));
        assert!(button.component().is_removed());
        assert!(form.buttons_wrapper().is_removed());
        assert!(form.fields().is_empty());
        assert!(doc.children(doc.body()).is_empty());
    }
}
