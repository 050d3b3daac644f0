//! # Table
//!
//! A `<table>` with a fixed header row and a body rebuilt from row objects
//! every time the data changes. Rows are JSON objects keyed by column name;
//! a column missing from a row renders as an empty cell.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};
use tessera_engine::dom::Document;
use tessera_engine::{ClassList, Component, EngineError, EngineResult, Renderable, Widget};
use tracing::debug;

use crate::error::{WidgetError, WidgetResult};
use crate::transport::{Request, Transport};

pub type Row = Map<String, Value>;

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

struct TableState {
    columns: Vec<String>,
    rows: RefCell<Vec<Row>>,
    thead: Component,
    tbody: Component,
}

impl TableState {
    fn rebuild(&self) -> EngineResult<()> {
        let document = self.tbody.document();
        self.tbody.set_content("")?;
        let rows = self.rows.borrow().clone();
        for row in &rows {
            let tr = Component::new(document, "tr")?;
            for column in &self.columns {
                let td = Component::new(document, "td")?;
                td.set_text(&cell_text(row.get(column)))?;
                tr.append(&td)?;
            }
            self.tbody.append(&tr)?;
        }
        Ok(())
    }
}

impl Renderable for TableState {
    fn render_content(&self, _component: &Component) -> EngineResult<()> {
        self.rebuild()
    }

    fn before_unmount(&self, _component: &Component) -> EngineResult<()> {
        self.rows.borrow_mut().clear();
        self.rebuild()
    }
}

#[derive(Clone)]
pub struct Table {
    component: Component,
    state: Rc<TableState>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("component", &self.component)
            .field("columns", &self.state.columns)
            .field("rows", &self.row_count())
            .finish()
    }
}

impl Table {
    pub fn new<S: AsRef<str>>(
        document: &Document,
        columns: &[S],
        classes: impl Into<ClassList>,
    ) -> WidgetResult<Self> {
        let component = Component::with_classes(document, "table", classes)?;
        let thead = Component::new(document, "thead")?;
        let tbody = Component::new(document, "tbody")?;
        component.append(vec![thead.clone(), tbody.clone()])?;

        let header = Component::new(document, "tr")?;
        for column in columns {
            let th = Component::new(document, "th")?;
            th.set_text(column.as_ref())?;
            header.append(&th)?;
        }
        thead.set_content(&header)?;

        let state = Rc::new(TableState {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: RefCell::new(Vec::new()),
            thead,
            tbody,
        });
        component.set_hooks(state.clone())?;
        Ok(Self { component, state })
    }

    pub fn columns(&self) -> &[String] {
        &self.state.columns
    }

    pub fn rows(&self) -> Vec<Row> {
        self.state.rows.borrow().clone()
    }

    pub fn row_count(&self) -> usize {
        self.state.rows.borrow().len()
    }

    pub fn thead(&self) -> &Component {
        &self.state.thead
    }

    pub fn tbody(&self) -> &Component {
        &self.state.tbody
    }

    /// Append one row. It must have exactly one entry per column.
    pub fn add_row(&self, row: Row) -> WidgetResult<()> {
        let expected = self.state.columns.len();
        if row.len() != expected {
            return Err(WidgetError::RowShape {
                expected,
                found: row.len(),
            });
        }
        self.state.rows.borrow_mut().push(row);
        Ok(self.component.update()?)
    }

    pub fn add_row_json(&self, row: &Value) -> WidgetResult<()> {
        match row {
            Value::Object(row) => self.add_row(row.clone()),
            other => Err(EngineError::type_error("an object", other).into()),
        }
    }

    /// Replace all rows.
    pub fn set_data(&self, rows: Vec<Row>) -> WidgetResult<()> {
        *self.state.rows.borrow_mut() = rows;
        Ok(self.component.update()?)
    }

    pub fn clear(&self) -> WidgetResult<()> {
        self.set_data(Vec::new())
    }

    /// Fetch rows from `path` and show them.
    ///
    /// Fails with [`EngineError::Removed`] if the table is removed while the
    /// request is in flight; the response is then discarded.
    pub async fn load<T: Transport>(&self, transport: &T, path: &str) -> WidgetResult<usize> {
        let id = self.component.id();
        if self.component.is_removed() {
            return Err(EngineError::Removed(id).into());
        }
        let response = transport.send(Request::get(path)).await?;
        if self.component.is_removed() {
            debug!(component = %id, path, "Table removed before rows arrived");
            return Err(EngineError::Removed(id).into());
        }

        let Value::Array(items) = response else {
            return Err(WidgetError::InvalidResponse(format!(
                "expected an array of rows from {path}"
            )));
        };
        let rows = items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(WidgetError::InvalidResponse(format!(
                    "expected a row object, found {other}"
                ))),
            })
            .collect::<WidgetResult<Vec<Row>>>()?;

        let count = rows.len();
        self.set_data(rows)?;
        debug!(component = %id, path, rows = count, "Table loaded");
        Ok(count)
    }
}

impl Widget for Table {
    fn component(&self) -> &Component {
        &self.component
    }
}
