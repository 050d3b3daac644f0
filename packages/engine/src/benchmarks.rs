//! Micro-benchmarks comparing engine components with raw document calls.
//!
//! Each suite measures the same three scenarios (rendering, event
//! handling, DOM updates) and reports mean timings in milliseconds, in the
//! shape `{ "type": ..., "results": { ... } }`.

use std::rc::Rc;
use std::time::Instant;

use serde::Serialize;
use tessera_dom::{Document, Event, Listener};
use tracing::debug;

use crate::component::{Component, RenderOptions};
use crate::error::EngineResult;
use crate::listeners::Callback;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    Component,
    Vanilla,
}

impl Suite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::Component => "component",
            Suite::Vanilla => "vanilla",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderingTimings {
    pub render: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTimings {
    pub add_event_listener: f64,
    pub remove_event_listener: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimings {
    pub set_content: f64,
    pub set_attributes: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResults {
    pub rendering: RenderingTimings,
    pub event_handling: EventTimings,
    pub dom_updates: UpdateTimings,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    #[serde(rename = "type")]
    pub suite: Suite,
    pub iterations: u32,
    pub results: BenchmarkResults,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn component_iteration(document: &Document, totals: &mut BenchmarkResults) -> EngineResult<()> {
    let start = Instant::now();
    let component = Component::new(document, "div")?;
    component.set_text("Hello, World!")?;
    component.render(RenderOptions::default())?;
    totals.rendering.render += elapsed_ms(start);

    let button = Component::new(document, "button")?;
    button.set_text("Click Me")?;
    let callback = Callback::new(|_: &mut Event| {});
    let start = Instant::now();
    button.add_event_listener("click", &callback)?;
    totals.event_handling.add_event_listener += elapsed_ms(start);
    let start = Instant::now();
    button.remove_event_listener("click", &callback);
    totals.event_handling.remove_event_listener += elapsed_ms(start);

    let target = Component::new(document, "div")?;
    let span = Component::new(document, "span")?;
    span.set_text("Updated Content")?;
    let start = Instant::now();
    target.set_content(&span)?;
    totals.dom_updates.set_content += elapsed_ms(start);
    let start = Instant::now();
    target.set_attributes([("id", "test"), ("class", "container")])?;
    totals.dom_updates.set_attributes += elapsed_ms(start);

    component.remove()?;
    button.remove()?;
    target.remove()
}

fn vanilla_iteration(document: &Document, totals: &mut BenchmarkResults) -> EngineResult<()> {
    let start = Instant::now();
    let div = document.create_element("div")?;
    document.set_text_content(div, "Hello, World!")?;
    document.append_child(document.body(), div)?;
    totals.rendering.render += elapsed_ms(start);

    let button = document.create_element("button")?;
    document.set_text_content(button, "Click Me")?;
    let listener: Listener = Rc::new(|_: &mut Event| {});
    let start = Instant::now();
    let id = document.add_event_listener(button, "click", listener)?;
    totals.event_handling.add_event_listener += elapsed_ms(start);
    let start = Instant::now();
    document.remove_event_listener(button, id);
    totals.event_handling.remove_event_listener += elapsed_ms(start);

    let target = document.create_element("div")?;
    let span = document.create_element("span")?;
    document.set_text_content(span, "Updated Content")?;
    let start = Instant::now();
    document.clear_children(target)?;
    document.append_child(target, span)?;
    totals.dom_updates.set_content += elapsed_ms(start);
    let start = Instant::now();
    document.set_attribute(target, "id", "test")?;
    document.set_attribute(target, "class", "container")?;
    totals.dom_updates.set_attributes += elapsed_ms(start);

    for node in [div, button, target] {
        document.release(node)?;
    }
    Ok(())
}

/// Run `suite` for `iterations` rounds on a fresh document and average.
pub fn run(suite: Suite, iterations: u32) -> EngineResult<BenchmarkReport> {
    let iterations = iterations.max(1);
    let document = Document::new();
    let mut totals = BenchmarkResults::default();

    for _ in 0..iterations {
        match suite {
            Suite::Component => component_iteration(&document, &mut totals)?,
            Suite::Vanilla => vanilla_iteration(&document, &mut totals)?,
        }
    }

    let n = f64::from(iterations);
    let results = BenchmarkResults {
        rendering: RenderingTimings {
            render: totals.rendering.render / n,
        },
        event_handling: EventTimings {
            add_event_listener: totals.event_handling.add_event_listener / n,
            remove_event_listener: totals.event_handling.remove_event_listener / n,
        },
        dom_updates: UpdateTimings {
            set_content: totals.dom_updates.set_content / n,
            set_attributes: totals.dom_updates.set_attributes / n,
        },
    };
    debug!(suite = suite.as_str(), iterations, "Benchmark suite finished");

    Ok(BenchmarkReport {
        suite,
        iterations,
        results,
    })
}
