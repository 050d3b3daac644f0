use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tessera_engine::{AppContext, Widget};
use tessera_widgets::{
    ApplicationPage, PageDescriptor, Request, Transport, WidgetResult,
};
use tracing::{debug, info};

pub const HOST_ID: &str = "app";

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page descriptor (JSON)
    pub descriptor: PathBuf,

    /// Write the HTML to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// JSON array of rows for the list table
    #[arg(long)]
    pub rows: Option<PathBuf>,

    /// Disable pretty printing
    #[arg(long)]
    pub compact: bool,
}

/// Answers every request with the same JSON document.
struct FileTransport {
    body: Value,
}

impl Transport for FileTransport {
    async fn send(&self, request: Request) -> WidgetResult<Value> {
        debug!(method = %request.method, path = %request.path, "Serving rows from file");
        Ok(self.body.clone())
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Build the page in a fresh document and serialize the whole document.
pub async fn render_page(
    descriptor: &PageDescriptor,
    rows: Option<Value>,
    config: &Config,
) -> Result<String> {
    let app = AppContext::new();
    let document = app.document();
    let host = document.create_element("main")?;
    document.set_attribute(host, "id", HOST_ID)?;
    document.append_child(document.body(), host)?;

    let page = ApplicationPage::new(&app, descriptor)?;
    page.form().component().set_attributes([
        ("action", config.submit_path.as_str()),
        ("method", "post"),
    ])?;
    page.mount(format!("#{HOST_ID}"))?;

    if let Some(body) = rows {
        let loaded = page.load_rows(&FileTransport { body }, "rows").await?;
        info!(rows = loaded, "Rows loaded");
    }

    Ok(document.to_html(document.root(), &config.html_options()))
}

pub async fn render(args: RenderArgs, cwd: &str, config: &Config) -> Result<()> {
    let base = PathBuf::from(cwd);
    let descriptor_path = base.join(&args.descriptor);
    let descriptor: PageDescriptor = serde_json::from_value(read_json(&descriptor_path)?)
        .with_context(|| format!("Invalid page descriptor {}", descriptor_path.display()))?;
    let rows = args
        .rows
        .as_ref()
        .map(|path| read_json(&base.join(path)))
        .transpose()?;

    let mut config = config.clone();
    if args.compact {
        config.pretty = false;
    }
    let html = render_page(&descriptor, rows, &config).await?;

    match args.out {
        Some(out) => {
            let out = base.join(out);
            fs::write(&out, &html)?;
            println!("  {} {} → {}", "✓".green(), args.descriptor.display(), out.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}
