//! Network and notification seams used by forms and tables.
//!
//! Widgets never talk to a network stack directly. A [`Transport`] performs
//! the request and hands back the decoded JSON body; a [`Notifier`] stands in
//! for whatever surfaces messages to the user.

use std::fmt;

use serde_json::Value;
use tracing::info;

use crate::error::WidgetResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// An outgoing request. Form bodies are name/value pairs in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            headers: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn form(mut self, data: Vec<(String, String)>) -> Self {
        self.form = data;
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Sends requests and returns the JSON response body.
///
/// Futures are polled on a single thread, so implementations are free to
/// hold `Rc` state across awaits.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: Request) -> WidgetResult<Value>;
}

/// Surfaces a message to the user.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!(message, "Notification");
    }
}
