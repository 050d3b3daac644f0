//! Text helpers shared by the widgets.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NOT_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s]").unwrap());
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_]").unwrap());

/// Combining diacritical marks, U+0300 to U+036F.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Turn a human label into an identifier-safe token.
///
/// Accents are stripped, the text is lowercased, runs of whitespace become a
/// single separator, punctuation is dropped and every separator is written as
/// `_`. `"Método de Pagamento"` becomes `"metodo_de_pagamento"`.
pub fn clean_text(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lowered = stripped.to_lowercase();
    let collapsed = WHITESPACE.replace_all(&lowered, " ");
    let words = NOT_WORD.replace_all(&collapsed, "");
    SEPARATOR.replace_all(&words, "_").into_owned()
}
