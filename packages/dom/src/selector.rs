//! CSS selector subset used for target lookup.
//!
//! Supported: type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`
//! (value bare or quoted), descendant and `>` child combinators, and
//! comma-separated selector groups.

use crate::error::{DomError, DomResult};
use crate::node::ElementData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    groups: Vec<Vec<SelectorPart>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    /// Relation to the part on the left; ignored for the first part.
    pub(crate) combinator: Combinator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeCondition {
    Exists(String),
    Equals(String, String),
}

impl SelectorStep {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && !self.universal
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }

    pub(crate) fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attributes.iter().all(|condition| match condition {
            AttributeCondition::Exists(name) => element.attribute(name).is_some(),
            AttributeCondition::Equals(name, value) => {
                element.attribute(name) == Some(value.as_str())
            }
        })
    }
}

impl Selector {
    pub fn parse(source: &str) -> DomResult<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(DomError::invalid_selector(source, "empty selector"));
        }

        let groups = split_groups(trimmed)
            .into_iter()
            .map(|group| parse_group(group, source))
            .collect::<DomResult<Vec<_>>>()?;

        Ok(Self {
            source: source.to_string(),
            groups,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn groups(&self) -> &[Vec<SelectorPart>] {
        &self.groups
    }
}

/// Split on commas that are not inside an attribute condition.
fn split_groups(input: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (index, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                groups.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    groups.push(&input[start..]);
    groups
}

fn parse_group(group: &str, source: &str) -> DomResult<Vec<SelectorPart>> {
    let chars: Vec<char> = group.chars().collect();
    let mut pos = 0;
    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending: Option<Combinator> = None;

    loop {
        skip_whitespace(&chars, &mut pos);
        if pos >= chars.len() {
            break;
        }

        if chars[pos] == '>' {
            if parts.is_empty() || pending.is_some() {
                return Err(DomError::invalid_selector(source, "dangling '>' combinator"));
            }
            pending = Some(Combinator::Child);
            pos += 1;
            continue;
        }

        let combinator = pending.take().unwrap_or(Combinator::Descendant);
        let step = parse_step(&chars, &mut pos, source)?;
        parts.push(SelectorPart { step, combinator });
    }

    if parts.is_empty() {
        return Err(DomError::invalid_selector(source, "empty selector group"));
    }
    if pending.is_some() {
        return Err(DomError::invalid_selector(source, "selector ends with a combinator"));
    }
    Ok(parts)
}

fn parse_step(chars: &[char], pos: &mut usize, source: &str) -> DomResult<SelectorStep> {
    let mut step = SelectorStep::default();

    while *pos < chars.len() {
        let c = chars[*pos];
        match c {
            c if c.is_whitespace() || c == '>' => break,
            '*' => {
                if !step.is_empty() {
                    return Err(DomError::invalid_selector(source, "'*' must start a compound selector"));
                }
                step.universal = true;
                *pos += 1;
            }
            '#' => {
                *pos += 1;
                let id = read_identifier(chars, pos)
                    .ok_or_else(|| DomError::invalid_selector(source, "expected identifier after '#'"))?;
                step.id = Some(id);
            }
            '.' => {
                *pos += 1;
                let class = read_identifier(chars, pos)
                    .ok_or_else(|| DomError::invalid_selector(source, "expected class name after '.'"))?;
                step.classes.push(class);
            }
            '[' => {
                *pos += 1;
                step.attributes.push(parse_attribute(chars, pos, source)?);
            }
            c if is_identifier_char(c) => {
                if !step.is_empty() {
                    return Err(DomError::invalid_selector(source, "type selector must come first"));
                }
                step.tag = read_identifier(chars, pos);
            }
            other => {
                return Err(DomError::invalid_selector(
                    source,
                    format!("unsupported character '{other}'"),
                ));
            }
        }
    }

    if step.is_empty() {
        return Err(DomError::invalid_selector(source, "empty compound selector"));
    }
    Ok(step)
}

fn parse_attribute(chars: &[char], pos: &mut usize, source: &str) -> DomResult<AttributeCondition> {
    skip_whitespace(chars, pos);
    let name = read_identifier(chars, pos)
        .ok_or_else(|| DomError::invalid_selector(source, "expected attribute name"))?;
    skip_whitespace(chars, pos);

    let condition = match chars.get(*pos) {
        Some(']') => AttributeCondition::Exists(name),
        Some('=') => {
            *pos += 1;
            skip_whitespace(chars, pos);
            let value = match chars.get(*pos) {
                Some(&quote @ ('"' | '\'')) => {
                    *pos += 1;
                    let start = *pos;
                    while *pos < chars.len() && chars[*pos] != quote {
                        *pos += 1;
                    }
                    if *pos >= chars.len() {
                        return Err(DomError::invalid_selector(source, "unterminated quoted value"));
                    }
                    let value: String = chars[start..*pos].iter().collect();
                    *pos += 1;
                    value
                }
                _ => read_identifier(chars, pos)
                    .ok_or_else(|| DomError::invalid_selector(source, "expected attribute value"))?,
            };
            skip_whitespace(chars, pos);
            AttributeCondition::Equals(name, value)
        }
        _ => {
            return Err(DomError::invalid_selector(source, "unsupported attribute operator"));
        }
    };

    if chars.get(*pos) != Some(&']') {
        return Err(DomError::invalid_selector(source, "expected ']'"));
    }
    *pos += 1;
    Ok(condition)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_identifier(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_identifier_char(chars[*pos]) {
        *pos += 1;
    }
    (*pos > start).then(|| chars[start..*pos].iter().collect())
}

fn skip_whitespace(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}
