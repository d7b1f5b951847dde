//! Minimal CSS selector support.
//!
//! Covers what host markup contracts use: tag names, `#id`, `.class`,
//! `[attr]`, `[attr="value"]`, compounds of those, and the descendant
//! combinator (whitespace).

use std::fmt;

use crate::dom::DomError;

/// Attribute condition inside `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: String,
    pub value: Option<String>,
}

/// One compound selector, e.g. `button.cta[data-block-button]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeMatch>,
}

impl Compound {
    /// Check a single element against this compound.
    pub fn matches<'a>(
        &self,
        tag: &str,
        attribute: impl Fn(&str) -> Option<&'a str>,
    ) -> bool {
        if let Some(expected) = &self.tag {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if attribute("id") != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let class_attr = attribute("class").unwrap_or("");
            let present: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
                return false;
            }
        }

        self.attributes.iter().all(|a| match (&a.value, attribute(&a.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }

    /// Attributes an element needs to satisfy this compound, in the order
    /// they should be written (id, class, then attribute conditions).
    pub fn required_attributes(&self) -> Vec<(String, String)> {
        let mut attrs = Vec::new();
        if let Some(id) = &self.id {
            attrs.push(("id".to_string(), id.clone()));
        }
        if !self.classes.is_empty() {
            attrs.push(("class".to_string(), self.classes.join(" ")));
        }
        for a in &self.attributes {
            attrs.push((a.name.clone(), a.value.clone().unwrap_or_default()));
        }
        attrs
    }
}

/// A parsed selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Compound>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(DomError::InvalidSelector(input.to_string()));
        }

        let mut compounds = Vec::new();
        let mut rest = source;
        while !rest.is_empty() {
            let (compound, remaining) = parse_compound(rest, source)?;
            compounds.push(compound);
            rest = remaining.trim_start();
        }

        Ok(Self {
            source: source.to_string(),
            compounds,
        })
    }

    /// The compounds, outermost first.
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// The innermost compound: what the matched element itself must satisfy.
    pub fn subject(&self) -> &Compound {
        // parse() never produces an empty list
        &self.compounds[self.compounds.len() - 1]
    }

    /// The selector text.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_name<'a>(input: &'a str, source: &str) -> Result<(&'a str, &'a str), DomError> {
    let end = input
        .char_indices()
        .find(|(_, c)| !is_name_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    if end == 0 {
        return Err(DomError::InvalidSelector(source.to_string()));
    }
    Ok((&input[..end], &input[end..]))
}

fn parse_compound<'a>(input: &'a str, source: &str) -> Result<(Compound, &'a str), DomError> {
    let mut compound = Compound::default();
    let mut rest = input;

    if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        let (tag, remaining) = take_name(rest, source)?;
        compound.tag = Some(tag.to_ascii_lowercase());
        rest = remaining;
    } else if let Some(remaining) = rest.strip_prefix('*') {
        rest = remaining;
    }

    loop {
        match rest.chars().next() {
            Some('#') => {
                let (id, remaining) = take_name(&rest[1..], source)?;
                compound.id = Some(id.to_string());
                rest = remaining;
            }
            Some('.') => {
                let (class, remaining) = take_name(&rest[1..], source)?;
                compound.classes.push(class.to_string());
                rest = remaining;
            }
            Some('[') => {
                let close = rest
                    .find(']')
                    .ok_or_else(|| DomError::InvalidSelector(source.to_string()))?;
                compound.attributes.push(parse_attribute(&rest[1..close], source)?);
                rest = &rest[close + 1..];
            }
            Some(c) if c.is_whitespace() => break,
            None => break,
            Some(_) => return Err(DomError::InvalidSelector(source.to_string())),
        }
    }

    if compound == Compound::default() && !input.starts_with('*') {
        return Err(DomError::InvalidSelector(source.to_string()));
    }

    Ok((compound, rest))
}

fn parse_attribute(body: &str, source: &str) -> Result<AttributeMatch, DomError> {
    let body = body.trim();
    match body.split_once('=') {
        None => {
            let (name, rest) = take_name(body, source)?;
            if !rest.is_empty() {
                return Err(DomError::InvalidSelector(source.to_string()));
            }
            Ok(AttributeMatch {
                name: name.to_string(),
                value: None,
            })
        }
        Some((name, value)) => {
            let (name, rest) = take_name(name.trim(), source)?;
            if !rest.is_empty() {
                return Err(DomError::InvalidSelector(source.to_string()));
            }
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Ok(AttributeMatch {
                name: name.to_string(),
                value: Some(unquoted.to_string()),
            })
        }
    }
}
