//! Location-path queries over a streamed XML document.
//!
//! Supports the subset of XPath the job presets need:
//! - steps joined by `/` (child) or `//` (descendant), starting at the root;
//! - element name tests, including `*`;
//! - one optional predicate per step, either `[@attr="v"]` or
//!   `[contains(@attr,"v")]`, with single or double quoted literals.
//!
//! Evaluation is a single pass over `quick-xml` events. Each open element
//! records which step prefixes it satisfies, so a node is selected at most
//! once and results come out in document order. The text of a selected node
//! is the concatenation of all text and CDATA below it, with line breaks
//! normalized to `\n`. General entities declared in the internal DTD subset
//! are expanded in text and attribute values.

use crate::error::{GlossError, Result};
use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::collections::HashMap;

/// General entities from the internal DTD subset, name to replacement text.
type Entities = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Name(String),
}

impl NameTest {
    fn matches(&self, name: &[u8]) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Name(n) => n.as_bytes() == name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    AttrEquals { attr: String, value: String },
    AttrContains { attr: String, value: String },
}

impl Predicate {
    fn matches(
        &self,
        e: &BytesStart,
        entities: &Entities,
    ) -> std::result::Result<bool, quick_xml::Error> {
        let attr = match self {
            Predicate::AttrEquals { attr, .. } | Predicate::AttrContains { attr, .. } => attr,
        };
        for a in e.attributes() {
            let a = a?;
            if a.key.as_ref() != attr.as_bytes() {
                continue;
            }
            let v = a.unescape_value_with(|name| resolve_entity(entities, name))?;
            return Ok(match self {
                Predicate::AttrEquals { value, .. } => v == value.as_str(),
                Predicate::AttrContains { value, .. } => v.contains(value.as_str()),
            });
        }
        Ok(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    name: NameTest,
    predicate: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    steps: Vec<Step>,
}

/// A well-formedness failure at a byte offset of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlFault {
    pub offset: usize,
    pub message: String,
}

impl XmlFault {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        XmlFault {
            offset,
            message: message.into(),
        }
    }
}

struct Frame {
    /// `matched[k]`: this element is selected by steps `0..=k`.
    matched: Vec<bool>,
    /// `within[k]`: this element or an ancestor has `matched[k]`.
    within: Vec<bool>,
    capturing: bool,
}

impl Query {
    /// Parse an expanded expression such as
    /// `//TIER[contains(@TIER_ID,"gl")]//ANNOTATION_VALUE`.
    pub fn parse(expr: &str) -> Result<Query> {
        let mut rest = expr.trim();
        if rest.is_empty() {
            return Err(query_err(expr, "empty expression"));
        }
        let mut steps = Vec::new();
        while !rest.is_empty() {
            let axis = if let Some(r) = rest.strip_prefix("//") {
                rest = r;
                Axis::Descendant
            } else if let Some(r) = rest.strip_prefix('/') {
                rest = r;
                Axis::Child
            } else {
                return Err(query_err(expr, "expected '/' or '//'"));
            };
            let (name, r) = take_name(rest);
            let name = match name {
                "" if r.starts_with('*') => {
                    rest = &r[1..];
                    NameTest::Any
                }
                "" => return Err(query_err(expr, "expected an element name")),
                n => {
                    rest = r;
                    NameTest::Name(n.to_string())
                }
            };
            let predicate = match rest.strip_prefix('[') {
                Some(r) => {
                    let (p, r) = parse_predicate(r).map_err(|m| query_err(expr, m))?;
                    rest = r;
                    Some(p)
                }
                None => None,
            };
            steps.push(Step {
                axis,
                name,
                predicate,
            });
        }
        Ok(Query { steps })
    }

    /// Evaluate against `src`, returning the text content of every selected
    /// element in document order.
    pub fn select_text(&self, src: &str) -> std::result::Result<Vec<String>, XmlFault> {
        let mut reader = Reader::from_str(src);
        let mut stack: Vec<Frame> = Vec::new();
        let mut results: Vec<String> = Vec::new();
        let mut active: Vec<usize> = Vec::new();
        let mut entities = Entities::new();
        let mut seen_root = false;

        loop {
            let ev = match reader.read_event() {
                Ok(ev) => ev,
                Err(e) => return Err(XmlFault::new(reader.buffer_position(), e.to_string())),
            };
            match ev {
                Event::Start(_) | Event::Empty(_) if stack.is_empty() && seen_root => {
                    return Err(XmlFault::new(
                        reader.buffer_position(),
                        "extra content after the root element",
                    ));
                }
                Event::Start(e) => {
                    seen_root = true;
                    let mut frame = self
                        .open(stack.last(), &e, &entities)
                        .map_err(|err| XmlFault::new(reader.buffer_position(), err.to_string()))?;
                    if self.selects(&frame) {
                        active.push(results.len());
                        results.push(String::new());
                        frame.capturing = true;
                    }
                    stack.push(frame);
                }
                Event::Empty(e) => {
                    seen_root = true;
                    let frame = self
                        .open(stack.last(), &e, &entities)
                        .map_err(|err| XmlFault::new(reader.buffer_position(), err.to_string()))?;
                    if self.selects(&frame) {
                        results.push(String::new());
                    }
                }
                Event::End(_) => {
                    let frame = stack.pop().ok_or_else(|| {
                        XmlFault::new(reader.buffer_position(), "closing tag without an open element")
                    })?;
                    if frame.capturing {
                        active.pop();
                    }
                }
                Event::DocType(d) => {
                    entities = internal_entities(&String::from_utf8_lossy(&d));
                }
                Event::Text(t) => {
                    let raw = String::from_utf8_lossy(&t);
                    let raw = normalize_newlines(&raw);
                    let text = unescape_with(&raw, |name| resolve_entity(&entities, name))
                        .map_err(|err| XmlFault::new(reader.buffer_position(), err.to_string()))?;
                    if stack.is_empty() {
                        if !text.trim().is_empty() {
                            return Err(XmlFault::new(
                                reader.buffer_position(),
                                "text outside the root element",
                            ));
                        }
                    } else {
                        for &i in &active {
                            results[i].push_str(&text);
                        }
                    }
                }
                Event::CData(c) => {
                    if stack.is_empty() {
                        return Err(XmlFault::new(
                            reader.buffer_position(),
                            "CDATA outside the root element",
                        ));
                    }
                    let text = String::from_utf8_lossy(&c);
                    let text = normalize_newlines(&text);
                    for &i in &active {
                        results[i].push_str(&text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlFault::new(
                src.len(),
                format!("unexpected end of document: {} unclosed element(s)", stack.len()),
            ));
        }
        if !seen_root {
            return Err(XmlFault::new(src.len(), "document has no root element"));
        }
        Ok(results)
    }

    fn selects(&self, frame: &Frame) -> bool {
        frame.matched.last().copied().unwrap_or(false)
    }

    fn open(
        &self,
        parent: Option<&Frame>,
        e: &BytesStart,
        entities: &Entities,
    ) -> std::result::Result<Frame, quick_xml::Error> {
        let n = self.steps.len();
        let mut matched = vec![false; n];
        let mut within = vec![false; n];
        let name = e.name();
        for (k, step) in self.steps.iter().enumerate() {
            let reachable = match (k, parent) {
                (0, None) => true,
                (0, Some(_)) => step.axis == Axis::Descendant,
                (_, None) => false,
                (_, Some(p)) => match step.axis {
                    Axis::Child => p.matched[k - 1],
                    Axis::Descendant => p.within[k - 1],
                },
            };
            matched[k] = reachable
                && step.name.matches(name.as_ref())
                && match &step.predicate {
                    Some(p) => p.matches(e, entities)?,
                    None => true,
                };
            within[k] = matched[k] || parent.map(|p| p.within[k]).unwrap_or(false);
        }
        Ok(Frame {
            matched,
            within,
            capturing: false,
        })
    }
}

/// Predefined XML entities first, then the document's own declarations.
fn resolve_entity<'a>(entities: &'a Entities, name: &str) -> Option<&'a str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => entities.get(name).map(String::as_str),
    }
}

/// Collect `<!ENTITY name "value">` declarations from a DOCTYPE body.
/// Parameter and external entities are skipped; the first declaration of a
/// name wins.
fn internal_entities(doctype: &str) -> Entities {
    let mut out = Entities::new();
    let mut rest = doctype;
    while let Some(i) = rest.find("<!ENTITY") {
        rest = rest[i + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }
        let (name, r) = take_name(rest);
        rest = r;
        if let Ok((value, r)) = parse_literal(r) {
            rest = r;
            if !name.is_empty() {
                out.entry(name.to_string()).or_insert(value);
            }
        }
    }
    out
}

/// `\r\n` and lone `\r` become `\n`, as an XML processor reports them.
fn normalize_newlines(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

fn query_err(expr: &str, msg: &str) -> GlossError {
    GlossError::Query(format!("{} in '{}'", msg, expr))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn take_name(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_name_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn take_token<'a>(s: &'a str, token: &str) -> std::result::Result<&'a str, &'static str> {
    s.trim_start().strip_prefix(token).ok_or(match token {
        "@" => "expected '@' before attribute name",
        "," => "expected ',' in contains()",
        ")" => "expected ')' to close contains()",
        "=" => "expected '=' in attribute test",
        "]" => "expected ']' to close predicate",
        _ => "unexpected token",
    })
}

fn parse_attr(s: &str) -> std::result::Result<(String, &str), &'static str> {
    let s = take_token(s, "@")?;
    let (name, rest) = take_name(s);
    if name.is_empty() {
        return Err("expected an attribute name");
    }
    Ok((name.to_string(), rest))
}

fn parse_literal(s: &str) -> std::result::Result<(String, &str), &'static str> {
    let s = s.trim_start();
    let quote = match s.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err("expected a quoted string"),
    };
    let body = &s[1..];
    let end = body.find(quote).ok_or("unterminated string literal")?;
    Ok((body[..end].to_string(), &body[end + 1..]))
}

fn parse_predicate(s: &str) -> std::result::Result<(Predicate, &str), &'static str> {
    let s = s.trim_start();
    let (pred, rest) = if let Some(r) = s.strip_prefix("contains(") {
        let (attr, r) = parse_attr(r)?;
        let r = take_token(r, ",")?;
        let (value, r) = parse_literal(r)?;
        let r = take_token(r, ")")?;
        (Predicate::AttrContains { attr, value }, r)
    } else if s.starts_with('@') {
        let (attr, r) = parse_attr(s)?;
        let r = take_token(r, "=")?;
        let (value, r) = parse_literal(r)?;
        (Predicate::AttrEquals { attr, value }, r)
    } else {
        return Err("unsupported predicate");
    };
    Ok((pred, take_token(rest, "]")?))
}
