//! Minimal selector support.
//!
//! Grammar (whitespace around commas is ignored):
//!
//! ```text
//! list     := compound ("," compound)*
//! compound := tag? (class | attr)*
//! class    := "." ident
//! attr     := "[" ident (("=" | "*=") value)? "]"
//! value    := ident | '"' chars '"' | "'" chars "'"
//! ```
//!
//! Combinators and pseudo-classes are rejected with [`SelectorError`].

use crate::document::{Document, ElementData};
use crate::types::Id;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    UnexpectedChar { pos: usize, ch: char },
    UnterminatedString { pos: usize },
    UnterminatedAttribute { pos: usize },
    Unsupported { pos: usize, what: &'static str },
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectorError::Empty => f.write_str("empty selector"),
            SelectorError::UnexpectedChar { pos, ch } => {
                write!(f, "unexpected character {ch:?} at {pos}")
            }
            SelectorError::UnterminatedString { pos } => {
                write!(f, "unterminated string starting at {pos}")
            }
            SelectorError::UnterminatedAttribute { pos } => {
                write!(f, "unterminated attribute selector starting at {pos}")
            }
            SelectorError::Unsupported { pos, what } => {
                write!(f, "unsupported selector syntax at {pos}: {what}")
            }
        }
    }
}

impl std::error::Error for SelectorError {}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

impl Compound {
    fn matches(&self, el: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && !el.name.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if !self.classes.is_empty() {
            let class_attr = el.attr("class").unwrap_or("");
            if !self
                .classes
                .iter()
                .all(|c| class_attr.split_ascii_whitespace().any(|h| h == c))
            {
                return false;
            }
        }
        self.attrs.iter().all(|m| match &m.op {
            AttrOp::Exists => el.has_attr(&m.name),
            AttrOp::Equals(v) => el.attr(&m.name) == Some(v.as_str()),
            AttrOp::Contains(v) => {
                !v.is_empty() && el.attr(&m.name).is_some_and(|a| a.contains(v.as_str()))
            }
        })
    }
}

/// A parsed, comma-separated selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    compounds: Vec<Compound>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// `[name]`
    pub fn attribute(name: &str) -> Self {
        Self::single(Compound {
            attrs: vec![AttrMatcher {
                name: name.to_string(),
                op: AttrOp::Exists,
            }],
            ..Compound::default()
        })
    }

    /// `[name="value"]`
    pub fn attribute_eq(name: &str, value: &str) -> Self {
        Self::single(Compound {
            attrs: vec![AttrMatcher {
                name: name.to_string(),
                op: AttrOp::Equals(value.to_string()),
            }],
            ..Compound::default()
        })
    }

    pub fn tag(name: &str) -> Self {
        Self::single(Compound {
            tag: Some(name.to_string()),
            ..Compound::default()
        })
    }

    fn single(compound: Compound) -> Self {
        Self {
            compounds: vec![compound],
        }
    }

    fn matches_element(&self, el: &ElementData) -> bool {
        self.compounds.iter().any(|c| c.matches(el))
    }
}

/// Serializes a value as a double-quoted selector string.
pub fn quote_selector_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

impl Document {
    pub fn matches(&self, id: Id, selector: &SelectorList) -> bool {
        self.element(id).is_ok_and(|el| selector.matches_element(el))
    }

    /// Nearest inclusive ancestor of `id` matching `selector`.
    pub fn closest(&self, id: Id, selector: &SelectorList) -> Option<Id> {
        self.ancestors(id).find(|a| self.matches(*a, selector))
    }

    /// First descendant of `scope` in document order matching `selector`.
    pub fn query_selector(&self, scope: Id, selector: &SelectorList) -> Option<Id> {
        self.descendants(scope).find(|d| self.matches(*d, selector))
    }

    pub fn query_selector_all(&self, scope: Id, selector: &SelectorList) -> Vec<Id> {
        self.descendants(scope)
            .filter(|d| self.matches(*d, selector))
            .collect()
    }
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self {
            chars: src.char_indices().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|(i, _)| *i)
            .unwrap_or_else(|| self.chars.last().map(|(i, c)| i + c.len_utf8()).unwrap_or(0))
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut compounds = Vec::new();
        loop {
            self.skip_ws();
            compounds.push(self.parse_compound()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => {
                    self.pos += 1;
                }
                Some(ch) if is_combinator(ch) || ch.is_alphanumeric() || ch == '[' || ch == '.' => {
                    return Err(SelectorError::Unsupported {
                        pos: self.offset(),
                        what: "combinators",
                    });
                }
                Some(ch) => {
                    return Err(SelectorError::UnexpectedChar {
                        pos: self.offset(),
                        ch,
                    });
                }
            }
        }
        Ok(SelectorList { compounds })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let start = self.pos;
        if self.peek() == Some('*') {
            self.pos += 1;
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident());
        }
        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    let class = self.ident();
                    if class.is_empty() {
                        return Err(self.unexpected());
                    }
                    compound.classes.push(class);
                }
                Some('[') => compound.attrs.push(self.parse_attr()?),
                Some(':') => {
                    return Err(SelectorError::Unsupported {
                        pos: self.offset(),
                        what: "pseudo-classes",
                    });
                }
                _ => break,
            }
        }
        if self.pos == start {
            return match self.peek() {
                None => Err(SelectorError::Empty),
                Some(_) => Err(self.unexpected()),
            };
        }
        Ok(compound)
    }

    fn parse_attr(&mut self) -> Result<AttrMatcher, SelectorError> {
        let open = self.offset();
        self.pos += 1; // '['
        self.skip_ws();
        let name = self.ident();
        if name.is_empty() {
            return Err(self.unexpected_or_unterminated(open));
        }
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrMatcher {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => {
                self.pos += 1;
                AttrOp::Equals(self.parse_value(open)?)
            }
            Some('*') => {
                self.pos += 1;
                if self.bump() != Some('=') {
                    return Err(self.unexpected_or_unterminated(open));
                }
                AttrOp::Contains(self.parse_value(open)?)
            }
            Some('^' | '$' | '~' | '|') => {
                return Err(SelectorError::Unsupported {
                    pos: self.offset(),
                    what: "attribute operator",
                });
            }
            _ => return Err(self.unexpected_or_unterminated(open)),
        };
        self.skip_ws();
        if self.bump() != Some(']') {
            return Err(SelectorError::UnterminatedAttribute { pos: open });
        }
        Ok(AttrMatcher { name, op })
    }

    fn parse_value(&mut self, open: usize) -> Result<String, SelectorError> {
        self.skip_ws();
        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                let start = self.offset();
                self.pos += 1;
                let mut out = String::new();
                loop {
                    match self.bump() {
                        None => return Err(SelectorError::UnterminatedString { pos: start }),
                        Some('\\') => match self.bump() {
                            Some(c) => out.push(c),
                            None => return Err(SelectorError::UnterminatedString { pos: start }),
                        },
                        Some(c) if c == q => break,
                        Some(c) => out.push(c),
                    }
                }
                Ok(out)
            }
            Some(c) if is_ident_char(c) => Ok(self.ident()),
            _ => Err(self.unexpected_or_unterminated(open)),
        }
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|c| is_ident_char(*c)) {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar {
                pos: self.offset(),
                ch,
            },
            None => SelectorError::Empty,
        }
    }

    fn unexpected_or_unterminated(&self, open: usize) -> SelectorError {
        match self.peek() {
            None => SelectorError::UnterminatedAttribute { pos: open },
            Some(_) => self.unexpected(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn is_combinator(c: char) -> bool {
    matches!(c, '>' | '+' | '~')
}
