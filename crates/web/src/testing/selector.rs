//! CSS selector subset: type, `#id`, `.class`, `[attr]`, `[attr="v"]`, `*`,
//! descendant and child combinators, and comma-separated groups.

use super::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        let Some(element) = tree.element(node) else {
            return false;
        };

        self.tag
            .as_ref()
            .is_none_or(|tag| element.tag.eq_ignore_ascii_case(tag))
            && self
                .id
                .as_ref()
                .is_none_or(|id| element.attr("id") == Some(id.as_str()))
            && self.classes.iter().all(|class| element.has_class(class))
            && self.attrs.iter().all(|(name, expected)| {
                match (element.attr(name), expected) {
                    (Some(actual), Some(expected)) => actual == expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            })
    }
}

/// One complex selector: compounds joined by combinators, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        self.compounds
            .len()
            .checked_sub(1)
            .is_some_and(|last| self.matches_at(tree, node, last))
    }

    fn matches_at(&self, tree: &Tree, node: NodeId, index: usize) -> bool {
        let Some(compound) = self.compounds.get(index) else {
            return false;
        };
        if !compound.matches(tree, node) {
            return false;
        }
        let Some(previous) = index.checked_sub(1) else {
            return true;
        };

        match self.combinators.get(previous) {
            Some(Combinator::Child) => tree
                .parent_element(node)
                .is_some_and(|parent| self.matches_at(tree, parent, previous)),
            Some(Combinator::Descendant) => {
                let mut ancestor = tree.parent_element(node);
                while let Some(current) = ancestor {
                    if self.matches_at(tree, current, previous) {
                        return true;
                    }
                    ancestor = tree.parent_element(current);
                }
                false
            }
            None => false,
        }
    }
}

/// A parsed selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector(Vec<Complex>);

impl Selector {
    /// Parse a selector; `None` for anything outside the supported subset.
    pub fn parse(selector: &str) -> Option<Self> {
        let groups = split_outside_brackets(selector, ',')
            .into_iter()
            .map(parse_complex)
            .collect::<Option<Vec<_>>>()?;
        Some(Self(groups))
    }

    pub fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        self.0.iter().any(|complex| complex.matches(tree, node))
    }
}

fn parse_complex(source: &str) -> Option<Complex> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(source) {
        if token == ">" {
            pending = Some(Combinator::Child);
            continue;
        }
        if !compounds.is_empty() {
            combinators.push(pending.take().unwrap_or(Combinator::Descendant));
        } else if pending.is_some() {
            return None;
        }
        compounds.push(parse_compound(&token)?);
    }

    if compounds.is_empty() || pending.is_some() {
        return None;
    }
    Some(Complex {
        compounds,
        combinators,
    })
}

/// Split into compound tokens and `>`, keeping bracketed text intact.
fn tokenize(source: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0_u32;
    let mut quote: Option<char> = None;

    for c in source.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), _) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                current.push(c);
            }
            (None, '[') => {
                depth += 1;
                current.push(c);
            }
            (None, ']') => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            (None, '>') if depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(">".to_string());
            }
            (None, c) if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, _) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_compound(token: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut chars = token.chars().peekable();

    match chars.peek() {
        Some('*') => {
            chars.next();
        }
        Some(c) if is_ident_char(*c) => compound.tag = Some(read_ident(&mut chars)?),
        _ => {}
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => compound.id = Some(read_ident(&mut chars)?),
            '.' => compound.classes.push(read_ident(&mut chars)?),
            '[' => {
                let mut inner = String::new();
                let mut quote: Option<char> = None;
                loop {
                    let c = chars.next()?;
                    match quote {
                        Some(q) if c == q => quote = None,
                        None if c == '"' || c == '\'' => quote = Some(c),
                        None if c == ']' => break,
                        _ => {}
                    }
                    inner.push(c);
                }
                compound.attrs.push(parse_attribute(&inner)?);
            }
            _ => return None,
        }
    }

    Some(compound)
}

fn parse_attribute(inner: &str) -> Option<(String, Option<String>)> {
    match inner.split_once('=') {
        None => {
            let name = inner.trim();
            (!name.is_empty()).then(|| (name.to_ascii_lowercase(), None))
        }
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (!name.is_empty()).then(|| (name.to_ascii_lowercase(), Some(value.to_string())))
        }
    }
}

fn read_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(c) = chars.next_if(|c| is_ident_char(*c)) {
        ident.push(c);
    }
    (!ident.is_empty()).then_some(ident)
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn split_outside_brackets(source: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_u32;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(source.get(start..i).unwrap_or_default());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(source.get(start..).unwrap_or_default());
    parts
}
