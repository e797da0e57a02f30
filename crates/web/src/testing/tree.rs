//! Arena node tree with a forgiving HTML fragment parser.
//!
//! Covers the markup the storefront renders: elements, attributes, text,
//! comments and void elements. No implied end tags, no raw-text elements.

// Byte offsets below always come from `find` on the same string, at ASCII
// delimiters.
#![allow(clippy::indexing_slicing)]

use crate::dom::InsertPosition;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Root,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    /// Form control value, seeded from the `value` attribute.
    pub value: String,
}

impl ElementData {
    fn new(tag: String, attrs: Vec<(String, String)>) -> Self {
        let value = attrs
            .iter()
            .find(|(name, _)| name == "value")
            .map(|(_, value)| value.clone())
            .unwrap_or_default();
        Self { tag, attrs, value }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

#[derive(Debug)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
            root: NodeId(0),
        }
    }

    pub fn parse(html: &str) -> Self {
        let mut tree = Self::new();
        let root = tree.root;
        let children = tree.parse_fragment(html);
        tree.insert_children(root, 0, &children);
        tree
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id).kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Parent node if it is an element (the root is not).
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .parent
            .filter(|parent| self.element(*parent).is_some())
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Element descendants of `id` in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.node(id).children {
            if self.element(*child).is_some() {
                out.push(*child);
                self.collect_descendants(*child, out);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.element(id)
            .and_then(|element| element.attr(name))
            .map(str::to_string)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            match element.attrs.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => element.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.element_mut(id) {
            element.attrs.retain(|(n, _)| n != name);
        }
    }

    // -------------------------------------------------------------------------
    // Content
    // -------------------------------------------------------------------------

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.node(id).kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Root | NodeKind::Element(_) => self
                .node(id)
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }

    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            let node = self.create(NodeKind::Text(text.to_string()));
            self.insert_children(id, 0, &[node]);
        }
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in &self.node(id).children {
            self.write_node(*child, &mut out);
        }
        out
    }

    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        self.clear_children(id);
        let children = self.parse_fragment(html);
        self.insert_children(id, 0, &children);
    }

    pub fn insert_adjacent_html(&mut self, id: NodeId, position: InsertPosition, html: &str) {
        let (parent, index) = match position {
            InsertPosition::AfterBegin => (id, 0),
            InsertPosition::BeforeEnd => (id, self.node(id).children.len()),
            InsertPosition::BeforeBegin | InsertPosition::AfterEnd => {
                let Some(parent) = self.node(id).parent else {
                    return;
                };
                let Some(index) = self.child_index(parent, id) else {
                    return;
                };
                let offset = usize::from(position == InsertPosition::AfterEnd);
                (parent, index + offset)
            }
        };
        let nodes = self.parse_fragment(html);
        self.insert_children(parent, index, &nodes);
    }

    /// Remove `id` from its parent. The subtree stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|child| *child != id);
        }
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.node(parent).children.iter().position(|c| *c == child)
    }

    fn clear_children(&mut self, id: NodeId) {
        for child in std::mem::take(&mut self.node_mut(id).children) {
            self.node_mut(child).parent = None;
        }
    }

    fn insert_children(&mut self, parent: NodeId, index: usize, nodes: &[NodeId]) {
        for (offset, node) in nodes.iter().enumerate() {
            self.node_mut(*node).parent = Some(parent);
            self.node_mut(parent).children.insert(index + offset, *node);
        }
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    fn append(&mut self, parent: Option<NodeId>, node: NodeId, top: &mut Vec<NodeId>) {
        match parent {
            Some(parent) => {
                let index = self.node(parent).children.len();
                self.insert_children(parent, index, &[node]);
            }
            None => top.push(node),
        }
    }

    // -------------------------------------------------------------------------
    // Parsing
    // -------------------------------------------------------------------------

    /// Parse `html` into detached top-level nodes.
    fn parse_fragment(&mut self, html: &str) -> Vec<NodeId> {
        let mut top = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();
        let mut rest = html;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("<!--") {
                rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            } else if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').unwrap_or(after.len());
                let tag = after[..end].trim().to_ascii_lowercase();
                rest = after.get(end + 1..).unwrap_or("");
                let position = open
                    .iter()
                    .rposition(|id| self.element(*id).is_some_and(|e| e.tag == tag));
                if let Some(position) = position {
                    open.truncate(position);
                }
            } else if let Some(after) = rest.strip_prefix("<!") {
                let end = after.find('>').unwrap_or(after.len());
                rest = after.get(end + 1..).unwrap_or("");
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                let (tag, attrs, self_closing, after) = parse_start_tag(rest);
                let is_void = self_closing || VOID_ELEMENTS.contains(&tag.as_str());
                let node = self.create(NodeKind::Element(ElementData::new(tag, attrs)));
                self.append(open.last().copied(), node, &mut top);
                if !is_void {
                    open.push(node);
                }
                rest = after;
            } else {
                let end = rest
                    .char_indices()
                    .skip(1)
                    .find(|(_, c)| *c == '<')
                    .map_or(rest.len(), |(i, _)| i);
                let node = self.create(NodeKind::Text(decode_entities(&rest[..end])));
                self.append(open.last().copied(), node, &mut top);
                rest = &rest[end..];
            }
        }

        top
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    pub fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Root => {
                for child in &self.node(id).children {
                    self.write_node(*child, out);
                }
            }
            NodeKind::Text(text) => out.push_str(&escape(text, false)),
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                for child in &self.node(id).children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

fn parse_start_tag(src: &str) -> (String, Vec<(String, String)>, bool, &str) {
    let body = &src[1..];
    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(body.len());
    let tag = body[..name_end].to_ascii_lowercase();
    let mut rest = &body[name_end..];
    let mut attrs: Vec<(String, String)> = Vec::new();

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("/>") {
            return (tag, attrs, true, after);
        }
        if let Some(after) = rest.strip_prefix('>') {
            return (tag, attrs, false, after);
        }
        if rest.is_empty() {
            return (tag, attrs, false, rest);
        }
        if let Some(after) = rest.strip_prefix(['/', '=']) {
            rest = after;
            continue;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            if let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') {
                let inner = &after[1..];
                let end = inner.find(quote).unwrap_or(inner.len());
                value = decode_entities(&inner[..end]);
                rest = inner.get(end + 1..).unwrap_or("");
            } else {
                let end = after
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(after.len());
                value = decode_entities(&after[..end]);
                rest = &after[end..];
            }
        }

        if !attrs.iter().any(|(n, _)| *n == name) {
            attrs.push((name, value));
        }
    }
}

fn decode_entities(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(position) = rest.find('&') {
        out.push_str(&rest[..position]);
        let after = &rest[position + 1..];
        let decoded = after
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&after[..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let codepoint = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(codepoint)
        }
    }
}

fn escape(text: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !in_attribute => out.push_str("&lt;"),
            '>' if !in_attribute => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn first_element(tree: &Tree) -> NodeId {
        tree.descendants(tree.root())[0]
    }

    #[test]
    fn test_parse_nested_markup() {
        let tree = Tree::parse(
            r#"<!DOCTYPE html><div class="container"><!-- note --><p>Hi <b>there</b></p><img src="a.png" alt=x><br/></div>"#,
        );
        let div = first_element(&tree);

        assert_eq!(tree.element(div).unwrap().tag, "div");
        assert_eq!(tree.text_content(div), "Hi there");
        assert_eq!(
            tree.inner_html(div),
            r#"<p>Hi <b>there</b></p><img src="a.png" alt="x"><br>"#
        );
    }

    #[test]
    fn test_entities_round_trip_through_text() {
        let tree = Tree::parse("<p title=\"a &quot;b&quot;\">1 &lt; 2 &amp;&#39;&#x2F; &bogus;</p>");
        let p = first_element(&tree);

        assert_eq!(tree.text_content(p), "1 < 2 &'/ &bogus;");
        assert_eq!(tree.attr(p, "title").unwrap(), "a \"b\"");
        assert_eq!(tree.inner_html(p), "1 &lt; 2 &amp;'/ &amp;bogus;");
    }

    #[test]
    fn test_unmatched_end_tags_are_ignored() {
        let tree = Tree::parse("<div><span>a</em></span>b</div>");
        let div = first_element(&tree);
        assert_eq!(tree.inner_html(div), "<span>a</span>b");
    }

    #[test]
    fn test_input_value_seeded_from_attribute() {
        let tree = Tree::parse(r#"<input class="quantity-input" value="3">"#);
        let input = first_element(&tree);
        assert_eq!(tree.element(input).unwrap().value, "3");
    }

    #[test]
    fn test_insert_adjacent_positions() {
        let mut tree = Tree::parse("<ul><li>b</li></ul>");
        let ul = first_element(&tree);
        let li = tree.descendants(ul)[0];

        tree.insert_adjacent_html(ul, InsertPosition::AfterBegin, "<li>a</li>");
        tree.insert_adjacent_html(ul, InsertPosition::BeforeEnd, "<li>d</li>");
        tree.insert_adjacent_html(li, InsertPosition::AfterEnd, "<li>c</li>");
        tree.insert_adjacent_html(ul, InsertPosition::BeforeBegin, "<h2>list</h2>");

        let mut html = String::new();
        tree.write_node(tree.root(), &mut html);
        assert_eq!(
            html,
            "<h2>list</h2><ul><li>a</li><li>b</li><li>c</li><li>d</li></ul>"
        );
    }

    #[test]
    fn test_detach() {
        let mut tree = Tree::parse("<div><p>gone</p></div>");
        let div = first_element(&tree);
        let p = tree.descendants(div)[0];

        tree.detach(p);
        assert!(!tree.is_attached(p));
        assert!(tree.is_attached(div));
        assert_eq!(tree.inner_html(div), "");
    }
}
