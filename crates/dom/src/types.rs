pub type NodeId = u32;

/// Per-document node identity, assigned in document order. `Id(0)` means
/// "not yet assigned".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Id(pub NodeId);

impl Id {
    pub const UNSET: Id = Id(0);
}

/// Element namespace. Graphics-markup tags live in a distinct namespace
/// from ordinary markup elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
}

const SVG_TAGS: [&str; 8] = [
    "svg", "circle", "ellipse", "line", "path", "polygon", "polyline", "rect",
];

impl Namespace {
    /// Namespace a freshly created element with this tag belongs to.
    pub fn for_tag(name: &str) -> Self {
        if SVG_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t)) {
            Namespace::Svg
        } else {
            Namespace::Html
        }
    }
}

/// Rule texts attached to a style-bearing element.
///
/// The parser populates this for `<style>` bodies; embedders may mutate it
/// to model rules inserted programmatically, which never show up in the
/// element's serialized markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSheet {
    pub rules: Vec<String>,
}

impl StyleSheet {
    /// Split a stylesheet body into rule texts, tracking brace depth so
    /// nested blocks (`@media` and friends) stay one rule.
    pub fn from_css(css: &str) -> Self {
        let mut rules = Vec::new();
        let mut depth = 0usize;
        let mut start = 0usize;
        for (i, c) in css.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let rule = css[start..=i].trim();
                        if !rule.is_empty() {
                            rules.push(rule.to_string());
                        }
                        start = i + 1;
                    }
                }
                _ => {}
            }
        }
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Document {
        id: Id,
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        id: Id,
        name: String,
        namespace: Namespace,
        attributes: Vec<(String, Option<String>)>,
        sheet: Option<StyleSheet>,
        children: Vec<Node>,
    },
    Text {
        id: Id,
        text: String,
    },
    Comment {
        id: Id,
        text: String,
    },
}

impl Node {
    pub fn id(&self) -> Id {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn set_id(&mut self, new_id: Id) {
        match self {
            Node::Document { id, .. } => *id = new_id,
            Node::Element { id, .. } => *id = new_id,
            Node::Text { id, .. } => *id = new_id,
            Node::Comment { id, .. } => *id = new_id,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Node::Document { .. })
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment { .. })
    }

    /// Tag name for elements, `None` for every other kind.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Text payload of text and comment nodes.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Text { text, .. } | Node::Comment { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Replace the entire text payload of a text or comment node.
    /// No-op for other kinds.
    pub fn set_text(&mut self, new_text: &str) {
        if let Node::Text { text, .. } | Node::Comment { text, .. } = self {
            new_text.clone_into(text);
        }
    }

    pub fn attributes(&self) -> Option<&[(String, Option<String>)]> {
        match self {
            Node::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Set an attribute on an element, replacing an existing value in place
    /// so attribute order is preserved. No-op for non-elements.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let Node::Element { attributes, .. } = self else {
            return;
        };
        for (k, v) in attributes.iter_mut() {
            if k.eq_ignore_ascii_case(name) {
                *v = Some(value.to_string());
                return;
            }
        }
        attributes.push((name.to_ascii_lowercase(), Some(value.to_string())));
    }

    /// Remove an attribute from an element. No-op when absent or for
    /// non-elements.
    pub fn remove_attribute(&mut self, name: &str) {
        if let Node::Element { attributes, .. } = self {
            attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        }
    }

    pub fn sheet(&self) -> Option<&StyleSheet> {
        match self {
            Node::Element { sheet, .. } => sheet.as_ref(),
            _ => None,
        }
    }

    pub fn sheet_mut(&mut self) -> Option<&mut Option<StyleSheet>> {
        match self {
            Node::Element { sheet, .. } => Some(sheet),
            _ => None,
        }
    }

    /// Structural equality ignoring ids and attached sheets.
    ///
    /// Attribute list order is significant, matching how the serializer
    /// emits them.
    pub fn content_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (
                Node::Document {
                    doctype: a,
                    children: ac,
                    ..
                },
                Node::Document {
                    doctype: b,
                    children: bc,
                    ..
                },
            ) => a == b && children_eq(ac, bc),
            (
                Node::Element {
                    name: an,
                    namespace: ans,
                    attributes: aa,
                    children: ac,
                    ..
                },
                Node::Element {
                    name: bn,
                    namespace: bns,
                    attributes: ba,
                    children: bc,
                    ..
                },
            ) => an.eq_ignore_ascii_case(bn) && ans == bns && aa == ba && children_eq(ac, bc),
            (Node::Text { text: a, .. }, Node::Text { text: b, .. }) => a == b,
            (Node::Comment { text: a, .. }, Node::Comment { text: b, .. }) => a == b,
            _ => false,
        }
    }
}

fn children_eq(a: &[Node], b: &[Node]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
}

/// Assign document-order ids to every node that does not have one yet.
/// Safe to re-run after inserting new nodes.
pub fn assign_node_ids(root: &mut Node) {
    fn walk(node: &mut Node, next: &mut NodeId) {
        if node.id() == Id::UNSET {
            node.set_id(Id(*next));
            *next = next.wrapping_add(1);
        }
        if let Some(children) = node.children_mut() {
            for c in children {
                walk(c, next);
            }
        }
    }

    let mut next = highest_id(root).wrapping_add(1).max(1);
    walk(root, &mut next);
}

fn highest_id(node: &Node) -> NodeId {
    let mut high = node.id().0;
    if let Some(children) = node.children() {
        for c in children {
            high = high.max(highest_id(c));
        }
    }
    high
}

pub fn find_node_by_id(node: &Node, id: Id) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    if let Some(children) = node.children() {
        for c in children {
            if let Some(found) = find_node_by_id(c, id) {
                return Some(found);
            }
        }
    }
    None
}
