//! Syntax tree for markup documents.

/// A parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ast {
    pub doctype: Doctype,
    /// Content after the doctype. No grammar rule fills this yet.
    pub nodes: Vec<Node>,
}

/// A `<!doctype name value>` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    /// Optional, may be empty.
    pub value: String,
}

/// A node in the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `<!-- text -->`
    Comment(String),

    /// Character data between tags.
    Text(String),

    /// An element with its properties and children.
    Element(Element),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag_name: String,
    pub properties: Vec<Property>,
    pub children: Vec<Node>,
}

/// A `key="value"` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: String,
}
