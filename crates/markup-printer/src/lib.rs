//! Markup Printer
//!
//! Turns a syntax tree back into markup text.
//!
//! ```text
//! Ast → print() → String
//! ```

use markup_parser::ast::{Ast, Doctype, Element, Node};

/// Print a syntax tree as markup.
pub fn print(ast: &Ast) -> String {
    let mut printer = Printer::default();
    printer.print_doctype(&ast.doctype);
    for node in &ast.nodes {
        printer.print_node(node);
    }
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn print(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// An empty value is left out together with its separating space.
    fn print_doctype(&mut self, doctype: &Doctype) {
        self.print("<!doctype ");
        self.print(&doctype.name);
        if !doctype.value.is_empty() {
            self.print(" ");
            self.print(&doctype.value);
        }
        self.print(">");
    }

    fn print_node(&mut self, node: &Node) {
        match node {
            Node::Comment(text) => {
                self.print("<!--");
                self.print(text);
                self.print("-->");
            }
            Node::Text(value) => self.print(value),
            Node::Element(element) => self.print_element(element),
        }
    }

    fn print_element(&mut self, element: &Element) {
        self.print("<");
        self.print(&element.tag_name);
        for property in &element.properties {
            self.print(" ");
            self.print(&property.key);
            self.print("=\"");
            self.print(&property.value);
            self.print("\"");
        }
        self.print(">");

        for child in &element.children {
            self.print_node(child);
        }

        self.print("</");
        self.print(&element.tag_name);
        self.print(">");
    }
}
