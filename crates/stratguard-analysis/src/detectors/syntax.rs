//! Small tree-sitter helpers for Python trees.

use tree_sitter::Node;

/// Source text of a node, or `""` when it is not valid UTF-8.
pub fn node_text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// 0-based start row.
pub fn row(node: Node) -> usize {
    node.start_position().row
}

pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// The definition inside a `decorated_definition`, or the node itself.
pub fn unwrap_decorated(node: Node) -> Node {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

/// Statements of a class or function body, comments excluded.
pub fn body_statements<'t>(def: Node<'t>) -> Vec<Node<'t>> {
    def.child_by_field_name("body")
        .map(|body| {
            named_children(body)
                .into_iter()
                .filter(|n| n.kind() != "comment")
                .collect()
        })
        .unwrap_or_default()
}

/// Name of a `function_definition` or `class_definition`.
pub fn def_name<'s>(def: Node, source: &'s [u8]) -> &'s str {
    def.child_by_field_name("name")
        .map(|n| node_text(n, source))
        .unwrap_or("")
}

/// Whether a statement is a bare string literal (a docstring).
pub fn is_docstring(stmt: Node) -> bool {
    stmt.kind() == "expression_statement"
        && stmt.named_child_count() == 1
        && stmt.named_child(0).is_some_and(|c| c.kind() == "string")
}

/// `self.<field>` exactly.
pub fn is_self_attribute(node: Node, source: &[u8], field: &str) -> bool {
    if node.kind() != "attribute" {
        return false;
    }
    let object = node.child_by_field_name("object");
    let attribute = node.child_by_field_name("attribute");
    matches!(
        (object, attribute),
        (Some(o), Some(a)) if o.kind() == "identifier"
            && node_text(o, source) == "self"
            && node_text(a, source) == field
    )
}

/// Whether `self.<field>` occurs anywhere under `node`.
pub fn mentions_self_attribute(node: Node, source: &[u8], field: &str) -> bool {
    if is_self_attribute(node, source, field) {
        return true;
    }
    named_children(node)
        .into_iter()
        .any(|child| mentions_self_attribute(child, source, field))
}

/// Whether the statements under `node` assign `self.<field>`. Nested
/// function and class bodies are not searched.
pub fn assigns_self_attribute(node: Node, source: &[u8], field: &str) -> bool {
    match node.kind() {
        "function_definition" | "class_definition" | "lambda" => return false,
        "assignment" | "augmented_assignment" => {
            if node
                .child_by_field_name("left")
                .is_some_and(|left| target_mentions(left, source, field))
            {
                return true;
            }
        }
        _ => {}
    }
    named_children(node)
        .into_iter()
        .any(|child| assigns_self_attribute(child, source, field))
}

// Targets may be tuples or lists of targets, but never look inside a
// subscript: `self.x[0] = 1` does not initialize `self.x`.
fn target_mentions(target: Node, source: &[u8], field: &str) -> bool {
    if is_self_attribute(target, source, field) {
        return true;
    }
    match target.kind() {
        "pattern_list" | "tuple_pattern" | "list_pattern" | "tuple" | "list"
        | "parenthesized_expression" | "list_splat_pattern" => named_children(target)
            .into_iter()
            .any(|child| target_mentions(child, source, field)),
        _ => false,
    }
}

/// Whether `node` contains a `super().<method>(...)` call.
pub fn calls_super_method(node: Node, source: &[u8], method: &str) -> bool {
    if node.kind() == "call" {
        if let Some(func) = node.child_by_field_name("function") {
            if func.kind() == "attribute" {
                let object = func.child_by_field_name("object");
                let attribute = func.child_by_field_name("attribute");
                if let (Some(object), Some(attribute)) = (object, attribute) {
                    let is_super = object.kind() == "call"
                        && object
                            .child_by_field_name("function")
                            .is_some_and(|f| node_text(f, source) == "super");
                    if is_super && node_text(attribute, source) == method {
                        return true;
                    }
                }
            }
        }
    }
    match node.kind() {
        "function_definition" | "class_definition" => false,
        _ => named_children(node)
            .into_iter()
            .any(|child| calls_super_method(child, source, method)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::python::parse_tree;

    fn first_function<'t>(root: Node<'t>) -> Node<'t> {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.kind() == "function_definition" {
                return node;
            }
            stack.extend(named_children(node).into_iter().rev());
        }
        panic!("no function in test source");
    }

    #[test]
    fn test_assigns_self_attribute() {
        let src = b"def __init__(self):\n    self.a, self.order = 1, None\n    self.x[0] = 2\n";
        let tree = parse_tree(src, "t").unwrap();
        let func = first_function(tree.root_node());
        assert!(assigns_self_attribute(func.child_by_field_name("body").unwrap(), src, "order"));
        assert!(!assigns_self_attribute(func.child_by_field_name("body").unwrap(), src, "x"));
    }

    #[test]
    fn test_nested_function_assignment_does_not_count() {
        let src = b"def __init__(self):\n    def inner():\n        self.order = None\n";
        let tree = parse_tree(src, "t").unwrap();
        let func = first_function(tree.root_node());
        assert!(!assigns_self_attribute(func.child_by_field_name("body").unwrap(), src, "order"));
    }

    #[test]
    fn test_calls_super_init() {
        let src = b"def __init__(self):\n    super().__init__()\n";
        let tree = parse_tree(src, "t").unwrap();
        let func = first_function(tree.root_node());
        assert!(calls_super_method(func.child_by_field_name("body").unwrap(), src, "__init__"));
    }

    #[test]
    fn test_docstring_detection() {
        let src = b"def f():\n    \"\"\"Doc.\"\"\"\n    return 1\n";
        let tree = parse_tree(src, "t").unwrap();
        let func = first_function(tree.root_node());
        let body = body_statements(func);
        assert!(is_docstring(body[0]));
        assert!(!is_docstring(body[1]));
    }
}
