//! Best-effort scope model: module scope, class-body scopes, and one level
//! of function scope. Anything nested inside a function (inner functions,
//! lambdas, comprehensions, classes) is flattened into that function.

use tree_sitter::Node;

use stratguard_core::FxHashSet;

use crate::detectors::syntax::{named_children, node_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
    Function,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub bindings: FxHashSet<String>,
}

/// A name read, with the scope it is evaluated in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRead {
    pub name: String,
    /// 0-based row.
    pub row: usize,
    pub scope: usize,
}

const MODULE: usize = 0;

/// Collects bindings per scope and every name read, in document order.
pub struct ScopeWalker<'s> {
    source: &'s [u8],
    scopes: Vec<Scope>,
    reads: Vec<NameRead>,
    wildcard_import: bool,
}

impl<'s> ScopeWalker<'s> {
    pub fn new(source: &'s [u8]) -> Self {
        Self {
            source,
            scopes: vec![Scope {
                kind: ScopeKind::Module,
                bindings: FxHashSet::default(),
            }],
            reads: Vec::new(),
            wildcard_import: false,
        }
    }

    pub fn walk(mut self, root: Node) -> Self {
        self.visit(root, MODULE);
        self
    }

    pub fn reads(&self) -> &[NameRead] {
        &self.reads
    }

    /// `from x import *` anywhere makes resolution meaningless.
    pub fn has_wildcard_import(&self) -> bool {
        self.wildcard_import
    }

    /// Whether `name` resolves from `scope`: its own bindings, then module
    /// bindings. Class bodies are not visible from methods.
    pub fn resolves(&self, name: &str, scope: usize) -> bool {
        self.scopes[scope].bindings.contains(name)
            || (scope != MODULE && self.scopes[MODULE].bindings.contains(name))
    }

    fn push_scope(&mut self, kind: ScopeKind) -> usize {
        self.scopes.push(Scope {
            kind,
            bindings: FxHashSet::default(),
        });
        self.scopes.len() - 1
    }

    fn bind(&mut self, name: &str, scope: usize) {
        if !name.is_empty() {
            self.scopes[scope].bindings.insert(name.to_string());
        }
    }

    fn visit(&mut self, node: Node, scope: usize) {
        match node.kind() {
            "identifier" => {
                self.reads.push(NameRead {
                    name: node_text(node, self.source).to_string(),
                    row: node.start_position().row,
                    scope,
                });
                return;
            }
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                self.bind_import(node, scope);
                return;
            }
            "global_statement" | "nonlocal_statement" => {
                for child in named_children(node) {
                    if child.kind() == "identifier" {
                        let name = node_text(child, self.source);
                        self.bind(name, scope);
                        self.bind(name, MODULE);
                    }
                }
                return;
            }
            "class_definition" => {
                self.bind_name_field(node, scope);
                if let Some(bases) = node.child_by_field_name("superclasses") {
                    self.visit(bases, scope);
                }
                let inner = if self.scopes[scope].kind == ScopeKind::Function {
                    scope
                } else {
                    self.push_scope(ScopeKind::Class)
                };
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit(body, inner);
                }
                return;
            }
            "function_definition" => {
                self.bind_name_field(node, scope);
                let inner = if self.scopes[scope].kind == ScopeKind::Function {
                    scope
                } else {
                    self.push_scope(ScopeKind::Function)
                };
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.bind_parameters(params, inner);
                    self.visit(params, inner);
                }
                if let Some(ret) = node.child_by_field_name("return_type") {
                    self.visit(ret, scope);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit(body, inner);
                }
                return;
            }
            "lambda" => {
                if let Some(params) = node.child_by_field_name("parameters") {
                    self.bind_parameters(params, scope);
                }
            }
            "case_pattern" => {
                self.bind_all_identifiers(node, scope);
                return;
            }
            "attribute" => {
                if let Some(object) = node.child_by_field_name("object") {
                    self.visit(object, scope);
                }
                return;
            }
            "keyword_argument" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.visit(value, scope);
                }
                return;
            }
            "dotted_name" => {
                if let Some(first) = node.named_child(0) {
                    self.visit(first, scope);
                }
                return;
            }
            "assignment" | "augmented_assignment" | "for_statement" | "for_in_clause" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.bind_targets(left, scope);
                }
            }
            "named_expression" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.bind_targets(name, scope);
                }
            }
            "as_pattern" | "except_clause" => {
                if let Some(alias) = node.child_by_field_name("alias") {
                    self.bind_targets(alias, scope);
                }
            }
            _ => {}
        }

        for child in named_children(node) {
            self.visit(child, scope);
        }
    }

    fn bind_name_field(&mut self, def: Node, scope: usize) {
        if let Some(name) = def.child_by_field_name("name") {
            let name = node_text(name, self.source);
            self.bind(name, scope);
        }
    }

    /// Identifiers in an assignment target. Attribute and subscript targets
    /// bind nothing.
    fn bind_targets(&mut self, target: Node, scope: usize) {
        match target.kind() {
            "identifier" => {
                let name = node_text(target, self.source);
                self.bind(name, scope);
            }
            "attribute" | "subscript" => {}
            _ => {
                for child in named_children(target) {
                    self.bind_targets(child, scope);
                }
            }
        }
    }

    fn bind_parameters(&mut self, params: Node, scope: usize) {
        for param in named_children(params) {
            match param.kind() {
                "identifier" => self.bind_targets(param, scope),
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = param.child_by_field_name("name") {
                        self.bind_targets(name, scope);
                    }
                }
                "typed_parameter" => {
                    if let Some(first) = param.named_child(0) {
                        self.bind_targets(first, scope);
                    }
                }
                "list_splat_pattern" | "dictionary_splat_pattern" | "tuple_pattern" => {
                    self.bind_targets(param, scope)
                }
                _ => {}
            }
        }
    }

    fn bind_all_identifiers(&mut self, node: Node, scope: usize) {
        if node.kind() == "identifier" {
            let name = node_text(node, self.source);
            self.bind(name, scope);
            return;
        }
        for child in named_children(node) {
            self.bind_all_identifiers(child, scope);
        }
    }

    fn bind_import(&mut self, node: Node, scope: usize) {
        let from_import = node.kind() != "import_statement";
        for child in named_children(node) {
            match child.kind() {
                "wildcard_import" => self.wildcard_import = true,
                "aliased_import" => {
                    if let Some(alias) = child.child_by_field_name("alias") {
                        let name = node_text(alias, self.source);
                        self.bind(name, scope);
                    }
                }
                "dotted_name" => {
                    // The module path of a from-import binds nothing.
                    if from_import && node.child_by_field_name("module_name") == Some(child) {
                        continue;
                    }
                    let text = node_text(child, self.source);
                    let bound = if from_import {
                        text.rsplit('.').next()
                    } else {
                        text.split('.').next()
                    };
                    if let Some(name) = bound {
                        self.bind(name.trim(), scope);
                    }
                }
                _ => {}
            }
        }
    }
}
