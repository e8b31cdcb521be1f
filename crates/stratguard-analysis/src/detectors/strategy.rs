//! Strategy-class discovery: which classes derive from a configured base,
//! directly or through other classes in the same unit.

use smallvec::SmallVec;
use tree_sitter::{Node, Tree};

use stratguard_core::config::ValidatorConfig;
use stratguard_core::{FxHashMap, FxHashSet};

use super::syntax::{body_statements, def_name, named_children, node_text, unwrap_decorated};

/// One class definition in the unit.
#[derive(Debug, Clone)]
pub struct ClassInfo<'t> {
    pub name: String,
    pub node: Node<'t>,
    /// Base names, last dotted segment only (`bt.Strategy` -> `Strategy`).
    pub bases: SmallVec<[String; 2]>,
    /// Directly defined methods, in source order.
    pub methods: Vec<(String, Node<'t>)>,
}

impl<'t> ClassInfo<'t> {
    /// 1-indexed line of the `class` keyword.
    pub fn line(&self) -> u32 {
        self.node.start_position().row as u32 + 1
    }

    pub fn own_method(&self, name: &str) -> Option<Node<'t>> {
        self.methods
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, node)| *node)
    }
}

/// Every class in the unit plus the subset that are strategies.
pub struct StrategyIndex<'t> {
    classes: Vec<ClassInfo<'t>>,
    by_name: FxHashMap<String, usize>,
    strategies: Vec<usize>,
}

impl<'t> StrategyIndex<'t> {
    pub fn build(tree: &'t Tree, source: &[u8], config: &ValidatorConfig) -> Self {
        let mut classes = Vec::new();
        collect_classes(tree.root_node(), source, &mut classes);

        let mut by_name = FxHashMap::default();
        for (idx, class) in classes.iter().enumerate() {
            by_name.entry(class.name.clone()).or_insert(idx);
        }

        // Fixpoint over in-file inheritance.
        let mut strategy_names: FxHashSet<&str> =
            config.strategy_bases.iter().map(String::as_str).collect();
        let mut strategies: Vec<usize> = Vec::new();
        loop {
            let before = strategies.len();
            for (idx, class) in classes.iter().enumerate() {
                if strategies.contains(&idx) {
                    continue;
                }
                if class.bases.iter().any(|b| strategy_names.contains(b.as_str())) {
                    strategies.push(idx);
                    strategy_names.insert(class.name.as_str());
                }
            }
            if strategies.len() == before {
                break;
            }
        }
        strategies.sort_unstable();

        Self {
            classes,
            by_name,
            strategies,
        }
    }

    /// Strategy classes in source order.
    pub fn strategies(&self) -> impl Iterator<Item = &ClassInfo<'t>> {
        self.strategies.iter().map(|&idx| &self.classes[idx])
    }

    pub fn classes(&self) -> &[ClassInfo<'t>] {
        &self.classes
    }

    /// In-file ancestors, nearest first. Cycles are cut.
    pub fn ancestors(&self, class: &ClassInfo<'t>) -> Vec<&ClassInfo<'t>> {
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut out = Vec::new();
        let mut queue: Vec<&str> = class.bases.iter().map(String::as_str).collect();
        let mut cursor = 0;
        while cursor < queue.len() {
            let base = queue[cursor];
            cursor += 1;
            let Some(&idx) = self.by_name.get(base) else {
                continue;
            };
            if !seen.insert(idx) || self.classes[idx].name == class.name {
                continue;
            }
            let ancestor = &self.classes[idx];
            queue.extend(ancestor.bases.iter().map(String::as_str));
            out.push(ancestor);
        }
        out
    }

    /// A method defined on the class or inherited from an in-file ancestor.
    pub fn resolve_method(&self, class: &ClassInfo<'t>, name: &str) -> Option<Node<'t>> {
        class.own_method(name).or_else(|| {
            self.ancestors(class)
                .into_iter()
                .find_map(|ancestor| ancestor.own_method(name))
        })
    }
}

fn collect_classes<'t>(node: Node<'t>, source: &[u8], out: &mut Vec<ClassInfo<'t>>) {
    for child in named_children(node) {
        let def = unwrap_decorated(child);
        if def.kind() == "class_definition" {
            out.push(class_info(def, source));
        }
        collect_classes(child, source, out);
    }
}

fn class_info<'t>(def: Node<'t>, source: &[u8]) -> ClassInfo<'t> {
    let bases = def
        .child_by_field_name("superclasses")
        .map(|args| {
            named_children(args)
                .into_iter()
                .filter(|arg| matches!(arg.kind(), "identifier" | "attribute"))
                .filter_map(|arg| node_text(arg, source).rsplit('.').next())
                .map(|segment| segment.trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let methods = body_statements(def)
        .into_iter()
        .map(unwrap_decorated)
        .filter(|stmt| stmt.kind() == "function_definition")
        .map(|func| (def_name(func, source).to_string(), func))
        .collect();

    ClassInfo {
        name: def_name(def, source).to_string(),
        node: def,
        bases,
        methods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::python::parse_tree;

    #[test]
    fn test_transitive_strategy_discovery() {
        let src = b"import backtrader as bt\n\nclass Base(bt.Strategy):\n    def __init__(self):\n        pass\n\nclass Child(Base):\n    def next(self):\n        pass\n\nclass Helper(object):\n    pass\n";
        let tree = parse_tree(src, "t").unwrap();
        let config = ValidatorConfig::default();
        let index = StrategyIndex::build(&tree, src, &config);
        let names: Vec<&str> = index.strategies().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Base", "Child"]);

        let child = index.strategies().nth(1).unwrap();
        assert!(index.resolve_method(child, "__init__").is_some());
        assert!(index.resolve_method(child, "next").is_some());
        assert!(child.own_method("__init__").is_none());
    }

    #[test]
    fn test_subclass_declared_before_base_is_found() {
        let src = b"class Child(Base):\n    pass\n\nclass Base(Strategy):\n    pass\n";
        let tree = parse_tree(src, "t").unwrap();
        let index = StrategyIndex::build(&tree, src, &ValidatorConfig::default());
        assert_eq!(index.strategies().count(), 2);
        assert_eq!(index.strategies().next().unwrap().name, "Child");
    }

    #[test]
    fn test_inheritance_cycle_terminates() {
        let src = b"class A(B):\n    pass\n\nclass B(A):\n    pass\n";
        let tree = parse_tree(src, "t").unwrap();
        let index = StrategyIndex::build(&tree, src, &ValidatorConfig::default());
        assert_eq!(index.strategies().count(), 0);
        let a = &index.classes()[0];
        assert_eq!(index.ancestors(a).len(), 1);
    }
}
