//! Names that are always defined: Python builtins and identifiers the
//! strategy framework makes available.

use std::sync::LazyLock;

use stratguard_core::FxHashSet;

const PYTHON_BUILTINS: &[&str] = &[
    "abs", "aiter", "all", "anext", "any", "ascii", "bin", "bool", "breakpoint", "bytearray",
    "bytes", "callable", "chr", "classmethod", "compile", "complex", "delattr", "dict", "dir",
    "divmod", "enumerate", "eval", "exec", "filter", "float", "format", "frozenset", "getattr",
    "globals", "hasattr", "hash", "help", "hex", "id", "input", "int", "isinstance",
    "issubclass", "iter", "len", "list", "locals", "map", "max", "memoryview", "min", "next",
    "object", "oct", "open", "ord", "pow", "print", "property", "range", "repr", "reversed",
    "round", "set", "setattr", "slice", "sorted", "staticmethod", "str", "sum", "super",
    "tuple", "type", "vars", "zip", "True", "False", "None", "NotImplemented", "Ellipsis",
    "exit", "quit", "copyright", "credits", "license",
    // Exceptions.
    "BaseException", "Exception", "ArithmeticError", "AssertionError", "AttributeError",
    "BufferError", "EOFError", "FloatingPointError", "GeneratorExit", "ImportError",
    "ModuleNotFoundError", "IndexError", "KeyError", "KeyboardInterrupt", "LookupError",
    "MemoryError", "NameError", "NotImplementedError", "OSError", "IOError",
    "EnvironmentError", "OverflowError", "RecursionError", "ReferenceError", "RuntimeError",
    "StopIteration", "StopAsyncIteration", "SyntaxError", "IndentationError", "TabError",
    "SystemError", "SystemExit", "TypeError", "UnboundLocalError", "UnicodeError",
    "UnicodeDecodeError", "UnicodeEncodeError", "UnicodeTranslateError", "ValueError",
    "ZeroDivisionError", "ConnectionError", "TimeoutError", "FileNotFoundError",
    "PermissionError", "Warning", "UserWarning", "DeprecationWarning", "RuntimeWarning",
    "ExceptionGroup", "BaseExceptionGroup",
];

/// Identifiers generated strategies use without binding them locally.
const FRAMEWORK_NAMES: &[&str] = &["self", "cls", "bt", "backtrader"];

static ALWAYS_DEFINED: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    PYTHON_BUILTINS
        .iter()
        .chain(FRAMEWORK_NAMES)
        .copied()
        .collect()
});

pub fn is_always_defined(name: &str) -> bool {
    ALWAYS_DEFINED.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_and_framework_names() {
        assert!(is_always_defined("len"));
        assert!(is_always_defined("ValueError"));
        assert!(is_always_defined("bt"));
        assert!(!is_always_defined("sma_fast"));
    }
}
