//! Structural rewrites of ECMAScript builtin calls.
//!
//! `evaluate` inspects a call or member node and, when a rule matches,
//! synthesizes a replacement call tree in the arena and returns its id;
//! otherwise the node comes back unchanged. Recognition is purely
//! structural (receiver method names, well-known global objects); there is
//! no type information. Synthesized nodes carry the synthetic location, so
//! line sync and parenthesis lookup stay inert for them.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::debug;

use js2php_ast::{Ast, LiteralValue, NodeId, NodeKind};

/// Where the receiver lands in the PHP argument list.
#[derive(Clone, Copy, Debug)]
enum Receiver {
    /// `f(receiver, …args)` — array_push, array_slice, strtoupper, …
    First,
    /// `f(…args, receiver)` — join(glue, arr), explode(delim, str), …
    Last,
    /// `substr(receiver, index, 1)`.
    CharAt,
}

struct MethodRule {
    php: &'static str,
    receiver: Receiver,
}

const fn rule(php: &'static str, receiver: Receiver) -> MethodRule {
    MethodRule { php, receiver }
}

/// Instance-method rewrites, keyed by the ECMAScript method name.
/// `indexOf` and `length` are handled separately because their PHP
/// counterpart depends on whether the receiver looks like a string.
static METHOD_RULES: Lazy<FxHashMap<&'static str, MethodRule>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    // Array.prototype
    m.insert("push", rule("array_push", Receiver::First));
    m.insert("pop", rule("array_pop", Receiver::First));
    m.insert("shift", rule("array_shift", Receiver::First));
    m.insert("unshift", rule("array_unshift", Receiver::First));
    m.insert("reverse", rule("array_reverse", Receiver::First));
    m.insert("concat", rule("array_merge", Receiver::First));
    m.insert("slice", rule("array_slice", Receiver::First));
    m.insert("splice", rule("array_splice", Receiver::First));
    m.insert("filter", rule("array_filter", Receiver::First));
    m.insert("reduce", rule("array_reduce", Receiver::First));
    m.insert("forEach", rule("array_walk", Receiver::First));
    m.insert("keys", rule("array_keys", Receiver::First));
    m.insert("map", rule("array_map", Receiver::Last));
    m.insert("join", rule("join", Receiver::Last));
    // String.prototype
    m.insert("toUpperCase", rule("strtoupper", Receiver::First));
    m.insert("toLowerCase", rule("strtolower", Receiver::First));
    m.insert("trim", rule("trim", Receiver::First));
    m.insert("substr", rule("substr", Receiver::First));
    m.insert("substring", rule("substr", Receiver::First));
    m.insert("charAt", rule("substr", Receiver::CharAt));
    m.insert("split", rule("explode", Receiver::Last));
    m.insert("replace", rule("str_replace", Receiver::Last));
    m
});

/// Static calls on well-known globals; the receiver is dropped.
static STATIC_CALLS: Lazy<FxHashMap<(&'static str, &'static str), &'static str>> =
    Lazy::new(|| {
        let mut m = FxHashMap::default();
        m.insert(("console", "log"), "var_dump");
        m.insert(("console", "info"), "var_dump");
        m.insert(("console", "error"), "error_log");
        m.insert(("console", "warn"), "error_log");
        m.insert(("JSON", "stringify"), "json_encode");
        m.insert(("JSON", "parse"), "json_decode");
        m.insert(("Object", "keys"), "array_keys");
        m.insert(("Array", "isArray"), "is_array");
        m
    });

/// `Math.*` methods with a same-shaped PHP function.
static MATH_FNS: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    for name in ["floor", "ceil", "round", "abs", "sqrt", "pow", "exp", "log", "min", "max"] {
        m.insert(name, name);
    }
    m
});

/// Free-function renames.
static FREE_FNS: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    m.insert("parseInt", "intval");
    m.insert("parseFloat", "floatval");
    m.insert("isNaN", "is_nan");
    m.insert("String", "strval");
    m.insert("Number", "floatval");
    m.insert("Boolean", "boolval");
    m
});

/// Rewrites a builtin call/member node, returning the replacement's id, or
/// the node itself when no rule matches. `string_receiver` is the caller's
/// structural guess about the receiver (string literal, or a variable
/// initialized from one); it selects between the string and array
/// counterparts of ambiguous members.
pub fn evaluate(ast: &mut Ast, node: NodeId, string_receiver: bool) -> NodeId {
    match ast.kind(node).clone() {
        NodeKind::MemberExpression { object, property, computed: false } => {
            if ast.name_of(property) == Some("length") {
                let counter = if string_receiver { "strlen" } else { "count" };
                return ast.synth_call_named(counter, vec![object]);
            }
            node
        }
        NodeKind::CallExpression { callee, arguments } => {
            match ast.kind(callee).clone() {
                NodeKind::MemberExpression { object, property, computed: false } => {
                    rewrite_method_call(ast, node, object, property, arguments, string_receiver)
                }
                NodeKind::Identifier { name } => {
                    if let Some(&php) = FREE_FNS.get(name.as_str()) {
                        return ast.synth_call_named(php, arguments);
                    }
                    node
                }
                _ => node,
            }
        }
        _ => node,
    }
}

fn rewrite_method_call(
    ast: &mut Ast,
    node: NodeId,
    object: NodeId,
    property: NodeId,
    arguments: Vec<NodeId>,
    string_receiver: bool,
) -> NodeId {
    let Some(method) = ast.name_of(property).map(str::to_string) else {
        return node;
    };

    if let NodeKind::Identifier { name } = ast.kind(object) {
        let receiver = name.clone();
        if let Some(&php) = STATIC_CALLS.get(&(receiver.as_str(), method.as_str())) {
            return ast.synth_call_named(php, arguments);
        }
        if receiver == "Math" {
            if let Some(&php) = MATH_FNS.get(method.as_str()) {
                return ast.synth_call_named(php, arguments);
            }
        }
    }

    if method == "indexOf" {
        return if string_receiver {
            // strpos(haystack, needle)
            let mut args = vec![object];
            args.extend(arguments);
            ast.synth_call_named("strpos", args)
        } else {
            // array_search(needle, haystack)
            let mut args = arguments;
            args.push(object);
            ast.synth_call_named("array_search", args)
        };
    }

    if let Some(rule) = METHOD_RULES.get(method.as_str()) {
        let args = match rule.receiver {
            Receiver::First => {
                let mut args = vec![object];
                args.extend(arguments);
                args
            }
            Receiver::Last => {
                let mut args = arguments;
                args.push(object);
                args
            }
            Receiver::CharAt => {
                let index = arguments
                    .first()
                    .copied()
                    .unwrap_or_else(|| ast.synth(NodeKind::Literal {
                        raw: "0".to_string(),
                        value: LiteralValue::Number(0.0),
                    }));
                let one = ast.synth(NodeKind::Literal {
                    raw: "1".to_string(),
                    value: LiteralValue::Number(1.0),
                });
                vec![object, index, one]
            }
        };
        return ast.synth_call_named(rule.php, args);
    }

    // Method reference reached through another property access with no
    // rule: best-effort dynamic dispatch.
    if matches!(ast.kind(object), NodeKind::MemberExpression { .. }) {
        debug!(method = %method, "no rewrite rule; using call_user_func dispatch");
        let name_literal = ast.synth_string(&method);
        let target = ast.synth_array(vec![object, name_literal]);
        let mut args = vec![target];
        args.extend(arguments);
        return ast.synth_call_named("call_user_func", args);
    }

    node
}
