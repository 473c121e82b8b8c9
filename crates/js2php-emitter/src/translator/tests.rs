//! End-to-end translation tests over hand-built ESTree documents.
//!
//! Nodes without a `loc` carry the synthetic range, so line sync stays
//! inert and output lands on one line; tests that exercise layout attach
//! explicit locations.

use serde_json::{Value, json};

use crate::error::Error;
use crate::options::Options;

fn php(doc: &Value) -> String {
    crate::translate_json(doc, "", &Options::default()).unwrap()
}

fn php_with(doc: &Value, options: &Options) -> String {
    crate::translate_json(doc, "", options).unwrap()
}

fn program(body: Vec<Value>) -> Value {
    json!({ "type": "Program", "body": body })
}

fn ident(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

fn num(raw: &str) -> Value {
    json!({ "type": "Literal", "value": raw.parse::<f64>().unwrap(), "raw": raw })
}

fn string(raw: &str, value: &str) -> Value {
    json!({ "type": "Literal", "value": value, "raw": raw })
}

fn expr_stmt(expression: Value) -> Value {
    json!({ "type": "ExpressionStatement", "expression": expression })
}

fn var_decl(name: &str, init: Value) -> Value {
    json!({
        "type": "VariableDeclaration",
        "declarations": [{ "type": "VariableDeclarator", "id": ident(name), "init": init }],
    })
}

fn call(callee: Value, arguments: Vec<Value>) -> Value {
    json!({ "type": "CallExpression", "callee": callee, "arguments": arguments })
}

fn member(object: Value, property: Value) -> Value {
    json!({ "type": "MemberExpression", "object": object, "property": property, "computed": false })
}

fn block(body: Vec<Value>) -> Value {
    json!({ "type": "BlockStatement", "body": body })
}

/// Pins the statement to a source line so `sync_to_line` breaks lines.
fn at_line(mut node: Value, line: u32) -> Value {
    node["loc"] = json!({
        "start": { "line": line, "column": 0 },
        "end": { "line": line, "column": 1 },
    });
    node
}

#[test]
fn object_literal_becomes_keyed_array() {
    let doc = program(vec![var_decl(
        "o",
        json!({
            "type": "ObjectExpression",
            "properties": [
                { "type": "Property", "key": ident("a"), "value": num("1") },
                { "type": "Property", "key": ident("b"), "value": num("2") },
            ],
        }),
    )]);
    assert_eq!(php(&doc), "<?php\n$o = [ \"a\" => 1, \"b\" => 2 ];");
}

#[test]
fn array_syntax_when_concise_arrays_disabled() {
    let doc = program(vec![var_decl(
        "o",
        json!({
            "type": "ObjectExpression",
            "properties": [
                { "type": "Property", "key": ident("a"), "value": num("1") },
            ],
        }),
    )]);
    let options = Options { concise_arrays: false, ..Options::default() };
    assert_eq!(php_with(&doc, &options), "<?php\n$o = array( \"a\" => 1 );");
}

#[test]
fn empty_array_literal_stays_tight() {
    let doc = program(vec![var_decl(
        "xs",
        json!({ "type": "ArrayExpression", "elements": [] }),
    )]);
    assert_eq!(php(&doc), "<?php\n$xs = [];");
}

#[test]
fn default_parameter_and_line_preservation() {
    // function f(x, y = 2) {
    //     return x + y;
    // }
    let doc = program(vec![json!({
        "type": "FunctionDeclaration",
        "id": ident("f"),
        "params": [
            ident("x"),
            { "type": "AssignmentPattern", "left": ident("y"), "right": num("2") },
        ],
        "body": {
            "type": "BlockStatement",
            "body": [at_line(
                json!({
                    "type": "ReturnStatement",
                    "argument": {
                        "type": "BinaryExpression",
                        "operator": "+",
                        "left": ident("x"),
                        "right": ident("y"),
                    },
                }),
                2,
            )],
            "loc": { "start": { "line": 1, "column": 21 }, "end": { "line": 3, "column": 1 } },
        },
        "loc": { "start": { "line": 1, "column": 0 }, "end": { "line": 3, "column": 1 } },
    })]);
    assert_eq!(
        php(&doc),
        "<?php\nfunction f($x, $y = 2) {\n\treturn $x + $y;\n}",
    );
}

#[test]
fn for_of_binds_values() {
    let doc = program(vec![json!({
        "type": "ForOfStatement",
        "left": {
            "type": "VariableDeclaration",
            "declarations": [{ "type": "VariableDeclarator", "id": ident("x"), "init": null }],
        },
        "right": ident("items"),
        "body": block(vec![expr_stmt(ident("x"))]),
    })]);
    assert_eq!(php(&doc), "<?php\nforeach ($items as $___ => $x) {$x;}");
}

#[test]
fn for_in_binds_keys() {
    let doc = program(vec![json!({
        "type": "ForInStatement",
        "left": {
            "type": "VariableDeclaration",
            "declarations": [{ "type": "VariableDeclarator", "id": ident("k"), "init": null }],
        },
        "right": ident("obj"),
        "body": block(vec![]),
    })]);
    assert_eq!(php(&doc), "<?php\nforeach ($obj as $k => $___) {}");
}

#[test]
fn getters_collect_into_a_get_dispatcher() {
    let doc = program(vec![json!({
        "type": "ClassDeclaration",
        "id": ident("Point"),
        "superClass": null,
        "body": {
            "type": "ClassBody",
            "body": [{
                "type": "MethodDefinition",
                "kind": "get",
                "static": false,
                "key": ident("foo"),
                "value": {
                    "type": "FunctionExpression",
                    "id": null,
                    "params": [],
                    "body": block(vec![json!({ "type": "ReturnStatement", "argument": num("1") })]),
                },
            }],
        },
    })]);
    let out = php(&doc);
    assert!(out.contains("function __get($_property) "), "{out}");
    assert!(out.contains("if ($_property === 'foo') {return 1;}"), "{out}");
    assert!(!out.contains("__set"), "{out}");
}

#[test]
fn statement_iife_goes_through_call_user_func() {
    let doc = program(vec![expr_stmt(call(
        json!({
            "type": "FunctionExpression",
            "id": null,
            "params": [],
            "body": block(vec![expr_stmt(call(ident("x"), vec![]))]),
        }),
        vec![],
    ))]);
    assert_eq!(php(&doc), "<?php\ncall_user_func(function () {x();});");
}

#[test]
fn push_statement_becomes_append_syntax() {
    let doc = program(vec![expr_stmt(call(
        member(ident("items"), ident("push")),
        vec![num("4")],
    ))]);
    assert_eq!(php(&doc), "<?php\n$items[] = 4;");
}

#[test]
fn free_variable_is_captured_by_reference() {
    let doc = program(vec![
        at_line(var_decl("a", num("1")), 1),
        at_line(
            var_decl(
                "f",
                json!({
                    "type": "FunctionExpression",
                    "id": null,
                    "params": [],
                    "body": block(vec![
                        json!({ "type": "ReturnStatement", "argument": ident("a") }),
                    ]),
                }),
            ),
            2,
        ),
    ]);
    assert_eq!(
        php(&doc),
        "<?php\n$a = 1;\n$f = function () use (&$a) {return $a;};",
    );
}

#[test]
fn top_level_function_binds_globals() {
    // var total = 0;
    //
    // function add() {
    //     total = 1;
    // }
    let doc = program(vec![
        at_line(var_decl("total", num("0")), 1),
        json!({
            "type": "FunctionDeclaration",
            "id": ident("add"),
            "params": [],
            "body": {
                "type": "BlockStatement",
                "body": [at_line(
                    expr_stmt(json!({
                        "type": "AssignmentExpression",
                        "operator": "=",
                        "left": ident("total"),
                        "right": num("1"),
                    })),
                    4,
                )],
                "loc": { "start": { "line": 3, "column": 15 }, "end": { "line": 5, "column": 1 } },
            },
            "loc": { "start": { "line": 3, "column": 0 }, "end": { "line": 5, "column": 1 } },
        }),
    ]);
    assert_eq!(
        php(&doc),
        "<?php\n$total = 0;\n\nfunction add() {\n\tglobal $total;\n\t$total = 1;\n}",
    );
}

#[test]
fn source_parentheses_are_preserved() {
    let source = "r = (a + b);";
    let doc = json!({
        "type": "Program",
        "body": [{
            "type": "ExpressionStatement",
            "expression": {
                "type": "AssignmentExpression",
                "operator": "=",
                "left": ident("r"),
                "right": {
                    "type": "BinaryExpression",
                    "operator": "+",
                    "left": ident("a"),
                    "right": ident("b"),
                    "loc": { "start": { "line": 1, "column": 5 }, "end": { "line": 1, "column": 10 } },
                },
            },
            "loc": { "start": { "line": 1, "column": 0 }, "end": { "line": 1, "column": 12 } },
        }],
        "tokens": [
            {
                "type": "Punctuator",
                "value": "(",
                "loc": { "start": { "line": 1, "column": 4 }, "end": { "line": 1, "column": 5 } },
            },
            {
                "type": "Punctuator",
                "value": ")",
                "loc": { "start": { "line": 1, "column": 10 }, "end": { "line": 1, "column": 11 } },
            },
        ],
    });
    let out = crate::translate_json(&doc, source, &Options::default()).unwrap();
    assert_eq!(out, "<?php\n$r = ($a + $b);");
}

#[test]
fn template_literal_interpolates() {
    let doc = program(vec![var_decl(
        "greeting",
        json!({
            "type": "TemplateLiteral",
            "quasis": [
                {
                    "type": "TemplateElement",
                    "value": { "cooked": "Hello ", "raw": "Hello " },
                    "range": [1, 8],
                },
                {
                    "type": "TemplateElement",
                    "value": { "cooked": "!", "raw": "!" },
                    "range": [15, 16],
                },
            ],
            "expressions": [{ "type": "Identifier", "name": "name", "range": [10, 14] }],
        }),
    )]);
    assert_eq!(php(&doc), "<?php\n$greeting = \"Hello {$name}!\";");
}

#[test]
fn comment_shared_between_attachments_emits_once() {
    let comment = json!({
        "type": "Block",
        "value": " shared ",
        "range": [4, 16],
        "loc": { "start": { "line": 2, "column": 0 }, "end": { "line": 2, "column": 12 } },
    });
    let mut first = at_line(expr_stmt(ident("a")), 1);
    first["trailingComments"] = json!([comment.clone()]);
    let mut second = at_line(expr_stmt(ident("b")), 3);
    second["leadingComments"] = json!([comment]);
    let out = php(&program(vec![first, second]));
    assert_eq!(out, "<?php\n$a;\n/* shared */\n$b;");
    assert_eq!(out.matches("shared").count(), 1);
}

#[test]
fn use_strict_directive_is_dropped() {
    let doc = program(vec![
        expr_stmt(string("'use strict'", "use strict")),
        expr_stmt(ident("a")),
    ]);
    let out = php(&doc);
    assert_eq!(out, "<?php\n$a;");
}

#[test]
fn namespace_option_prefixes_output() {
    let doc = program(vec![expr_stmt(ident("a"))]);
    let options = Options { namespace: Some("App".to_string()), ..Options::default() };
    assert_eq!(php_with(&doc, &options), "<?php\nnamespace App;\n$a;");
}

#[test]
fn watermark_lands_under_the_opener() {
    let doc = program(vec![expr_stmt(ident("a"))]);
    let options = Options { watermark: Some("generated".to_string()), ..Options::default() };
    assert_eq!(php_with(&doc, &options), "<?php\n/* generated */\n$a;");
}

#[test]
fn require_bindings_become_use_imports() {
    let require = |module: &str| call(ident("require"), vec![string(&format!("'{module}'"), module)]);
    let destructured = json!({
        "type": "VariableDeclaration",
        "declarations": [{
            "type": "VariableDeclarator",
            "id": {
                "type": "ObjectPattern",
                "properties": [
                    { "type": "Property", "key": ident("join"), "value": ident("join") },
                ],
            },
            "init": require("path"),
            "loc": { "start": { "line": 2, "column": 0 }, "end": { "line": 2, "column": 1 } },
        }],
    });
    let doc = program(vec![at_line(var_decl("fs", require("fs")), 1), destructured]);
    assert_eq!(php(&doc), "<?php\nuse fs;\nuse Join;");
}

#[test]
fn typeof_maps_to_gettype() {
    let doc = program(vec![var_decl(
        "t",
        json!({ "type": "UnaryExpression", "operator": "typeof", "argument": ident("x") }),
    )]);
    assert_eq!(php(&doc), "<?php\n$t = gettype($x);");
}

#[test]
fn in_operator_maps_to_isset() {
    let doc = program(vec![json!({
        "type": "IfStatement",
        "test": {
            "type": "BinaryExpression",
            "operator": "in",
            "left": string("\"k\"", "k"),
            "right": ident("obj"),
        },
        "consequent": block(vec![]),
        "alternate": null,
    })]);
    assert_eq!(php(&doc), "<?php\nif (isset($obj[\"k\"])) {}");
}

#[test]
fn concatenation_of_string_typed_operands_uses_dot() {
    let doc = program(vec![
        at_line(var_decl("a", string("'x'", "x")), 1),
        at_line(var_decl("b", string("'y'", "y")), 2),
        at_line(
            var_decl(
                "c",
                json!({
                    "type": "BinaryExpression",
                    "operator": "+",
                    "left": ident("a"),
                    "right": ident("b"),
                }),
            ),
            3,
        ),
    ]);
    assert_eq!(php(&doc), "<?php\n$a = 'x';\n$b = 'y';\n$c = $a . $b;");
}

#[test]
fn index_of_on_a_string_variable_selects_strpos() {
    let doc = program(vec![
        at_line(var_decl("s", string("'abc'", "abc")), 1),
        at_line(
            var_decl(
                "i",
                call(member(ident("s"), ident("indexOf")), vec![string("'b'", "b")]),
            ),
            2,
        ),
    ]);
    assert_eq!(php(&doc), "<?php\n$s = 'abc';\n$i = strpos($s, 'b');");
}

#[test]
fn console_log_maps_to_var_dump() {
    let doc = program(vec![expr_stmt(call(
        member(ident("console"), ident("log")),
        vec![ident("x")],
    ))]);
    assert_eq!(php(&doc), "<?php\nvar_dump($x);");
}

#[test]
fn math_calls_unwrap_to_free_functions() {
    let doc = program(vec![var_decl(
        "m",
        call(member(ident("Math"), ident("floor")), vec![ident("x")]),
    )]);
    assert_eq!(php(&doc), "<?php\n$m = floor($x);");
}

#[test]
fn string_length_measures_array_length_counts() {
    let doc = program(vec![
        at_line(var_decl("s", string("'abc'", "abc")), 1),
        at_line(var_decl("n", member(ident("s"), ident("length"))), 2),
        at_line(var_decl("c", member(ident("items"), ident("length"))), 3),
    ]);
    assert_eq!(
        php(&doc),
        "<?php\n$s = 'abc';\n$n = strlen($s);\n$c = count($items);",
    );
}

#[test]
fn new_expression_keeps_the_class_name_bare() {
    let doc = program(vec![var_decl(
        "d",
        json!({ "type": "NewExpression", "callee": ident("Foo"), "arguments": [num("1")] }),
    )]);
    assert_eq!(php(&doc), "<?php\n$d = new Foo(1);");
}

#[test]
fn constructor_assignments_promote_to_fields() {
    let doc = program(vec![json!({
        "type": "ClassDeclaration",
        "id": ident("Point"),
        "superClass": null,
        "body": {
            "type": "ClassBody",
            "body": [{
                "type": "MethodDefinition",
                "kind": "constructor",
                "static": false,
                "key": ident("constructor"),
                "value": {
                    "type": "FunctionExpression",
                    "id": null,
                    "params": [ident("x")],
                    "body": block(vec![expr_stmt(json!({
                        "type": "AssignmentExpression",
                        "operator": "=",
                        "left": member(json!({ "type": "ThisExpression" }), ident("px")),
                        "right": ident("x"),
                    }))]),
                },
            }],
        },
    })]);
    let out = php(&doc);
    assert!(out.contains("public function __construct($x)"), "{out}");
    assert!(out.contains("$this->px = $x;"), "{out}");
    assert!(out.contains("public $px;"), "{out}");
}

#[test]
fn catch_binds_a_generic_exception() {
    let doc = program(vec![json!({
        "type": "TryStatement",
        "block": block(vec![expr_stmt(call(ident("a"), vec![]))]),
        "handler": {
            "type": "CatchClause",
            "param": ident("e"),
            "body": block(vec![expr_stmt(call(ident("b"), vec![]))]),
        },
        "finalizer": null,
    })]);
    assert_eq!(php(&doc), "<?php\ntry {a();} catch (Exception $e) {b();}");
}

#[test]
fn conditional_test_is_parenthesized() {
    let doc = program(vec![var_decl(
        "r",
        json!({
            "type": "ConditionalExpression",
            "test": ident("c"),
            "consequent": num("1"),
            "alternate": num("2"),
        }),
    )]);
    assert_eq!(php(&doc), "<?php\n$r = ($c) ? 1 : 2;");
}

#[test]
fn import_specifiers_classize_the_module_path() {
    let doc = program(vec![json!({
        "type": "ImportDeclaration",
        "source": string("'my-lib'", "my-lib"),
        "specifiers": [
            { "type": "ImportSpecifier", "imported": ident("Thing"), "local": ident("Thing") },
            { "type": "ImportSpecifier", "imported": ident("Widget"), "local": ident("W") },
        ],
    })]);
    assert_eq!(php(&doc), "<?php\nuse \\MyLib\\Thing;\nuse \\MyLib\\Widget as W;\n");
}

#[test]
fn switch_preserves_fallthrough_layout() {
    let doc = program(vec![json!({
        "type": "SwitchStatement",
        "discriminant": ident("x"),
        "cases": [
            {
                "type": "SwitchCase",
                "test": num("1"),
                "consequent": [{ "type": "BreakStatement" }],
            },
            {
                "type": "SwitchCase",
                "test": null,
                "consequent": [{ "type": "BreakStatement" }],
            },
        ],
    })]);
    assert_eq!(
        php(&doc),
        "<?php\nswitch ($x) {case 1:\n\tbreak;\n\tdefault:\n\tbreak;\n}",
    );
}

#[test]
fn shadowing_parameter_is_not_captured() {
    // var x = 1;
    // var f = function (x) { return x; };
    let doc = program(vec![
        at_line(var_decl("x", num("1")), 1),
        at_line(
            var_decl(
                "f",
                json!({
                    "type": "FunctionExpression",
                    "id": null,
                    "params": [ident("x")],
                    "body": block(vec![
                        json!({ "type": "ReturnStatement", "argument": ident("x") }),
                    ]),
                }),
            ),
            2,
        ),
    ]);
    assert_eq!(php(&doc), "<?php\n$x = 1;\n$f = function ($x) {return $x;};");
}

#[test]
fn class_name_in_a_closure_is_not_captured() {
    let doc = program(vec![
        at_line(
            json!({
                "type": "ClassDeclaration",
                "id": ident("Point"),
                "superClass": null,
                "body": { "type": "ClassBody", "body": [] },
            }),
            1,
        ),
        at_line(
            var_decl(
                "f",
                json!({
                    "type": "FunctionExpression",
                    "id": null,
                    "params": [],
                    "body": block(vec![json!({
                        "type": "ReturnStatement",
                        "argument": {
                            "type": "NewExpression",
                            "callee": ident("Point"),
                            "arguments": [],
                        },
                    })]),
                }),
            ),
            2,
        ),
    ]);
    let out = php(&doc);
    assert_eq!(out, "<?php\nclass Point {}\n$f = function () {return new Point();};");
    assert!(!out.contains("use ("), "{out}");
}

#[test]
fn repeated_translation_is_byte_identical() {
    // Exercises scope captures and method-call rewriting, the two passes
    // that hold iteration-order-sensitive state.
    let doc = program(vec![
        at_line(var_decl("a", num("1")), 1),
        at_line(var_decl("b", num("2")), 2),
        at_line(
            var_decl(
                "f",
                json!({
                    "type": "FunctionExpression",
                    "id": null,
                    "params": [],
                    "body": block(vec![json!({
                        "type": "ReturnStatement",
                        "argument": {
                            "type": "BinaryExpression",
                            "operator": "+",
                            "left": ident("a"),
                            "right": ident("b"),
                        },
                    })]),
                }),
            ),
            3,
        ),
        at_line(
            expr_stmt(call(member(ident("items"), ident("push")), vec![num("4")])),
            4,
        ),
        at_line(
            var_decl("ks", call(member(ident("obj"), ident("keys")), vec![])),
            5,
        ),
    ]);
    assert_eq!(php(&doc), php(&doc));
}

#[test]
fn unknown_node_is_an_unsupported_error() {
    let doc = program(vec![json!({ "type": "WithStatement" })]);
    let err = crate::translate_json(&doc, "", &Options::default()).unwrap_err();
    match err {
        Error::Unsupported { kind, .. } => assert_eq!(kind, "WithStatement"),
        other => panic!("expected an unsupported-construct error, got {other}"),
    }
}

#[test]
fn document_without_a_type_tag_is_malformed() {
    let doc = json!({ "body": [] });
    let err = crate::translate_json(&doc, "", &Options::default()).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)), "{err}");
}
