//! Ingestion of the ESTree JSON document into the node arena.
//!
//! The expected input is what espree/acorn produce when run with `loc`,
//! `range`, `tokens` and comment attachment enabled: every node carries a
//! `type` tag, positions, and optional `leadingComments` /
//! `trailingComments` arrays. Node types without an ingestion rule are kept
//! as [`NodeKind::Unknown`] so the dispatcher owns the unsupported-construct
//! error instead of ingestion failing early.

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::Value;
use smallvec::SmallVec;

use crate::ast::Ast;
use crate::comment::{Comment, CommentId, CommentKind};
use crate::node::{
    FunctionParts, LiteralValue, MethodKind, Node, NodeId, NodeKind,
};
use crate::position::{Position, Range, Span};
use crate::token::{Token, TokenKind};

/// The document does not have the expected ESTree shape.
#[derive(Debug)]
pub struct EstreeError {
    pub message: String,
}

impl EstreeError {
    fn new(message: impl Into<String>) -> Self {
        EstreeError { message: message.into() }
    }
}

impl fmt::Display for EstreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed ESTree document: {}", self.message)
    }
}

impl std::error::Error for EstreeError {}

type Result<T> = std::result::Result<T, EstreeError>;

/// Builds an [`Ast`] from a parsed ESTree JSON document. `source` is the
/// JavaScript text the document was parsed from; it backs whitespace
/// sliding during parenthesis detection.
pub fn ast_from_json(doc: &Value, source: &str) -> Result<Ast> {
    let mut builder = Builder::default();
    let root = builder.build_node(doc)?;
    let tokens = builder.build_tokens(doc)?;
    Ok(Ast {
        nodes: builder.nodes,
        comments: builder.comments,
        tokens,
        source: source.to_string(),
        root,
    })
}

#[derive(Default)]
struct Builder {
    nodes: Vec<Node>,
    comments: Vec<Comment>,
    /// Comments are interned by position: the parser attaches the same
    /// comment object as one node's trailing comment and the next node's
    /// leading comment, and both attachments must share the `emitted` flag.
    comment_index: FxHashMap<(u32, u32, u32, u32), CommentId>,
}

impl Builder {
    fn build_node(&mut self, v: &Value) -> Result<NodeId> {
        let ty = str_field(v, "type")?;
        let kind = self.build_kind(v, ty)?;
        let span = span_of(v);
        let loc = loc_of(v)?;
        let mut node = Node::new(kind, span, loc);
        node.leading_comments = self.comment_list(v, "leadingComments")?;
        node.trailing_comments = self.comment_list(v, "trailingComments")?;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        Ok(id)
    }

    fn build_kind(&mut self, v: &Value, ty: &str) -> Result<NodeKind> {
        let kind = match ty {
            "Program" => NodeKind::Program { body: self.list(v, "body")? },
            "BlockStatement" => NodeKind::BlockStatement { body: self.list(v, "body")? },
            "ClassBody" => NodeKind::ClassBody { body: self.list(v, "body")? },
            "EmptyStatement" => NodeKind::EmptyStatement,
            "ExpressionStatement" => NodeKind::ExpressionStatement {
                expression: self.req(v, "expression")?,
            },
            "VariableDeclaration" => NodeKind::VariableDeclaration {
                declarations: self.list(v, "declarations")?,
            },
            "VariableDeclarator" => NodeKind::VariableDeclarator {
                id: self.req(v, "id")?,
                init: self.opt(v, "init")?,
            },
            "Identifier" => NodeKind::Identifier {
                name: str_field(v, "name")?.to_string(),
            },
            "Literal" => self.literal(v)?,
            "TemplateLiteral" => NodeKind::TemplateLiteral {
                quasis: self.list(v, "quasis")?,
                expressions: self.list(v, "expressions")?,
            },
            "TemplateElement" => NodeKind::TemplateElement {
                cooked: template_text(v)?,
            },
            "BinaryExpression" => NodeKind::BinaryExpression {
                operator: str_field(v, "operator")?.to_string(),
                left: self.req(v, "left")?,
                right: self.req(v, "right")?,
            },
            "LogicalExpression" => NodeKind::LogicalExpression {
                operator: str_field(v, "operator")?.to_string(),
                left: self.req(v, "left")?,
                right: self.req(v, "right")?,
            },
            "AssignmentExpression" => NodeKind::AssignmentExpression {
                operator: str_field(v, "operator")?.to_string(),
                left: self.req(v, "left")?,
                right: self.req(v, "right")?,
            },
            "AssignmentPattern" => NodeKind::AssignmentPattern {
                left: self.req(v, "left")?,
                right: self.req(v, "right")?,
            },
            "ConditionalExpression" => NodeKind::ConditionalExpression {
                test: self.req(v, "test")?,
                consequent: self.req(v, "consequent")?,
                alternate: self.req(v, "alternate")?,
            },
            "UnaryExpression" => NodeKind::UnaryExpression {
                operator: str_field(v, "operator")?.to_string(),
                argument: self.req(v, "argument")?,
            },
            "UpdateExpression" => NodeKind::UpdateExpression {
                operator: str_field(v, "operator")?.to_string(),
                prefix: bool_field(v, "prefix"),
                argument: self.req(v, "argument")?,
            },
            "SequenceExpression" => NodeKind::SequenceExpression {
                expressions: self.list(v, "expressions")?,
            },
            "CallExpression" => NodeKind::CallExpression {
                callee: self.req(v, "callee")?,
                arguments: self.list(v, "arguments")?,
            },
            "NewExpression" => NodeKind::NewExpression {
                callee: self.req(v, "callee")?,
                arguments: self.list(v, "arguments")?,
            },
            "MemberExpression" => NodeKind::MemberExpression {
                object: self.req(v, "object")?,
                property: self.req(v, "property")?,
                computed: bool_field(v, "computed"),
            },
            "FunctionDeclaration" => NodeKind::FunctionDeclaration(self.function_parts(v)?),
            "FunctionExpression" => NodeKind::FunctionExpression(self.function_parts(v)?),
            "ArrowFunctionExpression" => {
                NodeKind::ArrowFunctionExpression(self.function_parts(v)?)
            }
            "ObjectExpression" => NodeKind::ObjectExpression {
                properties: self.list(v, "properties")?,
            },
            "ArrayExpression" => NodeKind::ArrayExpression {
                elements: self.list(v, "elements")?,
            },
            "Property" => NodeKind::Property {
                key: self.req(v, "key")?,
                value: self.req(v, "value")?,
            },
            "ObjectPattern" => NodeKind::ObjectPattern {
                properties: self.list(v, "properties")?,
            },
            "ReturnStatement" => NodeKind::ReturnStatement {
                argument: self.opt(v, "argument")?,
            },
            "ClassDeclaration" | "ClassExpression" => NodeKind::ClassDeclaration {
                id: self.req(v, "id")?,
                super_class: self.opt(v, "superClass")?,
                body: self.req(v, "body")?,
            },
            "MethodDefinition" => NodeKind::MethodDefinition {
                key: self.req(v, "key")?,
                value: self.req(v, "value")?,
                kind: method_kind(str_field(v, "kind")?),
                is_static: bool_field(v, "static"),
            },
            "ThisExpression" => NodeKind::ThisExpression,
            "Super" => NodeKind::Super,
            "IfStatement" => NodeKind::IfStatement {
                test: self.req(v, "test")?,
                consequent: self.req(v, "consequent")?,
                alternate: self.opt(v, "alternate")?,
            },
            "WhileStatement" => NodeKind::WhileStatement {
                test: self.req(v, "test")?,
                body: self.req(v, "body")?,
            },
            "DoWhileStatement" => NodeKind::DoWhileStatement {
                body: self.req(v, "body")?,
                test: self.req(v, "test")?,
            },
            "ForStatement" => NodeKind::ForStatement {
                init: self.opt(v, "init")?,
                test: self.opt(v, "test")?,
                update: self.opt(v, "update")?,
                body: self.req(v, "body")?,
            },
            "ForInStatement" => NodeKind::ForInStatement {
                left: self.req(v, "left")?,
                right: self.req(v, "right")?,
                body: self.req(v, "body")?,
            },
            "ForOfStatement" => NodeKind::ForOfStatement {
                left: self.req(v, "left")?,
                right: self.req(v, "right")?,
                body: self.req(v, "body")?,
            },
            "SwitchStatement" => NodeKind::SwitchStatement {
                discriminant: self.req(v, "discriminant")?,
                cases: self.list(v, "cases")?,
            },
            "SwitchCase" => NodeKind::SwitchCase {
                test: self.opt(v, "test")?,
                consequent: self.list(v, "consequent")?,
            },
            "BreakStatement" => NodeKind::BreakStatement,
            "ContinueStatement" => NodeKind::ContinueStatement,
            "TryStatement" => NodeKind::TryStatement {
                block: self.req(v, "block")?,
                handler: self.opt(v, "handler")?,
                finalizer: self.opt(v, "finalizer")?,
            },
            "CatchClause" => NodeKind::CatchClause {
                param: self.req(v, "param")?,
                body: self.req(v, "body")?,
            },
            "ThrowStatement" => NodeKind::ThrowStatement {
                argument: self.req(v, "argument")?,
            },
            "ImportDeclaration" => NodeKind::ImportDeclaration {
                specifiers: self.list(v, "specifiers")?,
                source: self.req(v, "source")?,
            },
            "ImportSpecifier" => NodeKind::ImportSpecifier {
                imported: self.req(v, "imported")?,
                local: self.opt(v, "local")?,
            },
            "ExportNamedDeclaration" => NodeKind::ExportNamedDeclaration {
                declaration: self.opt(v, "declaration")?,
            },
            "ExportDefaultDeclaration" => NodeKind::ExportDefaultDeclaration {
                declaration: self.req(v, "declaration")?,
            },
            "ModuleDeclaration" => NodeKind::ModuleDeclaration {
                id: self.req(v, "id")?,
                body: self.req(v, "body")?,
            },
            "RestElement" => NodeKind::RestElement {
                argument: self.req(v, "argument")?,
            },
            "SpreadElement" => NodeKind::SpreadElement {
                argument: self.req(v, "argument")?,
            },
            "YieldExpression" | "AwaitExpression" => NodeKind::YieldExpression {
                argument: self.opt(v, "argument")?,
            },
            other => NodeKind::Unknown { type_name: other.to_string() },
        };
        Ok(kind)
    }

    fn literal(&mut self, v: &Value) -> Result<NodeKind> {
        let value = if v.get("regex").is_some_and(|r| r.is_object()) {
            LiteralValue::Regex
        } else {
            match v.get("value") {
                Some(Value::String(s)) => LiteralValue::String(s.clone()),
                Some(Value::Number(n)) => LiteralValue::Number(n.as_f64().unwrap_or(0.0)),
                Some(Value::Bool(b)) => LiteralValue::Boolean(*b),
                _ => LiteralValue::Null,
            }
        };
        let raw = match v.get("raw").and_then(Value::as_str) {
            Some(raw) => raw.to_string(),
            // Parsers are run with `raw` enabled; fall back to a rendering
            // of the value if a hand-built document omits it.
            None => match &value {
                LiteralValue::String(s) => format!("\"{s}\""),
                LiteralValue::Number(n) => format!("{n}"),
                LiteralValue::Boolean(b) => format!("{b}"),
                LiteralValue::Null | LiteralValue::Regex => "null".to_string(),
            },
        };
        Ok(NodeKind::Literal { raw, value })
    }

    fn function_parts(&mut self, v: &Value) -> Result<FunctionParts> {
        let id = self.opt(v, "id")?;
        let raw_params = self.list(v, "params")?;
        // Legacy espree documents carry defaults in a parallel `defaults`
        // array; current ones wrap the parameter in an AssignmentPattern.
        // Normalize both to the parallel-array form.
        let legacy_defaults = self.list(v, "defaults")?;
        let mut params = Vec::with_capacity(raw_params.len());
        let mut defaults = Vec::with_capacity(raw_params.len());
        for (i, &p) in raw_params.iter().enumerate() {
            match &self.nodes[p.index()].kind {
                NodeKind::AssignmentPattern { left, right } => {
                    params.push(*left);
                    defaults.push(*right);
                }
                _ => {
                    params.push(p);
                    defaults.push(legacy_defaults.get(i).copied().unwrap_or(NodeId::NONE));
                }
            }
        }
        Ok(FunctionParts {
            id,
            params,
            defaults,
            body: self.req(v, "body")?,
            expression: bool_field(v, "expression"),
        })
    }

    fn req(&mut self, v: &Value, field: &str) -> Result<NodeId> {
        match v.get(field) {
            Some(child) if !child.is_null() => self.build_node(child),
            _ => Err(EstreeError::new(format!(
                "{} node is missing required field `{field}`",
                v.get("type").and_then(Value::as_str).unwrap_or("?"),
            ))),
        }
    }

    fn opt(&mut self, v: &Value, field: &str) -> Result<NodeId> {
        match v.get(field) {
            Some(child) if !child.is_null() => self.build_node(child),
            _ => Ok(NodeId::NONE),
        }
    }

    fn list(&mut self, v: &Value, field: &str) -> Result<Vec<NodeId>> {
        let Some(items) = v.get(field).and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            if item.is_null() {
                // Sparse array elements ([1, , 3]).
                out.push(NodeId::NONE);
            } else {
                out.push(self.build_node(item)?);
            }
        }
        Ok(out)
    }

    fn comment_list(&mut self, v: &Value, field: &str) -> Result<SmallVec<[CommentId; 2]>> {
        let Some(items) = v.get(field).and_then(Value::as_array) else {
            return Ok(SmallVec::new());
        };
        let mut out = SmallVec::with_capacity(items.len());
        for item in items {
            out.push(self.intern_comment(item)?);
        }
        Ok(out)
    }

    fn intern_comment(&mut self, v: &Value) -> Result<CommentId> {
        let span = span_of(v);
        let loc = loc_of(v)?;
        let key = (span.start, span.end, loc.start.line, loc.start.column);
        if let Some(&id) = self.comment_index.get(&key) {
            return Ok(id);
        }
        let kind = match str_field(v, "type")? {
            "Block" | "CommentBlock" => CommentKind::Block,
            "Line" | "CommentLine" => CommentKind::Line,
            other => {
                return Err(EstreeError::new(format!("unknown comment type `{other}`")));
            }
        };
        let text = str_field(v, "value")?.to_string();
        let id = CommentId(self.comments.len() as u32);
        self.comments.push(Comment { kind, text, loc, span, emitted: false });
        self.comment_index.insert(key, id);
        Ok(id)
    }

    fn build_tokens(&mut self, doc: &Value) -> Result<Vec<Token>> {
        let Some(items) = doc.get("tokens").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        let mut tokens = Vec::with_capacity(items.len());
        for item in items {
            tokens.push(Token {
                kind: TokenKind::from_type(str_field(item, "type")?),
                value: str_field(item, "value")?.to_string(),
                loc: loc_of(item)?,
                span: span_of(item),
            });
        }
        Ok(tokens)
    }
}

fn method_kind(name: &str) -> MethodKind {
    match name {
        "constructor" => MethodKind::Constructor,
        "get" => MethodKind::Get,
        "set" => MethodKind::Set,
        _ => MethodKind::Method,
    }
}

fn str_field<'v>(v: &'v Value, field: &str) -> Result<&'v str> {
    v.get(field).and_then(Value::as_str).ok_or_else(|| {
        EstreeError::new(format!("expected string field `{field}`"))
    })
}

fn bool_field(v: &Value, field: &str) -> bool {
    v.get(field).and_then(Value::as_bool).unwrap_or(false)
}

fn span_of(v: &Value) -> Span {
    let Some(range) = v.get("range").and_then(Value::as_array) else {
        return Span::default();
    };
    let at = |i: usize| range.get(i).and_then(Value::as_u64).unwrap_or(0) as u32;
    Span::new(at(0), at(1))
}

/// Missing `loc` yields the synthetic range, which keeps line sync and
/// parenthesis lookup inert for that node.
fn loc_of(v: &Value) -> Result<Range> {
    let Some(loc) = v.get("loc") else {
        return Ok(Range::SYNTHETIC);
    };
    let position = |which: &str| -> Result<Position> {
        let p = loc.get(which).ok_or_else(|| {
            EstreeError::new(format!("loc is missing `{which}`"))
        })?;
        let num = |f: &str| -> Result<u32> {
            p.get(f).and_then(Value::as_u64).map(|n| n as u32).ok_or_else(|| {
                EstreeError::new(format!("loc.{which}.{f} is not a number"))
            })
        };
        Ok(Position::new(num("line")?, num("column")?))
    };
    Ok(Range { start: position("start")?, end: position("end")? })
}

fn template_text(v: &Value) -> Result<String> {
    let value = v.get("value").ok_or_else(|| {
        EstreeError::new("TemplateElement is missing `value`")
    })?;
    let text = value
        .get("cooked")
        .and_then(Value::as_str)
        .or_else(|| value.get("raw").and_then(Value::as_str))
        .ok_or_else(|| EstreeError::new("TemplateElement has neither cooked nor raw text"))?;
    Ok(text.to_string())
}
