use bitflags::bitflags;
use smallvec::SmallVec;

use crate::comment::CommentId;
use crate::position::{Range, Span};

/// Index of a node in [`crate::Ast::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for an absent child (missing initializer, no superclass, …).
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == NodeId::NONE
    }

    pub fn is_some(self) -> bool {
        self != NodeId::NONE
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Per-node emission state set by the dispatcher while walking.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// Skip re-emission of source-explicit parentheses around this node.
        const SUPPRESS_PARENS = 1 << 0;
        /// Skip location handling (line sync, parens, comments) entirely.
        const SUPPRESS_LOC = 1 << 1;
        /// Identifier in callee position: emit bare, without the `$` sigil.
        const IS_CALLEE = 1 << 2;
        /// Name starts with an uppercase letter; treated as a class/static
        /// reference in member-access chains.
        const IS_STATIC = 1 << 3;
        /// Identifier used as a non-computed member property: emit bare.
        const IS_MEMBER_PROPERTY = 1 << 4;
        /// Call expression is an immediately-invoked function expression.
        const IS_IIFE = 1 << 5;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Regex,
}

/// The shared shape of function declarations, function expressions and
/// arrow functions.
#[derive(Clone, Debug)]
pub struct FunctionParts {
    /// `NONE` for anonymous functions.
    pub id: NodeId,
    pub params: Vec<NodeId>,
    /// Per-parameter default expression or `NONE`, parallel to `params`.
    /// `AssignmentPattern` parameters are normalized into this form during
    /// ingestion.
    pub defaults: Vec<NodeId>,
    pub body: NodeId,
    /// Arrow function with an expression body (no braces).
    pub expression: bool,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Program { body: Vec<NodeId> },
    BlockStatement { body: Vec<NodeId> },
    EmptyStatement,
    ExpressionStatement { expression: NodeId },
    VariableDeclaration { declarations: Vec<NodeId> },
    VariableDeclarator { id: NodeId, init: NodeId },
    Identifier { name: String },
    Literal { raw: String, value: LiteralValue },
    TemplateLiteral { quasis: Vec<NodeId>, expressions: Vec<NodeId> },
    TemplateElement { cooked: String },
    BinaryExpression { operator: String, left: NodeId, right: NodeId },
    LogicalExpression { operator: String, left: NodeId, right: NodeId },
    AssignmentExpression { operator: String, left: NodeId, right: NodeId },
    AssignmentPattern { left: NodeId, right: NodeId },
    ConditionalExpression { test: NodeId, consequent: NodeId, alternate: NodeId },
    UnaryExpression { operator: String, argument: NodeId },
    UpdateExpression { operator: String, prefix: bool, argument: NodeId },
    SequenceExpression { expressions: Vec<NodeId> },
    CallExpression { callee: NodeId, arguments: Vec<NodeId> },
    NewExpression { callee: NodeId, arguments: Vec<NodeId> },
    MemberExpression { object: NodeId, property: NodeId, computed: bool },
    FunctionDeclaration(FunctionParts),
    FunctionExpression(FunctionParts),
    ArrowFunctionExpression(FunctionParts),
    ObjectExpression { properties: Vec<NodeId> },
    ArrayExpression { elements: Vec<NodeId> },
    Property { key: NodeId, value: NodeId },
    ObjectPattern { properties: Vec<NodeId> },
    ReturnStatement { argument: NodeId },
    ClassDeclaration { id: NodeId, super_class: NodeId, body: NodeId },
    ClassBody { body: Vec<NodeId> },
    MethodDefinition { key: NodeId, value: NodeId, kind: MethodKind, is_static: bool },
    ThisExpression,
    Super,
    IfStatement { test: NodeId, consequent: NodeId, alternate: NodeId },
    WhileStatement { test: NodeId, body: NodeId },
    DoWhileStatement { body: NodeId, test: NodeId },
    ForStatement { init: NodeId, test: NodeId, update: NodeId, body: NodeId },
    ForInStatement { left: NodeId, right: NodeId, body: NodeId },
    ForOfStatement { left: NodeId, right: NodeId, body: NodeId },
    SwitchStatement { discriminant: NodeId, cases: Vec<NodeId> },
    SwitchCase { test: NodeId, consequent: Vec<NodeId> },
    BreakStatement,
    ContinueStatement,
    TryStatement { block: NodeId, handler: NodeId, finalizer: NodeId },
    CatchClause { param: NodeId, body: NodeId },
    ThrowStatement { argument: NodeId },
    ImportDeclaration { specifiers: Vec<NodeId>, source: NodeId },
    ImportSpecifier { imported: NodeId, local: NodeId },
    ExportNamedDeclaration { declaration: NodeId },
    ExportDefaultDeclaration { declaration: NodeId },
    ModuleDeclaration { id: NodeId, body: NodeId },
    RestElement { argument: NodeId },
    SpreadElement { argument: NodeId },
    YieldExpression { argument: NodeId },
    /// A node type with no ingestion rule. Carried so the dispatcher, not
    /// ingestion, owns the unsupported-construct error.
    Unknown { type_name: String },
}

impl NodeKind {
    /// The ESTree `type` string this kind corresponds to; used in error
    /// messages.
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::TemplateLiteral { .. } => "TemplateLiteral",
            NodeKind::TemplateElement { .. } => "TemplateElement",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::AssignmentPattern { .. } => "AssignmentPattern",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::UpdateExpression { .. } => "UpdateExpression",
            NodeKind::SequenceExpression { .. } => "SequenceExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            NodeKind::ObjectExpression { .. } => "ObjectExpression",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::Property { .. } => "Property",
            NodeKind::ObjectPattern { .. } => "ObjectPattern",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::ClassDeclaration { .. } => "ClassDeclaration",
            NodeKind::ClassBody { .. } => "ClassBody",
            NodeKind::MethodDefinition { .. } => "MethodDefinition",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::Super => "Super",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::DoWhileStatement { .. } => "DoWhileStatement",
            NodeKind::ForStatement { .. } => "ForStatement",
            NodeKind::ForInStatement { .. } => "ForInStatement",
            NodeKind::ForOfStatement { .. } => "ForOfStatement",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::TryStatement { .. } => "TryStatement",
            NodeKind::CatchClause { .. } => "CatchClause",
            NodeKind::ThrowStatement { .. } => "ThrowStatement",
            NodeKind::ImportDeclaration { .. } => "ImportDeclaration",
            NodeKind::ImportSpecifier { .. } => "ImportSpecifier",
            NodeKind::ExportNamedDeclaration { .. } => "ExportNamedDeclaration",
            NodeKind::ExportDefaultDeclaration { .. } => "ExportDefaultDeclaration",
            NodeKind::ModuleDeclaration { .. } => "ModuleDeclaration",
            NodeKind::RestElement { .. } => "RestElement",
            NodeKind::SpreadElement { .. } => "SpreadElement",
            NodeKind::YieldExpression { .. } => "YieldExpression",
            NodeKind::Unknown { type_name } => type_name,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration(_)
                | NodeKind::FunctionExpression(_)
                | NodeKind::ArrowFunctionExpression(_)
        )
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub loc: Range,
    /// Set by the dispatcher on the way down; `NONE` until first visited.
    pub parent: NodeId,
    pub flags: NodeFlags,
    pub leading_comments: SmallVec<[CommentId; 2]>,
    pub trailing_comments: SmallVec<[CommentId; 2]>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span, loc: Range) -> Self {
        Node {
            kind,
            span,
            loc,
            parent: NodeId::NONE,
            flags: NodeFlags::empty(),
            leading_comments: SmallVec::new(),
            trailing_comments: SmallVec::new(),
        }
    }
}
