//! The node dispatcher: one emission rule per AST node kind.
//!
//! `visit` wraps every rule with the shared location protocol: set the
//! parent back-reference, flush leading comments and sync the line counter
//! (`loc_start`), run the rule, terminate the statement if the rule asked
//! for it, then close parentheses, sync the end line and flush trailing
//! comments (`loc_end`). Rules that take over that tail themselves return
//! [`Flow::Stop`].

mod classes;
mod expressions;
mod functions;
mod modules;
mod statements;
#[cfg(test)]
mod tests;

use js2php_ast::{Ast, CommentId, CommentKind, NodeFlags, NodeId, NodeKind};

use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::positions::PositionIndex;
use crate::scope::{ScopeId, ScopeTree};

/// Whether `visit` should still run the shared statement/location tail.
pub(crate) enum Flow {
    Continue,
    Stop,
}

pub(crate) struct Translator {
    pub(super) ast: Ast,
    pub(super) em: Emitter,
    pub(super) scopes: ScopeTree,
    pub(super) positions: PositionIndex,
    pub(super) options: Options,
    /// Name override for the next function visited; set by method
    /// definitions, which emit `function __construct(` and friends.
    pub(super) pending_fn_name: Option<String>,
    /// Scope of the most recently emitted function; constructor field
    /// promotion reads it back.
    pub(super) last_fn_scope: Option<ScopeId>,
}

impl Translator {
    pub(crate) fn new(ast: Ast, options: Options) -> Self {
        let positions = PositionIndex::build(&ast.source, &ast.tokens);
        Translator {
            ast,
            em: Emitter::new(),
            scopes: ScopeTree::new(),
            positions,
            options,
            pending_fn_name: None,
            last_fn_scope: None,
        }
    }

    pub(crate) fn run(mut self) -> Result<String> {
        self.em.emit("<?php\n");
        if let Some(watermark) = self.options.watermark.clone() {
            self.em.emit(&format!("/* {watermark} */\n"));
        }
        let root = self.ast.root;
        self.visit(root, NodeId::NONE)?;
        Ok(self.em.into_string())
    }

    pub(super) fn visit(&mut self, node: NodeId, parent: NodeId) -> Result<()> {
        if parent.is_some() {
            self.ast.set_parent(node, parent);
        }
        let suppress_loc = self.ast.has_flag(node, NodeFlags::SUPPRESS_LOC);
        if !suppress_loc {
            self.loc_start(node);
        }
        let mut semicolon = false;
        match self.dispatch(node, parent, &mut semicolon)? {
            Flow::Stop => return Ok(()),
            Flow::Continue => {}
        }
        if semicolon {
            self.em.ensure_semi();
        }
        if !suppress_loc {
            self.loc_end(node);
        }
        Ok(())
    }

    fn dispatch(&mut self, node: NodeId, parent: NodeId, semicolon: &mut bool) -> Result<Flow> {
        match self.ast.kind(node).clone() {
            NodeKind::Program { body } => self.visit_body(node, body, true),
            NodeKind::BlockStatement { body } | NodeKind::ClassBody { body } => {
                self.visit_body(node, body, false)
            }
            NodeKind::EmptyStatement => Ok(Flow::Continue),
            NodeKind::ExpressionStatement { expression } => {
                self.expression_statement(node, expression, semicolon)
            }
            NodeKind::VariableDeclaration { declarations } => {
                for declarator in declarations {
                    self.visit(declarator, node)?;
                }
                Ok(Flow::Continue)
            }
            NodeKind::VariableDeclarator { id, init } => {
                self.variable_declarator(node, parent, id, init, semicolon)
            }
            NodeKind::Identifier { name } => {
                self.identifier(node, &name);
                Ok(Flow::Continue)
            }
            NodeKind::Literal { raw, .. } => {
                // An "undefined" literal only exists as a quoted sentinel.
                if raw == "\"undefined\"" || raw == "'undefined'" {
                    self.em.emit("NULL");
                } else {
                    self.em.emit(&raw);
                }
                Ok(Flow::Continue)
            }
            NodeKind::TemplateLiteral { quasis, expressions } => {
                self.template_literal(node, quasis, expressions)
            }
            NodeKind::TemplateElement { cooked } => {
                self.em.emit(&cooked);
                Ok(Flow::Continue)
            }
            NodeKind::BinaryExpression { operator, left, right }
            | NodeKind::LogicalExpression { operator, left, right } => {
                self.binary(node, &operator, left, right)
            }
            NodeKind::AssignmentExpression { operator, left, right } => {
                self.assignment(node, &operator, left, right)
            }
            NodeKind::AssignmentPattern { left, right } => self.assignment(node, "=", left, right),
            NodeKind::ConditionalExpression { test, consequent, alternate } => {
                self.conditional(node, test, consequent, alternate)
            }
            NodeKind::UnaryExpression { operator, argument } => {
                self.unary(node, &operator, argument)
            }
            NodeKind::UpdateExpression { operator, prefix, argument } => {
                if prefix {
                    self.em.emit(&operator);
                }
                self.visit(argument, node)?;
                if !prefix {
                    self.em.emit(&operator);
                }
                Ok(Flow::Continue)
            }
            NodeKind::SequenceExpression { expressions } => {
                for (i, expr) in expressions.iter().enumerate() {
                    if i > 0 {
                        self.em.emit(", ");
                    }
                    self.visit(*expr, node)?;
                }
                *semicolon = true;
                Ok(Flow::Continue)
            }
            NodeKind::CallExpression { callee, arguments } => {
                self.call_expression(node, parent, callee, arguments, semicolon)
            }
            NodeKind::NewExpression { .. } => {
                let call = self.ast.reshape_as_call(node);
                self.em.emit("new ");
                self.visit(call, node)?;
                Ok(Flow::Stop)
            }
            NodeKind::MemberExpression { object, property, computed } => {
                self.member_expression(node, parent, object, property, computed)
            }
            NodeKind::FunctionDeclaration(parts)
            | NodeKind::FunctionExpression(parts)
            | NodeKind::ArrowFunctionExpression(parts) => {
                let scope = self.visit_function(node, parent, &parts)?;
                self.last_fn_scope = Some(scope);
                Ok(Flow::Continue)
            }
            NodeKind::ObjectExpression { properties } => self.collection(node, properties),
            NodeKind::ArrayExpression { elements } => self.collection(node, elements),
            NodeKind::Property { key, value } => {
                let name = self.property_key_text(key)?;
                self.em.emit(&format!("\"{name}\" => "));
                self.visit(value, node)?;
                Ok(Flow::Continue)
            }
            NodeKind::ReturnStatement { argument } => {
                *semicolon = true;
                self.em.emit("return");
                if argument.is_some() {
                    self.em.emit(" ");
                    self.visit(argument, node)?;
                }
                Ok(Flow::Continue)
            }
            NodeKind::ClassDeclaration { id, super_class, body } => {
                self.class_declaration(node, id, super_class, body)
            }
            NodeKind::MethodDefinition { key, value, kind, is_static } => {
                self.method_definition(node, key, value, kind, is_static)
            }
            NodeKind::ThisExpression => {
                self.em.emit("$this");
                Ok(Flow::Continue)
            }
            NodeKind::Super => {
                self.em.emit("parent");
                Ok(Flow::Continue)
            }
            NodeKind::IfStatement { test, consequent, alternate } => {
                self.if_statement(node, test, consequent, alternate)
            }
            NodeKind::WhileStatement { test, body } => {
                self.em.emit("while ");
                self.ast.set_flag(test, NodeFlags::SUPPRESS_PARENS);
                self.block("( ", |t| t.visit(test, node), " )")?;
                self.em.emit(" ");
                self.block("{", |t| t.visit(body, node), "}")?;
                Ok(Flow::Continue)
            }
            NodeKind::DoWhileStatement { body, test } => {
                self.em.emit("do ");
                self.block("{", |t| t.visit(body, node), "}")?;
                self.em.emit(" while ");
                self.ast.set_flag(test, NodeFlags::SUPPRESS_PARENS);
                self.block("(", |t| t.visit(test, node), ")")?;
                *semicolon = true;
                Ok(Flow::Continue)
            }
            NodeKind::ForStatement { init, test, update, body } => {
                self.for_statement(node, init, test, update, body)
            }
            NodeKind::ForInStatement { left, right, body } => {
                self.for_each(node, left, right, body, true)
            }
            NodeKind::ForOfStatement { left, right, body } => {
                self.for_each(node, left, right, body, false)
            }
            NodeKind::SwitchStatement { discriminant, cases } => {
                self.switch_statement(node, discriminant, cases)
            }
            NodeKind::SwitchCase { test, consequent } => {
                self.switch_case(node, test, consequent)
            }
            NodeKind::BreakStatement => {
                self.em.emit("break;");
                Ok(Flow::Continue)
            }
            NodeKind::ContinueStatement => {
                self.em.emit("continue;");
                Ok(Flow::Continue)
            }
            NodeKind::TryStatement { block, handler, finalizer } => {
                self.try_statement(node, block, handler, finalizer)
            }
            NodeKind::CatchClause { param, body } => self.catch_clause(node, param, body),
            NodeKind::ThrowStatement { argument } => {
                self.em.emit("throw ");
                self.visit(argument, node)?;
                *semicolon = true;
                Ok(Flow::Continue)
            }
            NodeKind::ImportDeclaration { specifiers, .. } => {
                for specifier in specifiers {
                    self.visit(specifier, node)?;
                }
                Ok(Flow::Continue)
            }
            NodeKind::ImportSpecifier { imported, local } => {
                self.import_specifier(node, parent, imported, local)
            }
            NodeKind::ExportNamedDeclaration { declaration }
            | NodeKind::ExportDefaultDeclaration { declaration } => {
                if declaration.is_some() {
                    self.visit(declaration, node)?;
                }
                Ok(Flow::Continue)
            }
            NodeKind::ModuleDeclaration { id, body } => self.module_declaration(node, id, body),
            NodeKind::RestElement { argument } | NodeKind::SpreadElement { argument } => {
                self.em.emit("...");
                self.visit(argument, node)?;
                Ok(Flow::Continue)
            }
            NodeKind::YieldExpression { argument } => {
                self.em.emit("/* await */ ");
                if argument.is_some() {
                    self.visit(argument, node)?;
                }
                Ok(Flow::Continue)
            }
            NodeKind::ObjectPattern { .. } | NodeKind::Unknown { .. } => {
                Err(self.unsupported(node))
            }
        }
    }

    // === Location protocol ===

    pub(super) fn loc_start(&mut self, node: NodeId) {
        let leading = self.ast.node(node).leading_comments.clone();
        for comment in leading {
            self.emit_comment(comment);
        }
        if matches!(self.ast.kind(node), NodeKind::Program { .. }) {
            return;
        }
        let loc = self.ast.node(node).loc;
        if loc.is_synthetic() {
            return;
        }
        self.em.sync_to_line(loc.start.line);
        if !self.ast.has_flag(node, NodeFlags::SUPPRESS_PARENS)
            && self.positions.paren_wrapped(&self.ast.tokens, loc)
        {
            self.em.emit("(");
        }
    }

    pub(super) fn loc_end(&mut self, node: NodeId) {
        let loc = self.ast.node(node).loc;
        if !loc.is_synthetic() {
            if !self.ast.has_flag(node, NodeFlags::SUPPRESS_PARENS)
                && self.positions.paren_wrapped(&self.ast.tokens, loc)
            {
                self.em.emit(")");
            }
            self.em.sync_to_line(loc.end.line);
        }
        let trailing = self.ast.node(node).trailing_comments.clone();
        for comment in trailing {
            self.emit_comment(comment);
        }
    }

    pub(super) fn emit_comment(&mut self, id: CommentId) {
        if self.ast.comments[id.index()].emitted {
            return;
        }
        let comment = self.ast.comments[id.index()].clone();
        if !comment.loc.is_synthetic() {
            self.em.sync_to_line(comment.loc.start.line);
        }
        match comment.kind {
            CommentKind::Block => {
                self.em.emit("/*");
                for (i, line) in comment.text.split('\n').enumerate() {
                    if i > 0 {
                        self.em.nl();
                    }
                    self.em.emit(line.trim_start_matches('\t'));
                }
                self.em.emit("*/");
            }
            CommentKind::Line => {
                self.em.emit(&format!("//{}", comment.text));
                self.em.nl();
            }
        }
        self.ast.comments[id.index()].emitted = true;
    }

    /// Brace/bracket block: emits the closer on its own line only when the
    /// body advanced past the opener's line.
    pub(super) fn block(
        &mut self,
        open: &str,
        body: impl FnOnce(&mut Self) -> Result<()>,
        close: &str,
    ) -> Result<()> {
        let first_line = self.em.line();
        self.em.emit(open);
        self.em.incr_indent();
        body(self)?;
        if self.em.line() != first_line {
            self.em.ensure_nl();
        }
        self.em.decr_indent();
        self.em.emit(close);
        Ok(())
    }

    pub(super) fn unsupported(&self, node: NodeId) -> Error {
        let loc = self.ast.node(node).loc;
        let detail = if loc.is_synthetic() {
            "synthesized node".to_string()
        } else {
            format!("line {}", loc.start.line)
        };
        Error::Unsupported {
            kind: self.ast.kind(node).type_name().to_string(),
            detail,
        }
    }
}
