//! Statement-level emission rules.

use js2php_ast::{NodeFlags, NodeId, NodeKind};

use super::{Flow, Translator};
use crate::error::Result;
use crate::scope::ScopeKind;

impl Translator {
    /// Shared rule for Program, block and class bodies. The program body
    /// additionally gets its prologue handled: strictness declarations are
    /// dropped, an optional namespace is emitted, and leading require
    /// bindings turn into `use` imports.
    pub(super) fn visit_body(
        &mut self,
        node: NodeId,
        mut body: Vec<NodeId>,
        is_program: bool,
    ) -> Result<Flow> {
        if let Some(&first) = body.first() {
            if self.is_use_strict_statement(first) {
                // The directive is dropped, but its comments still flush.
                self.loc_start(first);
                body.remove(0);
            }
        }
        if is_program {
            if let Some(namespace) = self.options.namespace.clone() {
                self.em.emit(&format!("namespace {namespace};"));
                self.em.nl();
            }
            // Bare require(...) statements pin no binding; skip them.
            while body.first().is_some_and(|&s| self.is_bare_require(s)) {
                body.remove(0);
            }
            while body.first().is_some_and(|&s| self.is_require_declaration(s)) {
                let declaration = body.remove(0);
                self.emit_require_import(declaration)?;
            }
        }
        for statement in body {
            self.visit(statement, node)?;
        }
        Ok(Flow::Continue)
    }

    fn is_use_strict_statement(&self, statement: NodeId) -> bool {
        match self.ast.kind(statement) {
            NodeKind::ExpressionStatement { expression } => {
                self.ast.is_use_strict_literal(*expression)
            }
            _ => false,
        }
    }

    fn is_bare_require(&self, statement: NodeId) -> bool {
        let NodeKind::ExpressionStatement { expression } = self.ast.kind(statement) else {
            return false;
        };
        self.is_require_call(*expression)
    }

    pub(super) fn is_require_call(&self, expr: NodeId) -> bool {
        let NodeKind::CallExpression { callee, .. } = self.ast.kind(expr) else {
            return false;
        };
        matches!(self.ast.kind(*callee), NodeKind::Identifier { name } if name == "require")
    }

    fn is_require_declaration(&self, statement: NodeId) -> bool {
        let NodeKind::VariableDeclaration { declarations } = self.ast.kind(statement) else {
            return false;
        };
        declarations.first().is_some_and(|&d| {
            matches!(
                self.ast.kind(d),
                NodeKind::VariableDeclarator { init, .. }
                    if init.is_some() && self.is_require_call(*init)
            )
        })
    }

    pub(super) fn expression_statement(
        &mut self,
        node: NodeId,
        expression: NodeId,
        semicolon: &mut bool,
    ) -> Result<Flow> {
        if self.ast.is_use_strict_literal(expression) {
            return Ok(Flow::Stop);
        }
        let iife = match self.ast.kind(expression) {
            NodeKind::CallExpression { callee, .. } => self.ast.kind(*callee).is_function(),
            _ => false,
        };
        if iife {
            self.ast
                .set_flag(expression, NodeFlags::IS_IIFE | NodeFlags::SUPPRESS_PARENS);
            self.em.emit("call_user_func(");
        }
        self.visit(expression, node)?;
        *semicolon = true;
        Ok(Flow::Continue)
    }

    pub(super) fn variable_declarator(
        &mut self,
        node: NodeId,
        parent: NodeId,
        id: NodeId,
        init: NodeId,
        semicolon: &mut bool,
    ) -> Result<Flow> {
        self.scopes.register(&self.ast, node);

        let in_for_head = parent.is_some() && {
            let grandparent = self.ast.parent(parent);
            grandparent.is_some()
                && matches!(
                    self.ast.kind(grandparent),
                    NodeKind::ForStatement { .. }
                        | NodeKind::ForInStatement { .. }
                        | NodeKind::ForOfStatement { .. }
                )
        };
        // A declaration list in a for head is comma-separated.
        if in_for_head {
            self.em.replace_semi_with_comma();
        }

        let Some(name) = self.ast.name_of(id).map(str::to_string) else {
            return Err(self.unsupported(id));
        };
        self.em.emit(&format!("${name}"));

        if init.is_some() {
            self.em.emit(" = ");
            self.visit(init, node)?;
            *semicolon = true;
        } else if !in_for_head {
            // PHP has no uninitialized locals.
            self.em.emit(" = null");
            *semicolon = true;
        }
        Ok(Flow::Continue)
    }

    pub(super) fn if_statement(
        &mut self,
        node: NodeId,
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    ) -> Result<Flow> {
        self.em.emit("if ");
        self.ast.set_flag(test, NodeFlags::SUPPRESS_PARENS);
        self.block("(", |t| t.visit(test, node), ")")?;
        self.em.emit(" ");
        self.block("{", |t| t.visit(consequent, node), "}")?;
        if alternate.is_some() {
            self.em.emit(" else ");
            if matches!(self.ast.kind(alternate), NodeKind::BlockStatement { .. }) {
                self.block("{", |t| t.visit(alternate, node), "}")?;
            } else {
                // else-if chains keep their shape.
                self.visit(alternate, node)?;
            }
        }
        Ok(Flow::Continue)
    }

    pub(super) fn for_statement(
        &mut self,
        node: NodeId,
        init: NodeId,
        test: NodeId,
        update: NodeId,
        body: NodeId,
    ) -> Result<Flow> {
        self.em.emit("for ");
        self.block(
            "(",
            |t| {
                if init.is_some() {
                    t.visit(init, node)?;
                }
                t.em.ensure_semi();
                t.em.emit(" ");
                if test.is_some() {
                    t.visit(test, node)?;
                }
                t.em.ensure_semi();
                t.em.emit(" ");
                if update.is_some() {
                    t.visit(update, node)?;
                }
                Ok(())
            },
            ")",
        )?;
        self.em.emit(" ");
        self.block("{", |t| t.visit(body, node), "}")?;
        Ok(Flow::Continue)
    }

    /// for-in and for-of both lower to `foreach`, binding the discarded
    /// side of the `key => value` pair to the `$___` placeholder: for-in
    /// iterates keys, for-of values.
    pub(super) fn for_each(
        &mut self,
        node: NodeId,
        left: NodeId,
        right: NodeId,
        body: NodeId,
        is_for_in: bool,
    ) -> Result<Flow> {
        self.em.emit("foreach ");
        self.block(
            "(",
            |t| {
                t.visit(right, node)?;
                t.em.emit(" as ");
                if is_for_in {
                    t.visit(left, node)?;
                    t.em.emit(" => $___");
                } else {
                    t.em.emit("$___ => ");
                    t.visit(left, node)?;
                }
                Ok(())
            },
            ")",
        )?;
        self.em.emit(" ");
        self.block("{", |t| t.visit(body, node), "}")?;
        Ok(Flow::Continue)
    }

    pub(super) fn switch_statement(
        &mut self,
        node: NodeId,
        discriminant: NodeId,
        cases: Vec<NodeId>,
    ) -> Result<Flow> {
        self.em.emit("switch ");
        self.ast.set_flag(discriminant, NodeFlags::SUPPRESS_PARENS);
        self.block("(", |t| t.visit(discriminant, node), ")")?;
        self.em.emit(" ");
        self.block(
            "{",
            |t| {
                for case in cases {
                    t.visit(case, node)?;
                    t.em.nl();
                }
                Ok(())
            },
            "}",
        )?;
        Ok(Flow::Continue)
    }

    /// Fallthrough is preserved as-is; PHP switch has the same semantics.
    pub(super) fn switch_case(
        &mut self,
        node: NodeId,
        test: NodeId,
        consequent: Vec<NodeId>,
    ) -> Result<Flow> {
        if test.is_some() {
            self.em.emit("case ");
            self.visit(test, node)?;
            self.em.emit(":");
        } else {
            self.em.emit("default:");
        }
        self.em.nl();
        for statement in consequent {
            self.visit(statement, node)?;
        }
        Ok(Flow::Continue)
    }

    pub(super) fn try_statement(
        &mut self,
        node: NodeId,
        block: NodeId,
        handler: NodeId,
        finalizer: NodeId,
    ) -> Result<Flow> {
        self.em.emit("try ");
        self.block("{", |t| t.visit(block, node), "}")?;
        if handler.is_some() {
            self.visit(handler, node)?;
        }
        if finalizer.is_some() {
            self.em.emit(" finally ");
            self.block("{", |t| t.visit(finalizer, node), "}")?;
        }
        Ok(Flow::Continue)
    }

    /// Catch binds a generic exception type; the source never declares one.
    pub(super) fn catch_clause(
        &mut self,
        node: NodeId,
        param: NodeId,
        body: NodeId,
    ) -> Result<Flow> {
        self.em.emit(" catch (Exception ");
        self.scopes.enter(ScopeKind::Catch);
        self.scopes.register(&self.ast, param);
        self.ast.set_flag(param, NodeFlags::SUPPRESS_PARENS);
        self.visit(param, node)?;
        self.em.emit(") ");
        self.block("{", |t| t.visit(body, node), "}")?;
        self.scopes.exit();
        Ok(Flow::Continue)
    }
}
