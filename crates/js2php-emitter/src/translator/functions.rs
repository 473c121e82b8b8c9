//! Function emission: declarations, expressions and arrows share one rule.
//!
//! The body is emitted first and the capture clause patched in afterwards,
//! because captures are only known once the body has resolved its free
//! names. Two insertion points are pushed: one before the `{` for the
//! `use (…)` clause, one right after it for `global` bindings and the
//! synthesized `return` of expression-bodied arrows.

use js2php_ast::{FunctionParts, NodeFlags, NodeId, NodeKind};

use super::Translator;
use crate::error::Result;
use crate::scope::{ScopeId, ScopeKind};

impl Translator {
    pub(super) fn visit_function(
        &mut self,
        node: NodeId,
        parent: NodeId,
        parts: &FunctionParts,
    ) -> Result<ScopeId> {
        let name = match self.pending_fn_name.take() {
            Some(name) => name,
            None => self
                .ast
                .name_of(parts.id)
                .unwrap_or_default()
                .to_string(),
        };
        self.em.emit(&format!("function {name}("));
        self.em.incr_indent();

        let scope = self.scopes.enter(ScopeKind::Function);

        // Parameters are declared before any of them is emitted, so a
        // parameter shadowing an outer binding resolves locally instead of
        // being recorded as a capture.
        for &param in &parts.params {
            self.scopes.register(&self.ast, param);
        }

        let count = parts.params.len();
        for (i, &param) in parts.params.iter().enumerate() {
            let default = parts.defaults.get(i).copied().unwrap_or(NodeId::NONE);
            if default.is_some() {
                let with_default = self.ast.synth(NodeKind::BinaryExpression {
                    operator: "=".to_string(),
                    left: param,
                    right: default,
                });
                self.visit(with_default, node)?;
            } else {
                if count == 1 {
                    self.ast.set_flag(param, NodeFlags::SUPPRESS_PARENS);
                }
                self.visit(param, node)?;
            }
            if i + 1 < count {
                self.em.emit(", ");
            }
        }

        self.em.decr_indent();
        self.em.emit(") ");

        let at_top_level = parent.is_some()
            && matches!(self.ast.kind(parent), NodeKind::Program { .. });

        self.em.push_insertion_point();
        let first_line = self.em.line();
        self.em.emit("{");
        self.em.incr_indent();
        self.em.push_insertion_point();

        self.visit(parts.body, node)?;

        let using = self.scopes.using_names(scope);
        if !using.is_empty() {
            if at_top_level {
                // No enclosing function to capture from; bind through the
                // global table instead.
                let bindings: String = using
                    .iter()
                    .map(|name| format!("\n\tglobal ${name};"))
                    .collect();
                self.em.insert_at(0, &bindings);
            } else {
                let captures = using
                    .iter()
                    .map(|name| format!("&${name}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.em.insert_at(1, &format!("use ({captures}) "));
            }
        }

        if parts.expression {
            // x => x * 2
            self.em.insert_at(0, "return ");
            self.em.emit(";");
        }

        if self.em.line() != first_line {
            self.em.ensure_nl();
        }
        self.em.decr_indent();
        self.em.emit("}");
        self.em.pop_insertion_point();
        self.em.pop_insertion_point();

        self.scopes.exit();
        Ok(scope)
    }
}
