//! Expression emission rules.

use js2php_ast::{LiteralValue, NodeFlags, NodeId, NodeKind, names};

use super::{Flow, Translator};
use crate::builtins;
use crate::error::Result;

impl Translator {
    /// `$`-sigiled unless the identifier names a callee, a class-style
    /// static reference or a member property. Resolving the name is what
    /// records captures.
    pub(super) fn identifier(&mut self, node: NodeId, name: &str) {
        let bare = self.ast.flags(node).intersects(
            NodeFlags::IS_STATIC | NodeFlags::IS_CALLEE | NodeFlags::IS_MEMBER_PROPERTY,
        );
        if bare {
            self.em.emit(name);
        } else {
            let _ = self.scopes.resolve(name);
            self.em.emit(&format!("${name}"));
        }
    }

    pub(super) fn binary(
        &mut self,
        node: NodeId,
        operator: &str,
        left: NodeId,
        right: NodeId,
    ) -> Result<Flow> {
        // `key in obj` has no PHP operator; isset(obj[key]) is the idiom.
        if operator == "in" {
            let member = self.ast.synth_member(right, left, true);
            let call = self.ast.synth_call_named("isset", vec![member]);
            self.visit(call, node)?;
            return Ok(Flow::Continue);
        }

        let mut operator = operator.to_string();
        if operator.contains('+') && self.is_string_typed(left) && self.is_string_typed(right) {
            operator = operator.replace('+', ".");
        }

        self.visit(left, node)?;
        self.em.emit(&format!(" {operator} "));
        self.em.incr_indent();
        self.visit(right, node)?;
        self.em.decr_indent();
        Ok(Flow::Continue)
    }

    /// Structural string typing: an operand counts as a string when it is
    /// a variable whose declarator was initialized from a string literal.
    fn is_string_typed(&mut self, expr: NodeId) -> bool {
        let NodeKind::Identifier { name } = self.ast.kind(expr) else {
            return false;
        };
        let name = name.clone();
        let Some(definition) = self.scopes.resolve(&name) else {
            return false;
        };
        matches!(
            self.ast.kind(definition),
            NodeKind::VariableDeclarator { init, .. }
                if init.is_some() && self.ast.is_string_literal(*init)
        )
    }

    pub(super) fn receiver_is_string(&mut self, object: NodeId) -> bool {
        self.ast.is_string_literal(object) || self.is_string_typed(object)
    }

    pub(super) fn assignment(
        &mut self,
        node: NodeId,
        operator: &str,
        left: NodeId,
        right: NodeId,
    ) -> Result<Flow> {
        self.scopes.register_assignment_target(&self.ast, left);
        self.visit(left, node)?;
        self.em.emit(&format!(" {operator} "));
        self.visit(right, node)?;
        Ok(Flow::Continue)
    }

    pub(super) fn conditional(
        &mut self,
        node: NodeId,
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    ) -> Result<Flow> {
        self.em.emit("(");
        self.ast.set_flag(test, NodeFlags::SUPPRESS_PARENS);
        self.visit(test, node)?;
        self.em.emit(") ? ");
        self.visit(consequent, node)?;
        self.em.emit(" : ");
        self.visit(alternate, node)?;
        Ok(Flow::Continue)
    }

    pub(super) fn unary(
        &mut self,
        node: NodeId,
        operator: &str,
        argument: NodeId,
    ) -> Result<Flow> {
        match operator {
            "typeof" => {
                let call = self.ast.synth_call_named("gettype", vec![argument]);
                self.visit(call, node)?;
            }
            "delete" => {
                let call = self.ast.synth_call_named("unset", vec![argument]);
                self.visit(call, node)?;
            }
            _ => {
                self.em.emit(operator);
                self.visit(argument, node)?;
            }
        }
        Ok(Flow::Continue)
    }

    pub(super) fn call_expression(
        &mut self,
        node: NodeId,
        parent: NodeId,
        callee: NodeId,
        arguments: Vec<NodeId>,
        semicolon: &mut bool,
    ) -> Result<Flow> {
        // Resolve the callee name before any rewrite; a binding to a
        // variable or parameter keeps the `$` sigil on the emitted callee.
        let callee_definition = match self.ast.kind(callee) {
            NodeKind::Identifier { name } => {
                let name = name.clone();
                self.scopes.resolve(&name)
            }
            _ => None,
        };

        let string_receiver = match self.ast.kind(callee) {
            NodeKind::MemberExpression { object, .. } => {
                let object = *object;
                self.receiver_is_string(object)
            }
            _ => false,
        };
        let rewritten = builtins::evaluate(&mut self.ast, node, string_receiver);
        let was_rewritten = rewritten != node;
        let (callee, arguments) = match self.ast.kind(rewritten) {
            NodeKind::CallExpression { callee, arguments } => (*callee, arguments.clone()),
            _ => (callee, arguments),
        };

        let callee_is_variable = callee_definition.is_some_and(|definition| {
            matches!(
                self.ast.kind(definition),
                NodeKind::Identifier { .. } | NodeKind::VariableDeclarator { .. }
            )
        });
        if !callee_is_variable {
            self.ast.set_flag(callee, NodeFlags::IS_CALLEE);
        }

        // A rewritten two-argument array_push standing alone as a statement
        // reads better as append syntax.
        if was_rewritten
            && parent.is_some()
            && matches!(self.ast.kind(parent), NodeKind::ExpressionStatement { .. })
            && matches!(self.ast.kind(callee), NodeKind::Identifier { name } if name == "array_push")
            && arguments.len() == 2
        {
            self.visit(arguments[0], node)?;
            self.em.emit("[] = ");
            self.visit(arguments[1], node)?;
            self.loc_end(rewritten);
            return Ok(Flow::Stop);
        }

        if matches!(self.ast.kind(callee), NodeKind::Super) {
            self.em.emit("parent::__construct");
        } else {
            self.visit(callee, node)?;
        }

        // A function expression invoked directly inside a binding is
        // inlined; the binding is then re-bound to its own call result.
        if self.ast.has_flag(callee, NodeFlags::IS_CALLEE)
            && matches!(
                self.ast.kind(callee),
                NodeKind::FunctionExpression(_) | NodeKind::FunctionDeclaration(_)
            )
            && parent.is_some()
        {
            let identifier = match self.ast.kind(parent) {
                NodeKind::VariableDeclarator { id, .. } => {
                    self.ast.name_of(*id).map(str::to_string)
                }
                NodeKind::AssignmentExpression { left, .. } => {
                    self.ast.name_of(*left).map(str::to_string)
                }
                _ => None,
            };
            if let Some(name) = identifier {
                self.em.emit(";");
                self.em.nl();
                self.em.emit(&format!("${name} = ${name}"));
            }
        }

        let is_iife = self.ast.has_flag(node, NodeFlags::IS_IIFE);
        if is_iife {
            // The opener came from the enclosing statement's
            // call_user_func(; the callable itself is argument zero.
            if !arguments.is_empty() {
                self.em.emit(",");
            }
        } else {
            self.em.emit("(");
            self.em.incr_indent();
        }
        let count = arguments.len();
        for (i, &argument) in arguments.iter().enumerate() {
            if argument.is_some() {
                if count == 1 {
                    self.ast.set_flag(argument, NodeFlags::SUPPRESS_PARENS);
                }
                self.visit(argument, node)?;
            }
            if i + 1 < count {
                self.em.emit(", ");
            }
        }
        if !is_iife {
            self.em.decr_indent();
        }
        self.em.emit(")");

        if parent.is_some() && matches!(self.ast.kind(parent), NodeKind::ExpressionStatement { .. })
        {
            *semicolon = true;
        }
        Ok(Flow::Continue)
    }

    pub(super) fn member_expression(
        &mut self,
        node: NodeId,
        parent: NodeId,
        object: NodeId,
        property: NodeId,
        computed: bool,
    ) -> Result<Flow> {
        let string_receiver = self.receiver_is_string(object);
        let rewritten = builtins::evaluate(&mut self.ast, node, string_receiver);
        if rewritten != node {
            // The shared tail still closes the original node's location.
            self.visit(rewritten, parent)?;
            return Ok(Flow::Continue);
        }

        // For a nested chain like a.b.c the accessor is decided by the
        // inner pair.
        let (selected_object, selected_property) = match self.ast.kind(object) {
            NodeKind::MemberExpression { object: inner_object, property: inner_property, .. } => {
                (*inner_object, *inner_property)
            }
            _ => (object, property),
        };
        if self.ast.name_of(selected_object).is_some_and(names::starts_uppercase) {
            self.ast.set_flag(selected_object, NodeFlags::IS_STATIC);
        }
        if self.ast.name_of(selected_property).is_some_and(names::starts_uppercase) {
            self.ast.set_flag(selected_property, NodeFlags::IS_STATIC);
        }

        let accessor = if self.ast.has_flag(property, NodeFlags::IS_STATIC)
            && self.ast.has_flag(selected_object, NodeFlags::IS_STATIC)
        {
            "\\"
        } else if self.ast.has_flag(selected_property, NodeFlags::IS_STATIC)
            || self.ast.has_flag(selected_object, NodeFlags::IS_STATIC)
            || matches!(self.ast.kind(selected_object), NodeKind::Super)
        {
            "::"
        } else {
            "->"
        };

        if computed {
            self.visit(object, node)?;
            self.block("[", |t| t.visit(property, node), "]")?;
        } else {
            self.ast.set_flag(property, NodeFlags::IS_MEMBER_PROPERTY);
            self.visit(object, node)?;
            self.em.emit(accessor);
            self.visit(property, node)?;
        }
        Ok(Flow::Continue)
    }

    /// Object and array literals share the PHP array form.
    pub(super) fn collection(&mut self, node: NodeId, items: Vec<NodeId>) -> Result<Flow> {
        let concise = self.options.concise_arrays;
        if items.is_empty() {
            self.em.emit(if concise { "[]" } else { "array()" });
            return Ok(Flow::Continue);
        }
        let (open, close) = if concise { ("[ ", " ]") } else { ("array( ", " )") };
        self.block(
            open,
            |t| {
                let count = items.len();
                for (i, &item) in items.iter().enumerate() {
                    if item.is_some() {
                        t.visit(item, node)?;
                    }
                    if i + 1 < count {
                        t.em.emit(", ");
                    }
                }
                Ok(())
            },
            close,
        )?;
        Ok(Flow::Continue)
    }

    pub(super) fn property_key_text(&self, key: NodeId) -> Result<String> {
        match self.ast.kind(key) {
            NodeKind::Identifier { name } => Ok(name.clone()),
            NodeKind::Literal { value: LiteralValue::String(text), .. } => Ok(text.clone()),
            NodeKind::Literal { value: LiteralValue::Number(n), .. } => Ok(format!("{n}")),
            _ => Err(self.unsupported(key)),
        }
    }

    /// Template literals map to double-quoted PHP strings with `{…}`
    /// interpolation splices, in source order.
    pub(super) fn template_literal(
        &mut self,
        node: NodeId,
        quasis: Vec<NodeId>,
        expressions: Vec<NodeId>,
    ) -> Result<Flow> {
        let mut parts: Vec<NodeId> = quasis.into_iter().chain(expressions).collect();
        parts.sort_by_key(|&id| self.ast.node(id).span.start);
        self.em.emit("\"");
        for part in parts {
            if let NodeKind::TemplateElement { cooked } = self.ast.kind(part) {
                let text = cooked.clone();
                self.em.emit(&text);
            } else {
                self.em.emit("{");
                self.visit(part, node)?;
                self.em.emit("}");
            }
        }
        self.em.emit("\"");
        Ok(Flow::Continue)
    }
}
