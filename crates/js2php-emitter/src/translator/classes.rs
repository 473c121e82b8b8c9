//! Class emission: declarations, methods, accessor dispatchers and
//! constructor field promotion.

use js2php_ast::{CommentKind, MethodKind, NodeFlags, NodeId, NodeKind};

use super::{Flow, Translator};
use crate::error::Result;
use crate::scope::ScopeKind;

impl Translator {
    pub(super) fn class_declaration(
        &mut self,
        node: NodeId,
        id: NodeId,
        super_class: NodeId,
        body: NodeId,
    ) -> Result<Flow> {
        let Some(name) = self.ast.name_of(id).map(str::to_string) else {
            return Err(self.unsupported(id));
        };
        self.em.emit(&format!("class {name} "));
        if let Some(super_name) = self.ast.name_of(super_class).map(str::to_string) {
            self.em.emit(&format!("extends {super_name} "));
        }

        let scope = self.scopes.enter(ScopeKind::Class);
        self.em.emit("{");
        self.em.incr_indent();
        self.visit(body, node)?;

        // Getters and setters collected while walking the body become one
        // __get/__set dispatcher each, keyed on the property name.
        let getters = self.scopes.scope(scope).getters.clone();
        if !getters.is_empty() {
            self.em.emit("function __get($_property) ");
            self.accessor_dispatcher(node, &getters)?;
            self.em.nl();
        }
        let setters = self.scopes.scope(scope).setters.clone();
        if !setters.is_empty() {
            self.em.emit("function __set($_property, $value) ");
            self.accessor_dispatcher(node, &setters)?;
            self.em.nl();
        }

        self.em.decr_indent();
        self.em.emit("}");
        self.scopes.exit();
        Ok(Flow::Continue)
    }

    fn accessor_dispatcher(&mut self, class: NodeId, accessors: &[NodeId]) -> Result<()> {
        self.block(
            "{",
            |t| {
                for &accessor in accessors {
                    let NodeKind::MethodDefinition { key, value, .. } = t.ast.kind(accessor)
                    else {
                        continue;
                    };
                    let (key, value) = (*key, *value);
                    let Some(name) = t.ast.name_of(key).map(str::to_string) else {
                        return Err(t.unsupported(key));
                    };
                    t.em.nl();
                    t.em.emit(&format!("if ($_property === '{name}') "));
                    let body = match t.ast.kind(value) {
                        NodeKind::FunctionExpression(parts) => parts.body,
                        _ => return Err(t.unsupported(value)),
                    };
                    t.block("{", |t| t.visit(body, class), "}")?;
                }
                Ok(())
            },
            "}",
        )
    }

    pub(super) fn method_definition(
        &mut self,
        node: NodeId,
        key: NodeId,
        value: NodeId,
        kind: MethodKind,
        is_static: bool,
    ) -> Result<Flow> {
        self.scopes.register(&self.ast, node);

        // Accessors are not emitted in place; the class rule synthesizes
        // their dispatcher after the body.
        if matches!(kind, MethodKind::Get | MethodKind::Set) {
            return Ok(Flow::Stop);
        }

        let Some(key_name) = self.ast.name_of(key).map(str::to_string) else {
            return Err(self.unsupported(key));
        };
        let is_constructor = matches!(kind, MethodKind::Constructor) || key_name == "constructor";
        let method_name = if is_constructor { "__construct".to_string() } else { key_name };

        self.em.emit("public ");
        if is_static {
            self.em.emit("static ");
        }
        self.pending_fn_name = Some(method_name);
        self.visit(value, node)?;
        let method_scope = self.last_fn_scope.take();

        if is_constructor {
            if let Some(scope) = method_scope {
                self.promote_constructor_fields(scope)?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Every `this.<name> = …` recorded in the constructor's scope becomes
    /// a public field declaration, re-emitting its doc comment.
    fn promote_constructor_fields(&mut self, scope: crate::scope::ScopeId) -> Result<()> {
        let fields: Vec<NodeId> = self
            .scopes
            .scope(scope)
            .declarations
            .values()
            .copied()
            .collect();
        for definition in fields {
            let NodeKind::MemberExpression { property, .. } = self.ast.kind(definition) else {
                continue;
            };
            let property = *property;
            self.ast.clear_flag(property, NodeFlags::IS_MEMBER_PROPERTY);
            self.em.nl();

            // Re-arm and flush the assignment statement's doc comment so
            // the field carries it too.
            let assignment = self.ast.parent(definition);
            if assignment.is_some()
                && matches!(self.ast.kind(assignment), NodeKind::AssignmentExpression { .. })
            {
                let statement = self.ast.parent(assignment);
                if statement.is_some()
                    && matches!(self.ast.kind(statement), NodeKind::ExpressionStatement { .. })
                {
                    let leading = self.ast.node(statement).leading_comments.clone();
                    for comment in leading {
                        if self.ast.comments[comment.index()].kind == CommentKind::Block {
                            self.ast.comments[comment.index()].emitted = false;
                        }
                    }
                    self.loc_start(statement);
                }
            }

            self.em.emit("public ");
            self.ast.set_flag(property, NodeFlags::SUPPRESS_LOC);
            self.visit(property, NodeId::NONE)?;
            self.em.emit(";");
        }
        Ok(())
    }
}
