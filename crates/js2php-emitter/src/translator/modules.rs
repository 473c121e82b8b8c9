//! Module constructs: require-bindings, ES imports/exports and namespace
//! declarations.

use js2php_ast::{NodeId, NodeKind, names};

use super::{Flow, Translator};
use crate::error::Result;

impl Translator {
    /// A leading `var x = require('…')` binding becomes a `use` import;
    /// a destructured one becomes one import per key, aliased when the
    /// binding name differs.
    pub(super) fn emit_require_import(&mut self, declaration: NodeId) -> Result<()> {
        let NodeKind::VariableDeclaration { declarations } = self.ast.kind(declaration).clone()
        else {
            return Ok(());
        };
        for declarator in declarations {
            let NodeKind::VariableDeclarator { id, .. } = self.ast.kind(declarator) else {
                continue;
            };
            let id = *id;
            match self.ast.kind(id).clone() {
                NodeKind::ObjectPattern { properties } => {
                    self.loc_start(declarator);
                    for (i, property) in properties.iter().enumerate() {
                        if i > 0 {
                            self.em.nl();
                        }
                        let NodeKind::Property { key, value } = self.ast.kind(*property) else {
                            continue;
                        };
                        let (key, value) = (*key, *value);
                        let key_name = self.ast.name_of(key).unwrap_or_default().to_string();
                        let local = self.ast.name_of(value).unwrap_or_default().to_string();
                        let mut name = names::classize(&key_name);
                        if let Some(namespace) = &self.options.namespace {
                            name = format!("{namespace}\\{name}");
                        }
                        self.em.emit(&format!("use {name}"));
                        if key_name != local {
                            self.em.emit(&format!(" as {}", names::classize(&local)));
                        }
                        self.em.emit(";");
                    }
                    self.loc_end(declarator);
                }
                NodeKind::Identifier { name } => {
                    let name = match &self.options.namespace {
                        Some(namespace) => format!("{namespace}\\{name}"),
                        None => name,
                    };
                    self.loc_start(declarator);
                    self.em.emit(&format!("use {name};"));
                    self.loc_end(declarator);
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub(super) fn import_specifier(
        &mut self,
        _node: NodeId,
        parent: NodeId,
        imported: NodeId,
        local: NodeId,
    ) -> Result<Flow> {
        // The module path lives on the enclosing declaration.
        let source = match self.ast.kind(parent) {
            NodeKind::ImportDeclaration { source, .. } => *source,
            _ => NodeId::NONE,
        };
        let namespace = self
            .ast
            .name_of(source)
            .map(names::classize)
            .unwrap_or_default();
        let Some(imported_name) = self.ast.name_of(imported).map(str::to_string) else {
            return Err(self.unsupported(imported));
        };
        self.em.emit(&format!("use \\{namespace}\\{imported_name}"));
        if let Some(local_name) = self.ast.name_of(local) {
            if local_name != imported_name {
                let alias = local_name.to_string();
                self.em.emit(&format!(" as {alias}"));
            }
        }
        self.em.emit(";\n");
        Ok(Flow::Continue)
    }

    pub(super) fn module_declaration(
        &mut self,
        node: NodeId,
        id: NodeId,
        body: NodeId,
    ) -> Result<Flow> {
        let name = self
            .ast
            .name_of(id)
            .map(names::classize)
            .unwrap_or_default();
        self.em.emit(&format!("namespace {name};"));
        self.visit(body, node)?;
        Ok(Flow::Continue)
    }
}
