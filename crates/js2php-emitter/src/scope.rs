//! Lexical scope tracking.
//!
//! Scopes form an arena with a current-scope stack; a scope stays
//! inspectable after `exit`, which is how constructor field promotion reads
//! a method scope's `this.<name>` declarations after its body was emitted.

use indexmap::{IndexMap, IndexSet};
use js2php_ast::{Ast, MethodKind, NodeId, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Function,
    Class,
    Catch,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Name to defining node, in declaration order.
    pub declarations: IndexMap<String, NodeId>,
    /// Free names resolved through this scope to an ancestor; these become
    /// the closure's capture clause (or `global` bindings at top level).
    pub using: IndexSet<String>,
    pub getters: Vec<NodeId>,
    pub setters: Vec<NodeId>,
}

pub struct ScopeTree {
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
}

impl ScopeTree {
    pub fn new() -> Self {
        let root = Scope {
            kind: ScopeKind::Root,
            parent: None,
            declarations: IndexMap::new(),
            using: IndexSet::new(),
            getters: Vec::new(),
            setters: Vec::new(),
        };
        ScopeTree { scopes: vec![root], stack: vec![ScopeId(0)] }
    }

    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId(0))
    }

    pub fn enter(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent: Some(self.current()),
            declarations: IndexMap::new(),
            using: IndexSet::new(),
            getters: Vec::new(),
            setters: Vec::new(),
        });
        self.stack.push(id);
        id
    }

    pub fn exit(&mut self) {
        // The root scope never leaves the stack.
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let id = self.current();
        &mut self.scopes[id.index()]
    }

    pub fn declare(&mut self, name: &str, node: NodeId) {
        self.current_mut().declarations.insert(name.to_string(), node);
    }

    /// Looks the name up from the current scope outwards. A hit in an
    /// ancestor records the name in the current scope's `using` set; that
    /// side effect is the entire capture analysis.
    pub fn resolve(&mut self, name: &str) -> Option<NodeId> {
        let current = self.current();
        if let Some(&node) = self.scopes[current.index()].declarations.get(name) {
            return Some(node);
        }
        let mut up = self.scopes[current.index()].parent;
        while let Some(scope) = up {
            if let Some(&node) = self.scopes[scope.index()].declarations.get(name) {
                self.scopes[current.index()].using.insert(name.to_string());
                return Some(node);
            }
            up = self.scopes[scope.index()].parent;
        }
        None
    }

    /// Records what a node declares in the current scope. Nodes that do not
    /// declare anything are ignored.
    pub fn register(&mut self, ast: &Ast, node: NodeId) {
        match ast.kind(node) {
            NodeKind::VariableDeclarator { id, .. } => {
                if let Some(name) = ast.name_of(*id) {
                    let name = name.to_string();
                    self.declare(&name, node);
                }
            }
            NodeKind::Identifier { name } => {
                let name = name.clone();
                self.declare(&name, node);
            }
            NodeKind::MethodDefinition { key, kind, .. } => match kind {
                MethodKind::Get => self.current_mut().getters.push(node),
                MethodKind::Set => self.current_mut().setters.push(node),
                _ => {
                    if let Some(name) = ast.name_of(*key) {
                        let name = name.to_string();
                        self.declare(&name, node);
                    }
                }
            },
            NodeKind::MemberExpression { object, property, .. } => {
                if matches!(ast.kind(*object), NodeKind::ThisExpression) {
                    if let Some(name) = ast.name_of(*property) {
                        let name = name.to_string();
                        if !self.current_mut().declarations.contains_key(&name) {
                            self.declare(&name, node);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Registration for the left side of an assignment: a fresh identifier
    /// becomes a declaration in the current scope, while a name already
    /// visible stays bound where it was (resolving it here is what marks
    /// the capture). `this.<name>` targets always register, for field
    /// promotion.
    pub fn register_assignment_target(&mut self, ast: &Ast, node: NodeId) {
        match ast.kind(node) {
            NodeKind::Identifier { name } => {
                let name = name.clone();
                if self.resolve(&name).is_none() {
                    self.declare(&name, node);
                }
            }
            _ => self.register(ast, node),
        }
    }

    pub fn using_names(&self, id: ScopeId) -> Vec<String> {
        self.scopes[id.index()].using.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_ast() -> Ast {
        Ast {
            nodes: Vec::new(),
            comments: Vec::new(),
            tokens: Vec::new(),
            source: String::new(),
            root: NodeId::NONE,
        }
    }

    #[test]
    fn resolve_in_current_scope_records_no_capture() {
        let mut scopes = ScopeTree::new();
        scopes.declare("a", NodeId(0));
        assert_eq!(scopes.resolve("a"), Some(NodeId(0)));
        assert!(scopes.using_names(scopes.current()).is_empty());
    }

    #[test]
    fn ancestor_hit_marks_the_referencing_scope() {
        let mut scopes = ScopeTree::new();
        scopes.declare("a", NodeId(0));
        let inner = scopes.enter(ScopeKind::Function);
        assert_eq!(scopes.resolve("a"), Some(NodeId(0)));
        assert_eq!(scopes.using_names(inner), vec!["a".to_string()]);
    }

    #[test]
    fn capture_is_recorded_in_the_innermost_scope_only() {
        let mut scopes = ScopeTree::new();
        scopes.declare("a", NodeId(0));
        let outer = scopes.enter(ScopeKind::Function);
        let inner = scopes.enter(ScopeKind::Function);
        scopes.resolve("a");
        assert_eq!(scopes.using_names(inner), vec!["a".to_string()]);
        assert!(scopes.using_names(outer).is_empty());
    }

    #[test]
    fn scopes_stay_inspectable_after_exit() {
        let mut scopes = ScopeTree::new();
        let inner = scopes.enter(ScopeKind::Function);
        scopes.declare("x", NodeId(7));
        scopes.exit();
        assert_eq!(scopes.scope(inner).declarations.get("x"), Some(&NodeId(7)));
    }

    #[test]
    fn assignment_to_visible_name_does_not_shadow() {
        let ast = {
            let mut ast = empty_ast();
            ast.synth_ident("total");
            ast
        };
        let mut scopes = ScopeTree::new();
        scopes.declare("total", NodeId(99));
        let inner = scopes.enter(ScopeKind::Function);
        scopes.register_assignment_target(&ast, NodeId(0));
        assert!(scopes.scope(inner).declarations.is_empty());
        assert_eq!(scopes.using_names(inner), vec!["total".to_string()]);
    }

    #[test]
    fn assignment_to_fresh_name_declares_locally() {
        let ast = {
            let mut ast = empty_ast();
            ast.synth_ident("fresh");
            ast
        };
        let mut scopes = ScopeTree::new();
        scopes.enter(ScopeKind::Function);
        scopes.register_assignment_target(&ast, NodeId(0));
        assert_eq!(scopes.resolve("fresh"), Some(NodeId(0)));
    }
}
