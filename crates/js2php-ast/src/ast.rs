use crate::comment::Comment;
use crate::node::{LiteralValue, Node, NodeFlags, NodeId, NodeKind};
use crate::position::{Range, Span};
use crate::token::Token;

/// The ingested document: node arena, raw token stream, interned comments
/// and the original source text.
///
/// Nodes are only ever appended, so ids handed out stay valid; builtin
/// rewrites allocate replacement subtrees at the end of the arena.
#[derive(Debug)]
pub struct Ast {
    pub nodes: Vec<Node>,
    pub comments: Vec<Comment>,
    pub tokens: Vec<Token>,
    pub source: String,
    pub root: NodeId,
}

impl Ast {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.nodes[id.index()].flags
    }

    pub fn set_flag(&mut self, id: NodeId, flag: NodeFlags) {
        self.nodes[id.index()].flags |= flag;
    }

    pub fn clear_flag(&mut self, id: NodeId, flag: NodeFlags) {
        self.nodes[id.index()].flags &= !flag;
    }

    pub fn has_flag(&self, id: NodeId, flag: NodeFlags) -> bool {
        self.nodes[id.index()].flags.contains(flag)
    }

    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.nodes[id.index()].parent = parent;
    }

    pub fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].parent
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span, loc: Range) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, span, loc));
        id
    }

    // === Synthesized nodes ===
    //
    // Builtin rewrites and dispatcher sugar build replacement subtrees out
    // of these. Synthetic nodes carry `Range::SYNTHETIC`, so line sync and
    // parenthesis lookup are inert for them.

    pub fn synth(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(kind, Span::default(), Range::SYNTHETIC)
    }

    pub fn synth_ident(&mut self, name: &str) -> NodeId {
        self.synth(NodeKind::Identifier { name: name.to_string() })
    }

    pub fn synth_string(&mut self, value: &str) -> NodeId {
        self.synth(NodeKind::Literal {
            raw: format!("'{value}'"),
            value: LiteralValue::String(value.to_string()),
        })
    }

    pub fn synth_call(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.synth(NodeKind::CallExpression { callee, arguments })
    }

    pub fn synth_call_named(&mut self, name: &str, arguments: Vec<NodeId>) -> NodeId {
        let callee = self.synth_ident(name);
        self.synth_call(callee, arguments)
    }

    pub fn synth_array(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.synth(NodeKind::ArrayExpression { elements })
    }

    pub fn synth_member(&mut self, object: NodeId, property: NodeId, computed: bool) -> NodeId {
        self.synth(NodeKind::MemberExpression { object, property, computed })
    }

    /// Shallow-clones a `new`-expression as a plain call so the dispatcher
    /// can emit `new ` followed by ordinary call syntax. Location and
    /// comment attachments are shared with the original node.
    pub fn reshape_as_call(&mut self, id: NodeId) -> NodeId {
        let src = self.node(id);
        let kind = match &src.kind {
            NodeKind::NewExpression { callee, arguments } => NodeKind::CallExpression {
                callee: *callee,
                arguments: arguments.clone(),
            },
            other => other.clone(),
        };
        let mut node = Node::new(kind, src.span, src.loc);
        node.flags = src.flags;
        node.leading_comments = src.leading_comments.clone();
        node.trailing_comments = src.trailing_comments.clone();
        let new_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        new_id
    }

    // === Inspection helpers ===

    /// Identifier name, string-literal value or template text of a node,
    /// if it carries one.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        if id.is_none() {
            return None;
        }
        match self.kind(id) {
            NodeKind::Identifier { name } => Some(name),
            NodeKind::Literal { value: LiteralValue::String(s), .. } => Some(s),
            _ => None,
        }
    }

    pub fn is_string_literal(&self, id: NodeId) -> bool {
        if id.is_none() {
            return false;
        }
        matches!(
            self.kind(id),
            NodeKind::Literal { value: LiteralValue::String(_), .. }
        )
    }

    /// True for a `Literal` whose raw text is exactly `"use strict"` or
    /// `'use strict'`.
    pub fn is_use_strict_literal(&self, id: NodeId) -> bool {
        if id.is_none() {
            return false;
        }
        match self.kind(id) {
            NodeKind::Literal { raw, .. } => raw == "\"use strict\"" || raw == "'use strict'",
            _ => false,
        }
    }
}
