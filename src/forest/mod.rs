/*
    This module holds the derivations built while filling a chart
*/

mod tree;

use std::ops::Index;

use crate::grammar::Symbol;

pub use tree::Tree;

// Inclusive (start, end) token positions covered by a node
pub type Span = (usize, usize);

// Index of a node in the forest that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One derivation step: a nonterminal label over a span, with either no
/// children (derived from the single token at `span.0`) or exactly two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestNode {
    label: Symbol,
    span: Span,
    children: Option<(NodeId, NodeId)>,
}

impl ForestNode {
    pub fn label(&self) -> &Symbol {
        &self.label
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    pub fn left(&self) -> Option<NodeId> {
        self.children.map(|(left, _)| left)
    }

    pub fn right(&self) -> Option<NodeId> {
        self.children.map(|(_, right)| right)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Append-only arena of forest nodes.
///
/// Nodes never change once pushed, so a child is shared by id between every
/// parent derivation built on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<ForestNode>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(&mut self, label: Symbol, position: usize) -> NodeId {
        self.push(ForestNode {
            label,
            span: (position, position),
            children: None,
        })
    }

    /// # Panics
    ///
    /// If `left` or `right` was not created by this forest.
    pub fn branch(&mut self, label: Symbol, left: NodeId, right: NodeId) -> NodeId {
        let span = (self[left].span.0, self[right].span.1);
        self.push(ForestNode {
            label,
            span,
            children: Some((left, right)),
        })
    }

    fn push(&mut self, node: ForestNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&ForestNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expands a node into the parse tree it stands for.
    ///
    /// `tokens` must be the input the forest was built over. Returns `None`
    /// for an id from another forest or tokens too short for a leaf.
    pub fn tree(&self, id: NodeId, tokens: &[Symbol]) -> Option<Tree> {
        let node = self.get(id)?;
        let tree = match node.children {
            None => Tree::Leaf {
                label: node.label.clone(),
                token: tokens.get(node.span.0)?.clone(),
            },
            Some((left, right)) => Tree::Branch {
                label: node.label.clone(),
                left: Box::new(self.tree(left, tokens)?),
                right: Box::new(self.tree(right, tokens)?),
            },
        };
        Some(tree)
    }
}

// Panics for an id from another forest; `Forest::get` does not
impl Index<NodeId> for Forest {
    type Output = ForestNode;

    fn index(&self, id: NodeId) -> &ForestNode {
        &self.nodes[id.0]
    }
}
