use std::fmt::Display;

use crate::grammar::Symbol;

// A single parse, expanded out of the forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Leaf { label: Symbol, token: Symbol },
    Branch { label: Symbol, left: Box<Tree>, right: Box<Tree> },
}

impl Tree {
    pub fn label(&self) -> &Symbol {
        match self {
            Tree::Leaf { label, .. } => label,
            Tree::Branch { label, .. } => label,
        }
    }

    // The tokens under this tree, left to right
    pub fn leaves(&self) -> Vec<&Symbol> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Symbol>) {
        match self {
            Tree::Leaf { token, .. } => leaves.push(token),
            Tree::Branch { left, right, .. } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Tree::Leaf { .. } => 1,
            Tree::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// One node per line, children indented under their parent.
    ///
    /// ```text
    /// NP
    ///   Det "the"
    ///   Nominal "book"
    /// ```
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(0, &mut out);
        out
    }

    fn write_pretty(&self, indent: usize, out: &mut String) {
        out.push_str(&"  ".repeat(indent));
        match self {
            Tree::Leaf { label, token } => {
                out.push_str(&format!("{} \"{}\"\n", label, token));
            }
            Tree::Branch { label, left, right } => {
                out.push_str(&format!("{}\n", label));
                left.write_pretty(indent + 1, out);
                right.write_pretty(indent + 1, out);
            }
        }
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tree::Leaf { label, token } => write!(f, "({} {})", label, token),
            Tree::Branch { label, left, right } => write!(f, "({} {} {})", label, left, right),
        }
    }
}
