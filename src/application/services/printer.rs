//! Depth-bounded tree output
//!
//! Depth is passed down as a plain argument, so returning from a child
//! subtree leaves the caller at its own depth for the next sibling.

use std::io::{self, Write};

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{NameStyle, ProcessTree};

/// Preorder printer: one line per node, two spaces per level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreePrinter {
    /// Deepest level printed, root is level 0. `0` prints everything.
    pub max_depth: usize,
    pub style: NameStyle,
}

impl TreePrinter {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            style: NameStyle::default(),
        }
    }

    pub fn with_style(mut self, style: NameStyle) -> Self {
        self.style = style;
        self
    }

    fn in_bounds(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }

    /// Write `pid: name` lines for every node within the depth bound.
    pub fn print<W: Write + ?Sized>(&self, tree: &ProcessTree, out: &mut W) -> io::Result<()> {
        match tree.root() {
            Some(root) => self.print_node(tree, root, 0, out),
            None => Ok(()),
        }
    }

    fn print_node<W: Write + ?Sized>(
        &self,
        tree: &ProcessTree,
        idx: Index,
        depth: usize,
        out: &mut W,
    ) -> io::Result<()> {
        if !self.in_bounds(depth) {
            return Ok(());
        }
        let Some(node) = tree.get_node(idx) else {
            return Ok(());
        };

        write!(out, "{:width$}{}: ", "", node.data.pid, width = depth * 2)?;
        out.write_all(&node.data.name_bytes(self.style))?;
        out.write_all(b"\n")?;

        for &child in &node.children {
            self.print_node(tree, child, depth + 1, out)?;
        }
        Ok(())
    }

    /// Convert the depth-bounded tree for box-drawing output.
    pub fn to_termtree(&self, tree: &ProcessTree) -> Option<Tree<String>> {
        let root = tree.root()?;
        self.termtree_node(tree, root, 0)
    }

    fn termtree_node(&self, tree: &ProcessTree, idx: Index, depth: usize) -> Option<Tree<String>> {
        if !self.in_bounds(depth) {
            return None;
        }
        let node = tree.get_node(idx)?;
        let leaves: Vec<_> = node
            .children
            .iter()
            .filter_map(|&child| self.termtree_node(tree, child, depth + 1))
            .collect();
        Some(Tree::new(node.data.label(self.style)).with_leaves(leaves))
    }
}

/// Print `tree` with default name rendering.
pub fn print_tree<W: Write + ?Sized>(
    tree: &ProcessTree,
    max_depth: usize,
    out: &mut W,
) -> io::Result<()> {
    TreePrinter::new(max_depth).print(tree, out)
}
