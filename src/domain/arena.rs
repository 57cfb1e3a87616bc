use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Pid, ProcessNode};

/// Tree node in the arena-based process hierarchy.
#[derive(Debug)]
pub struct TreeNode {
    /// Process data for this node
    pub data: ProcessNode,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in discovery order
    pub children: Vec<Index>,
}

/// Arena-based process tree.
///
/// Children are kept as an ordered list per node, so appending a newly
/// discovered child is O(1) and order matches discovery order. Dropping the
/// tree frees every node without recursion.
#[derive(Debug)]
pub struct ProcessTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for ProcessTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: ProcessNode, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// First child of `idx`, the head of its children list.
    pub fn first_child(&self, idx: Index) -> Option<Index> {
        self.get_node(idx)?.children.first().copied()
    }

    /// Next child of the same parent, in discovery order.
    pub fn next_sibling(&self, idx: Index) -> Option<Index> {
        let parent = self.get_node(idx)?.parent?;
        let siblings = &self.get_node(parent)?.children;
        let pos = siblings.iter().position(|&s| s == idx)?;
        siblings.get(pos + 1).copied()
    }

    /// Preorder traversal yielding each node with its root-relative depth.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels; an empty tree has depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, _, depth)| depth + 1).max().unwrap_or(0)
    }

    /// All pids in preorder.
    pub fn pids(&self) -> Vec<Pid> {
        self.iter().map(|(_, node, _)| node.data.pid).collect()
    }

    /// Pids of the children of `idx`, in order.
    pub fn child_pids(&self, idx: Index) -> Vec<Pid> {
        self.get_node(idx)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&c| self.get_node(c))
                    .map(|c| c.data.pid)
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ProcessTree,
    stack: Vec<(Index, usize)>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ProcessTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, 0));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, node, depth));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (ProcessTree, Index) {
        // 1
        // ├── 2
        // │   └── 4
        // └── 3
        let mut tree = ProcessTree::new();
        let root = tree.insert_node(ProcessNode::new(1), None);
        let two = tree.insert_node(ProcessNode::new(2), Some(root));
        tree.insert_node(ProcessNode::new(3), Some(root));
        tree.insert_node(ProcessNode::new(4), Some(two));
        (tree, root)
    }

    #[test]
    fn given_empty_tree_then_has_no_root_and_zero_depth() {
        let tree = ProcessTree::new();
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.pids().is_empty());
    }

    #[test]
    fn given_inserted_children_when_iterating_then_preorder_with_depth() {
        let (tree, _) = sample_tree();
        let visited: Vec<(Pid, usize)> = tree
            .iter()
            .map(|(_, node, depth)| (node.data.pid, depth))
            .collect();
        assert_eq!(visited, vec![(1, 0), (2, 1), (4, 2), (3, 1)]);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn given_children_when_walking_child_and_sibling_links_then_follow_insert_order() {
        let (tree, root) = sample_tree();

        let first = tree.first_child(root).unwrap();
        assert_eq!(tree.get_node(first).unwrap().data.pid, 2);

        let second = tree.next_sibling(first).unwrap();
        assert_eq!(tree.get_node(second).unwrap().data.pid, 3);

        assert!(tree.next_sibling(second).is_none());
        assert!(tree.next_sibling(root).is_none());
        assert!(tree.first_child(second).is_none());
        assert_eq!(tree.child_pids(root), vec![2, 3]);
    }
}
