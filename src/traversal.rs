//! Lazy depth-first traversals.
//!
//! Each iterator keeps an explicit stack of pending node ids, bounded by the
//! tree height, and borrows the tree immutably for its whole lifetime.

use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::{NodeId, NodeRef, RbTree};

/// Visits each node before its subtrees (node, left, right)
pub struct Preorder<'a, K> {
    tree: &'a RbTree<K>,
    stack: Vec<NodeId>,
}

/// Visits nodes in ascending key order (left, node, right)
pub struct Inorder<'a, K> {
    tree: &'a RbTree<K>,
    stack: Vec<NodeId>,
    current: NodeId,
}

/// Visits each node after its subtrees (left, right, node)
pub struct Postorder<'a, K> {
    tree: &'a RbTree<K>,
    stack: Vec<NodeId>,
    current: NodeId,
    last_visited: NodeId,
}

/// Keys in ascending order
pub struct Keys<'a, K>(Inorder<'a, K>);

impl<K> RbTree<K> {
    /// Pre-order traversal starting at the root
    pub fn preorder(&self) -> Preorder<'_, K> {
        let mut stack = Vec::new();
        if !self.root_id().is_sentinel() {
            stack.push(self.root_id());
        }
        Preorder { tree: self, stack }
    }

    /// In-order traversal, yielding keys in non-decreasing order
    pub fn inorder(&self) -> Inorder<'_, K> {
        Inorder {
            tree: self,
            stack: Vec::new(),
            current: self.root_id(),
        }
    }

    /// Post-order traversal, the root comes last
    pub fn postorder(&self) -> Postorder<'_, K> {
        Postorder {
            tree: self,
            stack: Vec::new(),
            current: self.root_id(),
            last_visited: NodeId::SENTINEL,
        }
    }

    /// Iterates over the keys in ascending order
    pub fn keys(&self) -> Keys<'_, K> {
        Keys(self.inorder())
    }
}

impl<'a, K> Iterator for Preorder<'a, K> {
    type Item = NodeRef<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        let right = self.tree.get_right(id);
        if !right.is_sentinel() {
            self.stack.push(right);
        }
        let left = self.tree.get_left(id);
        if !left.is_sentinel() {
            self.stack.push(left);
        }

        self.tree.node(id)
    }
}

impl<'a, K> Iterator for Inorder<'a, K> {
    type Item = NodeRef<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.current.is_sentinel() {
            self.stack.push(self.current);
            self.current = self.tree.get_left(self.current);
        }

        let id = self.stack.pop()?;
        self.current = self.tree.get_right(id);
        self.tree.node(id)
    }
}

impl<'a, K> Iterator for Postorder<'a, K> {
    type Item = NodeRef<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.current.is_sentinel() {
                self.stack.push(self.current);
                self.current = self.tree.get_left(self.current);
                continue;
            }

            let top = *self.stack.last()?;
            let right = self.tree.get_right(top);
            if !right.is_sentinel() && right != self.last_visited {
                self.current = right;
            } else {
                self.stack.pop();
                self.last_visited = top;
                return self.tree.node(top);
            }
        }
    }
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|node| node.key())
    }
}

impl<K> FusedIterator for Preorder<'_, K> {}
impl<K> FusedIterator for Inorder<'_, K> {}
impl<K> FusedIterator for Postorder<'_, K> {}
impl<K> FusedIterator for Keys<'_, K> {}

impl<'a, K> IntoIterator for &'a RbTree<K> {
    type Item = NodeRef<'a, K>;
    type IntoIter = Inorder<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.inorder()
    }
}
