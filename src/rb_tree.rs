use alloc::vec::Vec;
use core::cmp::Ordering;

use log::{debug, error, trace};

use crate::{
    error::{RbTreeError, Result},
    node::{Color, Node, NodeId, NodeRef},
};

/// A Red-Black tree storing ordered keys in an index-addressed node arena.
///
/// All absent links point at one shared black sentinel living in arena slot 0,
/// so rotations and fixups never branch on missing children. Parent links are
/// plain indices and own nothing; the arena owns every node.
///
/// Key features:
/// - O(log n) insertion, deletion, lookup and successor queries
/// - Equal keys are kept as separate nodes, later inserts going right
/// - Vacated slots are reused through an internal free list
/// - Lazy pre-, in- and post-order traversals without recursion
#[derive(Debug, Clone)]
pub struct RbTree<K> {
    /// Node arena, slot 0 holds the sentinel
    nodes: Vec<Node<K>>,

    /// Vacated slots available for reuse (LIFO)
    free_list: Vec<NodeId>,

    /// Number of keys currently stored
    len: usize,

    /// Root node, the sentinel when the tree is empty
    root: NodeId,
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RbTree<K> {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tree with room for `capacity` nodes before the arena grows
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node::sentinel());

        Self {
            nodes,
            free_list: Vec::new(),
            len: 0,
            root: NodeId::SENTINEL,
        }
    }

    /// Number of keys in the tree, duplicates included
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes the tree can hold without reallocating its arena
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity() - 1
    }

    /// Removes every key, keeping the allocated arena
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[NodeId::SENTINEL.0] = Node::sentinel();
        self.free_list.clear();
        self.len = 0;
        self.root = NodeId::SENTINEL;
    }

    /// Root node, `None` when the tree is empty
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.node(self.root)
    }

    /// Resolves an arena handle to a live node.
    ///
    /// Returns `None` for the sentinel, for vacated slots and for ids out of range.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, K>> {
        let key = self.nodes.get(id.0)?.key.as_ref()?;
        Some(NodeRef::new(self, id, key))
    }

    /// Returns the node holding the smallest key
    ///
    /// # Errors
    ///
    /// [`RbTreeError::EmptyTree`] if the tree has no nodes
    pub fn find_min(&self) -> Result<NodeRef<'_, K>> {
        if self.root.is_sentinel() {
            return Err(RbTreeError::EmptyTree);
        }
        self.node(self.find_minimum(self.root))
            .ok_or(RbTreeError::EmptyTree)
    }

    /// Returns the node holding the largest key
    ///
    /// # Errors
    ///
    /// [`RbTreeError::EmptyTree`] if the tree has no nodes
    pub fn find_max(&self) -> Result<NodeRef<'_, K>> {
        if self.root.is_sentinel() {
            return Err(RbTreeError::EmptyTree);
        }
        self.node(self.find_maximum(self.root))
            .ok_or(RbTreeError::EmptyTree)
    }

    #[inline]
    fn node_at(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_at_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub(crate) fn get_parent(&self, node: NodeId) -> NodeId {
        self.node_at(node).parent
    }

    #[inline]
    pub(crate) fn get_left(&self, node: NodeId) -> NodeId {
        self.node_at(node).left
    }

    #[inline]
    pub(crate) fn get_right(&self, node: NodeId) -> NodeId {
        self.node_at(node).right
    }

    #[inline]
    pub(crate) fn get_color(&self, node: NodeId) -> Color {
        self.node_at(node).color
    }

    /// Recolors a real node; the sentinel stays black
    #[inline]
    fn set_color(&mut self, node: NodeId, color: Color) {
        if !node.is_sentinel() {
            self.node_at_mut(node).color = color;
        }
    }

    #[inline]
    fn is_red(&self, node: NodeId) -> bool {
        self.get_color(node) == Color::Red
    }

    #[inline]
    fn is_black(&self, node: NodeId) -> bool {
        self.get_color(node) == Color::Black
    }

    fn find_minimum(&self, mut node: NodeId) -> NodeId {
        while !self.get_left(node).is_sentinel() {
            node = self.get_left(node);
        }
        node
    }

    fn find_maximum(&self, mut node: NodeId) -> NodeId {
        while !self.get_right(node).is_sentinel() {
            node = self.get_right(node);
        }
        node
    }

    /// Next node in key order, the sentinel if `node` holds the maximum
    fn successor_of(&self, mut node: NodeId) -> NodeId {
        let right = self.get_right(node);
        if !right.is_sentinel() {
            return self.find_minimum(right);
        }

        let mut parent = self.get_parent(node);
        while !parent.is_sentinel() && node != self.get_left(parent) {
            node = parent;
            parent = self.get_parent(parent);
        }
        parent
    }

    fn allocate_node(&mut self, key: K, parent: NodeId) -> NodeId {
        let node = Node::leaf(key, parent);
        match self.free_list.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Clears a spliced-out slot, severs its links and makes it reusable
    fn release_node(&mut self, id: NodeId) -> Option<K> {
        let node = core::mem::replace(self.node_at_mut(id), Node::sentinel());
        self.free_list.push(id);
        node.key
    }

    /// Pivots `x` down to the left, its right child taking its place.
    ///
    /// # Errors
    ///
    /// [`RbTreeError::InvalidRotation`] if `x` or its right child is the sentinel
    pub(crate) fn rotate_left(&mut self, x: NodeId) -> Result<()> {
        let y = self.get_right(x);
        if x.is_sentinel() || y.is_sentinel() {
            return Err(RbTreeError::InvalidRotation);
        }
        trace!("rotate left at {x:?}, pivot {y:?}");

        let y_left = self.get_left(y);
        self.node_at_mut(x).right = y_left;
        if !y_left.is_sentinel() {
            self.node_at_mut(y_left).parent = x;
        }

        let x_parent = self.get_parent(x);
        self.node_at_mut(y).parent = x_parent;

        if x_parent.is_sentinel() {
            self.root = y;
        } else if x == self.get_left(x_parent) {
            self.node_at_mut(x_parent).left = y;
        } else {
            self.node_at_mut(x_parent).right = y;
        }

        self.node_at_mut(y).left = x;
        self.node_at_mut(x).parent = y;
        Ok(())
    }

    /// Pivots `y` down to the right, its left child taking its place.
    ///
    /// # Errors
    ///
    /// [`RbTreeError::InvalidRotation`] if `y` or its left child is the sentinel
    pub(crate) fn rotate_right(&mut self, y: NodeId) -> Result<()> {
        let x = self.get_left(y);
        if y.is_sentinel() || x.is_sentinel() {
            return Err(RbTreeError::InvalidRotation);
        }
        trace!("rotate right at {y:?}, pivot {x:?}");

        let x_right = self.get_right(x);
        self.node_at_mut(y).left = x_right;
        if !x_right.is_sentinel() {
            self.node_at_mut(x_right).parent = y;
        }

        let y_parent = self.get_parent(y);
        self.node_at_mut(x).parent = y_parent;

        if y_parent.is_sentinel() {
            self.root = x;
        } else if y == self.get_left(y_parent) {
            self.node_at_mut(y_parent).left = x;
        } else {
            self.node_at_mut(y_parent).right = x;
        }

        self.node_at_mut(x).right = y;
        self.node_at_mut(y).parent = x;
        Ok(())
    }

    fn fix_insertion_violations(&mut self, mut node: NodeId) -> Result<()> {
        while self.is_red(self.get_parent(node)) {
            let parent = self.get_parent(node);
            let grandparent = self.get_parent(parent);

            if parent == self.get_left(grandparent) {
                let uncle = self.get_right(grandparent);

                if self.is_red(uncle) {
                    trace!("insert fixup: red uncle {uncle:?}, recolor");
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.get_right(parent) {
                        trace!("insert fixup: inner child {node:?}, straighten");
                        node = parent;
                        self.rotate_left(node)?;
                    }
                    let parent = self.get_parent(node);
                    let grandparent = self.get_parent(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent)?;
                }
            } else {
                let uncle = self.get_left(grandparent);

                if self.is_red(uncle) {
                    trace!("insert fixup: red uncle {uncle:?}, recolor");
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.get_left(parent) {
                        trace!("insert fixup: inner child {node:?}, straighten");
                        node = parent;
                        self.rotate_right(node)?;
                    }
                    let parent = self.get_parent(node);
                    let grandparent = self.get_parent(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent)?;
                }
            }
        }
        self.set_color(self.root, Color::Black);
        Ok(())
    }

    /// Puts `new_node` where `old_node` hangs from its parent.
    ///
    /// The parent link of `new_node` is written even for the sentinel; delete
    /// fixup climbs from there.
    fn transplant(&mut self, old_node: NodeId, new_node: NodeId) {
        let parent = self.get_parent(old_node);

        if parent.is_sentinel() {
            self.root = new_node;
        } else if old_node == self.get_left(parent) {
            self.node_at_mut(parent).left = new_node;
        } else {
            self.node_at_mut(parent).right = new_node;
        }

        self.node_at_mut(new_node).parent = parent;
    }

    /// Splices `node` out of the hierarchy and rebalances.
    ///
    /// Returns the key it held; the slot is released afterwards.
    fn delete_node(&mut self, node: NodeId) -> Option<K> {
        let left = self.get_left(node);
        let right = self.get_right(node);
        let mut removed_color = self.get_color(node);

        let fixup_node = if left.is_sentinel() {
            self.transplant(node, right);
            right
        } else if right.is_sentinel() {
            self.transplant(node, left);
            left
        } else {
            let successor = self.find_minimum(right);
            removed_color = self.get_color(successor);
            let fixup_node = self.get_right(successor);

            if self.get_parent(successor) == node {
                self.node_at_mut(fixup_node).parent = successor;
            } else {
                self.transplant(successor, fixup_node);
                self.node_at_mut(successor).right = right;
                self.node_at_mut(right).parent = successor;
            }

            self.transplant(node, successor);
            self.node_at_mut(successor).left = left;
            self.node_at_mut(left).parent = successor;
            let color = self.get_color(node);
            self.set_color(successor, color);
            fixup_node
        };

        if removed_color == Color::Black {
            let fixed = self.fix_deletion_violations(fixup_node);
            if let Err(err) = fixed {
                error!("delete fixup aborted at {fixup_node:?}: {err}");
            }
            debug_assert!(fixed.is_ok(), "delete fixup failed");
        }

        self.nodes[NodeId::SENTINEL.0] = Node::sentinel();
        self.release_node(node)
    }

    fn fix_deletion_violations(&mut self, mut node: NodeId) -> Result<()> {
        while node != self.root && self.is_black(node) {
            let parent = self.get_parent(node);

            if node == self.get_left(parent) {
                let mut sibling = self.get_right(parent);

                if self.is_red(sibling) {
                    trace!("delete fixup: red sibling {sibling:?}");
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent)?;
                    sibling = self.get_right(self.get_parent(node));
                }

                if self.is_black(self.get_left(sibling)) && self.is_black(self.get_right(sibling)) {
                    trace!("delete fixup: black nephews, push up from {node:?}");
                    self.set_color(sibling, Color::Red);
                    node = self.get_parent(node);
                } else {
                    if self.is_black(self.get_right(sibling)) {
                        trace!("delete fixup: near red nephew, rotate {sibling:?}");
                        self.set_color(self.get_left(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling)?;
                        sibling = self.get_right(self.get_parent(node));
                    }

                    let parent = self.get_parent(node);
                    self.set_color(sibling, self.get_color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.get_right(sibling), Color::Black);
                    self.rotate_left(parent)?;
                    node = self.root;
                }
            } else {
                let mut sibling = self.get_left(parent);

                if self.is_red(sibling) {
                    trace!("delete fixup: red sibling {sibling:?}");
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent)?;
                    sibling = self.get_left(self.get_parent(node));
                }

                if self.is_black(self.get_right(sibling)) && self.is_black(self.get_left(sibling)) {
                    trace!("delete fixup: black nephews, push up from {node:?}");
                    self.set_color(sibling, Color::Red);
                    node = self.get_parent(node);
                } else {
                    if self.is_black(self.get_left(sibling)) {
                        trace!("delete fixup: near red nephew, rotate {sibling:?}");
                        self.set_color(self.get_right(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling)?;
                        sibling = self.get_left(self.get_parent(node));
                    }

                    let parent = self.get_parent(node);
                    self.set_color(sibling, self.get_color(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.get_left(sibling), Color::Black);
                    self.rotate_right(parent)?;
                    node = self.root;
                }
            }
        }

        self.set_color(node, Color::Black);
        Ok(())
    }
}

impl<K: Ord> RbTree<K> {
    /// Inserts `key` and rebalances, returning the handle of the new node.
    ///
    /// Equal keys are not merged: each insert adds a node, placed to the right
    /// of the keys it ties with.
    pub fn insert(&mut self, key: K) -> NodeId {
        let node = self.bst_insert(key);
        self.len += 1;
        debug!("inserted node {node:?}, len {}", self.len);

        let fixed = self.fix_insertion_violations(node);
        if let Err(err) = fixed {
            error!("insert fixup aborted at {node:?}: {err}");
        }
        debug_assert!(fixed.is_ok(), "insert fixup failed");

        #[cfg(debug_assertions)]
        debug_assert!(
            self.verify_rb_invariants(),
            "RB tree invariants violated after insertion"
        );

        node
    }

    /// Plain binary-search-tree placement: attaches `key` as a red leaf
    /// without rebalancing.
    pub(crate) fn bst_insert(&mut self, key: K) -> NodeId {
        let parent = self.find_insertion_parent(&key);
        let goes_left = self.goes_left(&key, parent);
        let node = self.allocate_node(key, parent);

        if parent.is_sentinel() {
            self.root = node;
        } else if goes_left {
            self.node_at_mut(parent).left = node;
        } else {
            self.node_at_mut(parent).right = node;
        }
        node
    }

    /// Removes one node holding `key` and returns its key.
    ///
    /// # Errors
    ///
    /// [`RbTreeError::NotFound`] if no node holds `key`; the tree is unchanged
    pub fn delete(&mut self, key: &K) -> Result<K> {
        let node = self.find_node(key);
        if node.is_sentinel() {
            return Err(RbTreeError::NotFound);
        }

        let removed = self.delete_node(node).ok_or(RbTreeError::NotFound)?;
        self.len -= 1;
        debug!("deleted node {node:?}, len {}", self.len);

        #[cfg(debug_assertions)]
        debug_assert!(
            self.verify_rb_invariants(),
            "RB tree invariants violated after removal"
        );

        Ok(removed)
    }

    /// Returns the node holding `key`
    ///
    /// # Errors
    ///
    /// [`RbTreeError::NotFound`] if the tree is empty or no node holds `key`
    pub fn find(&self, key: &K) -> Result<NodeRef<'_, K>> {
        self.node(self.find_node(key)).ok_or(RbTreeError::NotFound)
    }

    /// Returns `true` if some node holds `key`
    pub fn contains(&self, key: &K) -> bool {
        !self.find_node(key).is_sentinel()
    }

    /// Returns the node following `key` in sorted order, `None` if `key` is the maximum
    ///
    /// # Errors
    ///
    /// [`RbTreeError::NotFound`] if no node holds `key`
    pub fn successor(&self, key: &K) -> Result<Option<NodeRef<'_, K>>> {
        let node = self.find_node(key);
        if node.is_sentinel() {
            return Err(RbTreeError::NotFound);
        }
        Ok(self.node(self.successor_of(node)))
    }

    /// Returns `true` if `key` belongs in the left subtree of `node`
    fn goes_left(&self, key: &K, node: NodeId) -> bool {
        self.node_at(node)
            .key
            .as_ref()
            .is_some_and(|current| key < current)
    }

    fn find_node(&self, key: &K) -> NodeId {
        let mut current = self.root;

        while !current.is_sentinel() {
            let node = self.node_at(current);
            let Some(current_key) = node.key.as_ref() else {
                break;
            };
            match key.cmp(current_key) {
                Ordering::Equal => return current,
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        NodeId::SENTINEL
    }

    fn find_insertion_parent(&self, key: &K) -> NodeId {
        let mut current = self.root;
        let mut parent = NodeId::SENTINEL;

        while !current.is_sentinel() {
            parent = current;
            current = if self.goes_left(key, current) {
                self.get_left(current)
            } else {
                self.get_right(current)
            };
        }
        parent
    }

    #[cfg(any(test, debug_assertions))]
    pub(crate) fn verify_rb_invariants(&self) -> bool {
        let sentinel = self.node_at(NodeId::SENTINEL);
        if sentinel.key.is_some() || sentinel.color != Color::Black {
            return false;
        }

        if self.root.is_sentinel() {
            return self.len == 0;
        }

        if !self.is_black(self.root) || !self.get_parent(self.root).is_sentinel() {
            return false;
        }

        if self.verify_black_height(self.root).is_none() {
            return false;
        }

        let mut count = 0;
        let mut previous: Option<&K> = None;
        for node in self.inorder() {
            if previous.is_some_and(|prev| prev > node.key()) {
                return false;
            }
            previous = Some(node.key());
            count += 1;
        }
        count == self.len
    }

    /// Black height of the subtree at `node` (sentinel counted), `None` if
    /// colors or parent links are inconsistent anywhere below
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn verify_black_height(&self, node: NodeId) -> Option<usize> {
        if node.is_sentinel() {
            return Some(1);
        }

        let node_ref = self.node_at(node);
        node_ref.key.as_ref()?;

        if self.is_red(node) && (!self.is_black(node_ref.left) || !self.is_black(node_ref.right)) {
            return None;
        }

        for child in [node_ref.left, node_ref.right] {
            if !child.is_sentinel() && self.get_parent(child) != node {
                return None;
            }
        }

        let left_height = self.verify_black_height(node_ref.left)?;
        let right_height = self.verify_black_height(node_ref.right)?;

        if left_height != right_height {
            return None;
        }

        if self.is_black(node) {
            Some(left_height + 1)
        } else {
            Some(left_height)
        }
    }
}
