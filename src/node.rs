use core::fmt::{self, Debug};

use crate::RbTree;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from root to leaves have equal black node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red node - must have black children, cannot be adjacent to other red nodes
    Red,
    /// Black node - can have children of any color, contributes to black height
    Black,
}

impl Color {
    /// Single-letter tag used by the colored dump (`R` or `B`)
    pub const fn tag(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Black => 'B',
        }
    }
}

/// Handle naming a slot in the tree's node arena.
///
/// Ids are only meaningful for the tree that produced them. Once the key stored
/// under an id is deleted, the slot may be handed to a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The shared black sentinel terminating every path
    pub const SENTINEL: NodeId = NodeId(0);

    /// Position of the node in the arena
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns `true` for the sentinel handle
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::SENTINEL.0
    }
}

/// A node in the Red-Black tree containing its key and structural links.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// Stored key, `None` for the sentinel and for vacated slots
    pub(crate) key: Option<K>,

    /// Color of this node used for Red-Black tree balancing
    pub(crate) color: Color,

    /// Index of parent node (sentinel if this is root)
    pub(crate) parent: NodeId,

    /// Index of left child node (sentinel if no left child)
    pub(crate) left: NodeId,

    /// Index of right child node (sentinel if no right child)
    pub(crate) right: NodeId,
}

impl<K> Node<K> {
    pub(crate) const fn sentinel() -> Self {
        Self {
            key: None,
            color: Color::Black,
            parent: NodeId::SENTINEL,
            left: NodeId::SENTINEL,
            right: NodeId::SENTINEL,
        }
    }

    pub(crate) const fn leaf(key: K, parent: NodeId) -> Self {
        Self {
            key: Some(key),
            color: Color::Red,
            parent,
            left: NodeId::SENTINEL,
            right: NodeId::SENTINEL,
        }
    }
}

/// Read-only view of a live node, borrowed from its tree.
///
/// Navigation methods return `None` where the tree links to the sentinel.
pub struct NodeRef<'a, K> {
    tree: &'a RbTree<K>,
    id: NodeId,
    key: &'a K,
}

impl<'a, K> NodeRef<'a, K> {
    pub(crate) const fn new(tree: &'a RbTree<K>, id: NodeId, key: &'a K) -> Self {
        Self { tree, id, key }
    }

    /// Arena handle of this node; stable for as long as the key stays in the tree
    #[inline]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The key stored in this node
    #[inline]
    pub const fn key(&self) -> &'a K {
        self.key
    }

    /// Current color of this node
    pub fn color(&self) -> Color {
        self.tree.get_color(self.id)
    }

    /// Returns `true` if the node is red
    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    /// Returns `true` if the node is black
    pub fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    /// Parent node, `None` at the root
    pub fn parent(&self) -> Option<NodeRef<'a, K>> {
        self.tree.node(self.tree.get_parent(self.id))
    }

    /// Left child, `None` when it is the sentinel
    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.tree.node(self.tree.get_left(self.id))
    }

    /// Right child, `None` when it is the sentinel
    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.tree.node(self.tree.get_right(self.id))
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K> PartialEq for NodeRef<'_, K> {
    /// Two refs are equal when they name the same node of the same tree
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<K> Eq for NodeRef<'_, K> {}

impl<K: Debug> Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", self.key)
            .field("color", &self.color())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_tags() {
        assert_eq!(Color::Red.tag(), 'R');
        assert_eq!(Color::Black.tag(), 'B');
    }

    #[test]
    fn test_sentinel_node_shape() {
        let node = Node::<i32>::sentinel();
        assert!(node.key.is_none());
        assert_eq!(node.color, Color::Black);
        assert!(node.parent.is_sentinel());
        assert!(node.left.is_sentinel());
        assert!(node.right.is_sentinel());
    }

    #[test]
    fn test_leaf_starts_red_with_sentinel_children() {
        let node = Node::leaf(7, NodeId(3));
        assert_eq!(node.key, Some(7));
        assert_eq!(node.color, Color::Red);
        assert_eq!(node.parent, NodeId(3));
        assert!(node.left.is_sentinel());
        assert!(node.right.is_sentinel());
    }

    #[test]
    fn test_node_ref_navigation() {
        let mut tree = RbTree::new();
        for key in [2, 1, 3] {
            tree.insert(key);
        }

        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 2);
        assert!(root.is_black());
        assert!(root.parent().is_none());

        let left = root.left().unwrap();
        let right = root.right().unwrap();
        assert_eq!(*left.key(), 1);
        assert_eq!(*right.key(), 3);
        assert!(left.is_red());
        assert!(right.is_red());
        assert_eq!(left.parent(), Some(root));
        assert!(left.left().is_none());
        assert!(left.right().is_none());
    }

    #[test]
    fn test_node_ref_equality_is_identity() {
        let mut tree = RbTree::new();
        tree.insert(5);
        tree.insert(5);

        let first = tree.find_min().unwrap();
        let again = tree.find_min().unwrap();
        assert_eq!(first, again);

        let dup = first.right().unwrap();
        assert_eq!(*dup.key(), 5);
        assert_ne!(first, dup);
    }
}
