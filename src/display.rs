//! Diagnostic printing: sorted keys and a color-annotated dump.

use core::fmt::{self, Display};

use crate::RbTree;

/// Pre-order dump tagging every key with its color, e.g. `4B 2R 1B 3B`.
///
/// Returned by [`RbTree::colored`]. Meant for debugging and test oracles;
/// the format is not a stability contract.
pub struct ColoredDump<'a, K>(&'a RbTree<K>);

impl<K> RbTree<K> {
    /// Color-annotated pre-order view of the tree
    pub fn colored(&self) -> ColoredDump<'_, K> {
        ColoredDump(self)
    }
}

impl<K: Display> Display for RbTree<K> {
    /// Keys in ascending order separated by single spaces
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl<K: Display> Display for ColoredDump<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.0.preorder().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", node.key(), node.color().tag())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prints_sorted_keys() {
        let mut tree = RbTree::new();
        for key in [5, 3, 8, 1, 4] {
            tree.insert(key);
        }
        assert_eq!(tree.to_string(), "1 3 4 5 8");
        assert_eq!(RbTree::<i32>::new().to_string(), "");
    }

    #[test]
    fn test_colored_dump() {
        let mut tree = RbTree::new();
        for key in 1..=9 {
            tree.insert(key);
        }
        assert_eq!(tree.colored().to_string(), "4B 2R 1B 3B 6R 5B 8B 7R 9R");
    }

    #[test]
    fn test_colored_dump_after_delete() {
        let mut tree = RbTree::new();
        for key in [10, 5, 15, 3] {
            tree.insert(key);
        }
        assert_eq!(tree.colored().to_string(), "10B 5B 3R 15B");

        tree.delete(&5).unwrap();
        assert_eq!(tree.colored().to_string(), "10B 3B 15B");
    }
}
