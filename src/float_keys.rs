use num_traits::float::FloatCore;
use ordered_float::OrderedFloat;

use crate::{NodeId, RbTree, error::Result};

/// A Red-Black tree keyed by floating point values.
///
/// Keys are wrapped in [`OrderedFloat`] for a total order: `-0.0 == 0.0`
/// and NaN sorts above every number, including infinity.
pub type FloatRbTree<T> = RbTree<OrderedFloat<T>>;

impl<T: FloatCore> RbTree<OrderedFloat<T>> {
    /// Inserts a raw float value
    pub fn insert_value(&mut self, value: T) -> NodeId {
        self.insert(OrderedFloat(value))
    }

    /// Removes one node holding `value`
    ///
    /// # Errors
    ///
    /// [`RbTreeError::NotFound`](crate::RbTreeError::NotFound) if `value` is absent
    pub fn delete_value(&mut self, value: T) -> Result<T> {
        self.delete(&OrderedFloat(value)).map(OrderedFloat::into_inner)
    }

    /// Returns `true` if some node holds `value`
    pub fn contains_value(&self, value: T) -> bool {
        self.contains(&OrderedFloat(value))
    }

    /// Smallest value, `None` if the tree is empty
    pub fn min_value(&self) -> Option<T> {
        self.find_min().ok().map(|node| node.key().into_inner())
    }

    /// Largest value, `None` if the tree is empty
    pub fn max_value(&self) -> Option<T> {
        self.find_max().ok().map(|node| node.key().into_inner())
    }

    /// Value following `value` in sorted order, `None` if `value` is the maximum
    ///
    /// # Errors
    ///
    /// [`RbTreeError::NotFound`](crate::RbTreeError::NotFound) if `value` is absent
    pub fn successor_value(&self, value: T) -> Result<Option<T>> {
        Ok(self
            .successor(&OrderedFloat(value))?
            .map(|node| node.key().into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RbTreeError;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_float_tree_basic() {
        let mut tree = FloatRbTree::<f64>::new();
        for value in [5.0, 3.0, 7.0, 1.0, 9.0] {
            tree.insert_value(value);
        }

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.min_value(), Some(1.0));
        assert_eq!(tree.max_value(), Some(9.0));

        assert_eq!(tree.delete_value(3.0), Ok(3.0));
        assert_eq!(tree.delete_value(100.0), Err(RbTreeError::NotFound));
        assert!(!tree.contains_value(3.0));
        assert_eq!(tree.successor_value(1.0), Ok(Some(5.0)));
        assert_eq!(tree.successor_value(9.0), Ok(None));
    }

    #[test]
    fn test_float_tree_empty() {
        let tree = FloatRbTree::<f32>::new();
        assert!(tree.min_value().is_none());
        assert!(tree.max_value().is_none());
        assert_eq!(tree.successor_value(1.0), Err(RbTreeError::NotFound));
    }

    #[test]
    fn test_rbtree_floating_point_precision() {
        let mut tree = FloatRbTree::<f64>::new();

        let val1 = 0.1 + 0.2;
        let val2 = 0.3;
        tree.insert_value(val1);
        tree.insert_value(val2);

        assert_eq!(tree.len(), 2);
        assert_approx_eq!(tree.min_value().unwrap(), 0.3);
        assert_approx_eq!(tree.max_value().unwrap(), 0.3);

        assert_eq!(tree.delete_value(val1), Ok(val1));
        assert_eq!(tree.len(), 1);
        assert!(tree.contains_value(val2));
    }

    #[test]
    fn test_rbtree_infinity_values() {
        let mut tree = FloatRbTree::<f64>::new();
        for value in [1.0, f64::INFINITY, f64::NEG_INFINITY, 2.0] {
            tree.insert_value(value);
        }

        assert_eq!(tree.min_value(), Some(f64::NEG_INFINITY));
        assert_eq!(tree.max_value(), Some(f64::INFINITY));
        assert_eq!(tree.successor_value(2.0), Ok(Some(f64::INFINITY)));
    }

    #[test]
    fn test_nan_sorts_last() {
        let mut tree = FloatRbTree::<f64>::new();
        tree.insert_value(1.0);
        tree.insert_value(f64::NAN);
        tree.insert_value(f64::INFINITY);

        assert_eq!(tree.len(), 3);
        assert!(tree.max_value().unwrap().is_nan());
        assert!(tree.contains_value(f64::NAN));
        assert!(tree.successor_value(f64::INFINITY).unwrap().unwrap().is_nan());
        assert!(tree.delete_value(f64::NAN).unwrap().is_nan());
    }

    #[test]
    fn test_rbtree_extreme_values() {
        let mut tree = FloatRbTree::<f64>::new();
        for value in [f64::MIN, f64::MAX, 0.0, -0.0] {
            tree.insert_value(value);
        }

        assert_eq!(tree.min_value(), Some(f64::MIN));
        assert_eq!(tree.max_value(), Some(f64::MAX));
        assert_eq!(tree.delete_value(0.0), Ok(-0.0));
        assert!(tree.contains_value(-0.0));
    }

    #[test]
    fn test_sliding_window_stress() {
        let mut tree = FloatRbTree::<f64>::with_capacity(5);
        let inputs = [10.0, 10.5, 11.2, 10.9, 11.5, 11.9, 12.3, 12.1, 11.8, 12.5];

        for (i, &value) in inputs.iter().enumerate() {
            if i >= 5 {
                let removed = tree.delete_value(inputs[i - 5]);
                assert!(removed.is_ok(), "Failed to remove {} at step {}", inputs[i - 5], i);
            }
            tree.insert_value(value);
            assert!(tree.len() <= 5, "Window exceeded 5 values at step {}", i);
        }

        assert_eq!(tree.min_value(), Some(11.8));
        assert_eq!(tree.max_value(), Some(12.5));
        assert!(tree.capacity() >= 5);
    }
}
