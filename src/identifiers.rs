// Copyright 2025 Cowboy AI, LLC.

//! Typed handles into the model arenas
//!
//! Both the discovery model and the mapping model store their nodes in
//! per-kind arenas. A node is addressed by an [`Id<T>`], a plain index tagged
//! with the node type so a handle to an aggregate can never be used where a
//! handle to a domain object is expected.
//!
//! Identity is handle equality: two handles obtained from the same graph are
//! equal exactly when they address the same node, regardless of the node's
//! name or contents.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Handle to a node of type `T` inside one model arena
///
/// # Examples
///
/// ```rust
/// use cim_domain_discovery::Id;
///
/// struct Order;
/// struct Invoice;
///
/// let order = Id::<Order>::from_index(3);
/// assert_eq!(order.index(), 3);
///
/// // Different node types do not mix:
/// // let _: Id<Invoice> = order; // ERROR!
/// let _other = Id::<Invoice>::from_index(3);
/// ```
pub struct Id<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap an arena index
    pub fn from_index(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Position of the node inside its arena
    pub fn index(&self) -> usize {
        self.index
    }
}

// Manual impls: deriving would put bounds on `T`.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("node");
        write!(f, "Id<{kind}>({})", self.index)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.index as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Widget;

    #[test]
    fn test_identity_is_index_equality() {
        let a = Id::<Widget>::from_index(1);
        let b = Id::<Widget>::from_index(1);
        let c = Id::<Widget>::from_index(2);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_debug_names_the_node_kind() {
        let id = Id::<Widget>::from_index(7);
        assert_eq!(format!("{id:?}"), "Id<Widget>(7)");
        assert_eq!(id.to_string(), "#7");
    }

    #[test]
    fn test_serializes_as_index() {
        let id = Id::<Widget>::from_index(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }
}
