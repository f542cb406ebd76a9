// Copyright 2025 Cowboy AI, LLC.

//! Attribute, parameter and return types of the discovery model

use crate::discovery::model::DomainObject;
use crate::identifiers::Id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Collection wrapper around a base type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionType {
    /// Ordered, duplicates allowed
    List,
    /// Unordered, unique elements
    Set,
    /// Unspecified collection
    Collection,
}

impl CollectionType {
    /// Name as it appears in decomposition input and mapping output
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::List => "List",
            CollectionType::Set => "Set",
            CollectionType::Collection => "Collection",
        }
    }

    /// Recognize a collection wrapper by its raw type name
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "List" => Some(CollectionType::List),
            "Set" => Some(CollectionType::Set),
            "Collection" => Some(CollectionType::Collection),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_type_name(s).ok_or_else(|| format!("not a collection type: {s}"))
    }
}

/// Base of a [`Type`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    /// Opaque type known only by its name
    Primitive(String),
    /// A domain object of the same graph
    DomainObject(Id<DomainObject>),
}

/// A resolved type with an optional collection wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Type {
    /// Base type
    pub kind: TypeKind,
    /// Collection wrapper, if any
    pub collection: Option<CollectionType>,
}

impl Type {
    /// A primitive type by name
    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Primitive(name.into()),
            collection: None,
        }
    }

    /// A domain-object type
    pub fn domain_object(target: Id<DomainObject>) -> Self {
        Self {
            kind: TypeKind::DomainObject(target),
            collection: None,
        }
    }

    /// Wrap this type in a collection, replacing any previous wrapper
    pub fn with_collection(mut self, collection: CollectionType) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Check if the base type is a domain object
    pub fn is_domain_object_type(&self) -> bool {
        matches!(self.kind, TypeKind::DomainObject(_))
    }

    /// Referenced domain object, if the base type is one
    pub fn domain_object_target(&self) -> Option<Id<DomainObject>> {
        match self.kind {
            TypeKind::DomainObject(id) => Some(id),
            TypeKind::Primitive(_) => None,
        }
    }

    /// Primitive type name, if the base type is primitive
    pub fn primitive_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Primitive(name) => Some(name),
            TypeKind::DomainObject(_) => None,
        }
    }

    /// Check if a collection wrapper is present
    pub fn is_collection_type(&self) -> bool {
        self.collection.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("List", Some(CollectionType::List))]
    #[test_case("Set", Some(CollectionType::Set))]
    #[test_case("Collection", Some(CollectionType::Collection))]
    #[test_case("Map", None)]
    #[test_case("list", None)]
    fn test_collection_wrapper_names(name: &str, expected: Option<CollectionType>) {
        assert_eq!(CollectionType::from_type_name(name), expected);
    }

    #[test]
    fn test_collection_wrapper_replaces_previous() {
        let ty = Type::primitive("String")
            .with_collection(CollectionType::Set)
            .with_collection(CollectionType::List);

        assert_eq!(ty.collection, Some(CollectionType::List));
        assert_eq!(ty.primitive_name(), Some("String"));
        assert!(!ty.is_domain_object_type());
    }

    #[test]
    fn test_domain_object_type() {
        let target = Id::<DomainObject>::from_index(4);
        let ty = Type::domain_object(target);

        assert!(ty.is_domain_object_type());
        assert_eq!(ty.domain_object_target(), Some(target));
        assert_eq!(ty.primitive_name(), None);
        assert!(!ty.is_collection_type());
    }
}
