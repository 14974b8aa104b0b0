use std::collections::BTreeMap;

use crate::constructor::{Constructible, TypeHandle};
use crate::error::{FactoryError, FactoryResult};

/// Name-to-type table used to pick implementations from configuration.
///
/// A name that is not registered resolves to [`FactoryError::UnknownType`].
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeHandle>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` under `name`, returning any handle previously registered
    /// under that name.
    pub fn register<C: Constructible>(&mut self, name: impl Into<String>) -> Option<TypeHandle> {
        self.register_handle(name, TypeHandle::of::<C>())
    }

    /// Register an existing handle under `name`.
    pub fn register_handle(
        &mut self,
        name: impl Into<String>,
        handle: TypeHandle,
    ) -> Option<TypeHandle> {
        self.types.insert(name.into(), handle)
    }

    /// Look up the handle registered under `name`.
    pub fn lookup(&self, name: &str) -> FactoryResult<TypeHandle> {
        self.types
            .get(name)
            .copied()
            .ok_or_else(|| FactoryError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
