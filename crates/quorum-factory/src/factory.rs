use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;

use dashmap::DashMap;
use tracing::debug;

use crate::constructor::{Arguments, Constructible, ConstructorHandle, Instance, TypeHandle};
use crate::error::{FactoryError, FactoryResult};
use crate::key::{format_signature, FactoryKey, TypeKey};
use crate::registry::TypeRegistry;

static GLOBAL: LazyLock<TypedFactory> = LazyLock::new(TypedFactory::new);

/// Counters describing cache behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FactoryStats {
    /// Number of times a type's declared constructors were searched.
    pub resolutions: u64,
    /// Number of lookups answered from the cache.
    pub cache_hits: u64,
    /// Number of cached (type, signature) entries.
    pub cached: usize,
}

/// Creates instances through constructors resolved once per
/// (target type, argument signature) and cached for the factory's lifetime.
///
/// Cache hits never take a global lock. Two threads missing on the same key
/// may both resolve and both insert; resolution is side-effect free and the
/// handles are equivalent, so the last insert simply wins.
pub struct TypedFactory {
    cache: DashMap<FactoryKey, ConstructorHandle>,
    resolutions: AtomicU64,
    cache_hits: AtomicU64,
}

impl TypedFactory {
    /// Create a factory with an empty cache.
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
            resolutions: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
        }
    }

    /// The process-wide factory.
    pub fn global() -> &'static TypedFactory {
        &GLOBAL
    }

    /// Resolve the constructor of `target` whose parameter types are exactly
    /// `arg_types`.
    pub fn resolve(
        &self,
        target: &TypeHandle,
        arg_types: &[TypeKey],
    ) -> FactoryResult<ConstructorHandle> {
        let key = FactoryKey::new(target.key(), arg_types);

        let cached = self.cache.get(&key).map(|entry| entry.value().clone());
        if let Some(handle) = cached {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(handle);
        }

        let handle = self.locate(target, &key)?;
        self.cache.insert(key, handle.clone());
        Ok(handle)
    }

    /// Resolve and invoke a constructor, returning the type-erased instance.
    pub fn create_raw(
        &self,
        target: &TypeHandle,
        arg_types: &[TypeKey],
        args: Arguments,
    ) -> FactoryResult<Instance> {
        self.resolve(target, arg_types)?.invoke(args)
    }

    /// Resolve and invoke a constructor of `C`.
    pub fn create<C: Constructible>(&self, arg_types: &[TypeKey], args: Arguments) -> FactoryResult<C> {
        let instance = self.create_raw(&TypeHandle::of::<C>(), arg_types, args)?;
        instance
            .downcast::<C>()
            .map(|boxed| *boxed)
            .map_err(|_| FactoryError::Downcast {
                expected: std::any::type_name::<C>(),
            })
    }

    /// Create a `C` through its zero-argument constructor.
    pub fn new_instance<C: Constructible>(&self) -> FactoryResult<C> {
        self.create(&[], Arguments::new())
    }

    /// Look up `name` in `registry` and create an instance of that type.
    pub fn create_named(
        &self,
        registry: &TypeRegistry,
        name: &str,
        arg_types: &[TypeKey],
        args: Arguments,
    ) -> FactoryResult<Instance> {
        let target = registry.lookup(name)?;
        self.create_raw(&target, arg_types, args)
    }

    /// Current cache counters.
    pub fn stats(&self) -> FactoryStats {
        FactoryStats {
            resolutions: self.resolutions.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cached: self.cache.len(),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn locate(&self, target: &TypeHandle, key: &FactoryKey) -> FactoryResult<ConstructorHandle> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        debug!(target = target.name(), arity = key.args.len(), "resolving constructor");

        target
            .declared_constructors()
            .into_iter()
            .find(|ctor| ctor.target() == key.target && ctor.signature() == key.args.as_slice())
            .map(ConstructorHandle::unlock)
            .ok_or_else(|| FactoryError::NoSuchConstructor {
                target: target.name(),
                signature: format_signature(&key.args),
            })
    }
}

impl Default for TypedFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypedFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedFactory")
            .field("stats", &self.stats())
            .finish()
    }
}
