//! Typed object factory for Quorum.
//!
//! Types opt in by implementing [`Constructible`], listing the constructors
//! they declare. [`TypedFactory`] resolves a constructor by its compound key
//! (target type plus ordered argument types), caches the resolved handle in a
//! concurrent map, and reuses it for every later call with the same key.
//!
//! # Architecture
//!
//! - **TypeKey / FactoryKey**: `TypeId`-based identity and the compound cache key
//! - **Constructor**: a declared, possibly private, constructor body
//! - **ConstructorHandle**: a resolved constructor callable regardless of visibility
//! - **TypeRegistry**: maps configured names to types
//! - **TypedFactory**: the resolving, caching factory

pub mod constructor;
pub mod error;
pub mod factory;
pub mod key;
pub mod registry;

pub use constructor::{
    Arguments, Constructible, Constructor, ConstructorHandle, Instance, TypeHandle, Visibility,
};
pub use error::{BoxError, FactoryError, FactoryResult};
pub use factory::{FactoryStats, TypedFactory};
pub use key::{FactoryKey, TypeKey};
pub use registry::TypeRegistry;
