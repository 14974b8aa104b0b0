use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime identity of a Rust type.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying type identifier.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type's name as reported by the compiler.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Compound cache key: the target type followed by the ordered argument types.
///
/// Two keys are equal only if the targets match and the argument lists match
/// element for element, in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FactoryKey {
    pub target: TypeKey,
    pub args: Vec<TypeKey>,
}

impl FactoryKey {
    /// Build a key for `target` with the given argument types.
    pub fn new(target: TypeKey, args: &[TypeKey]) -> Self {
        Self {
            target,
            args: args.to_vec(),
        }
    }
}

impl fmt::Display for FactoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.target, format_signature(&self.args))
    }
}

/// Render an argument type list as `A, B, C`.
pub fn format_signature(args: &[TypeKey]) -> String {
    args.iter()
        .map(TypeKey::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build a `Vec<TypeKey>` from a list of types.
///
/// ```
/// use quorum_factory::{signature, TypeKey};
///
/// let sig = signature![String, u64];
/// assert_eq!(sig, vec![TypeKey::of::<String>(), TypeKey::of::<u64>()]);
/// assert!(signature![].is_empty());
/// ```
#[macro_export]
macro_rules! signature {
    () => {
        ::std::vec::Vec::<$crate::TypeKey>::new()
    };
    ($($ty:ty),+ $(,)?) => {
        ::std::vec![$($crate::TypeKey::of::<$ty>()),+]
    };
}
