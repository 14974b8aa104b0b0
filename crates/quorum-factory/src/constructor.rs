use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, FactoryError, FactoryResult};
use crate::key::{format_signature, TypeKey};

/// A type-erased constructed instance.
pub type Instance = Box<dyn Any + Send>;

type ConstructorBody = dyn Fn(&mut Arguments) -> Result<Instance, BoxError> + Send + Sync;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Positional, type-erased constructor arguments.
///
/// Constructor bodies pull values in declaration order with
/// [`next`](Self::next).
#[derive(Default)]
pub struct Arguments {
    values: VecDeque<Box<dyn Any + Send>>,
    taken: usize,
}

impl Arguments {
    /// An empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument.
    pub fn with<T: Any + Send>(mut self, value: T) -> Self {
        self.values.push_back(Box::new(value));
        self
    }

    /// Number of arguments not yet taken.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no arguments remain.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take the next argument as a `T`.
    pub fn next<T: Any>(&mut self) -> FactoryResult<T> {
        let index = self.taken;
        let mismatch = || FactoryError::ArgumentType {
            index,
            expected: std::any::type_name::<T>(),
        };
        let value = self.values.pop_front().ok_or_else(mismatch)?;
        self.taken += 1;
        value.downcast::<T>().map(|boxed| *boxed).map_err(|_| mismatch())
    }

    /// Verify the remaining arguments match `signature` exactly.
    fn check(&self, target: &TypeKey, signature: &[TypeKey]) -> FactoryResult<()> {
        if self.values.len() != signature.len() {
            return Err(FactoryError::ArgumentCount {
                target: target.name(),
                expected: signature.len(),
                actual: self.values.len(),
            });
        }
        for (index, (value, expected)) in self.values.iter().zip(signature).enumerate() {
            // Dispatch through the trait object; `value.type_id()` would name the Box.
            if (**value).type_id() != expected.id() {
                return Err(FactoryError::ArgumentType {
                    index,
                    expected: expected.name(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("remaining", &self.values.len())
            .field("taken", &self.taken)
            .finish()
    }
}

/// Build an [`Arguments`] list from values.
///
/// ```
/// use quorum_factory::args;
///
/// let mut a = args!["peer-1".to_string(), 3u64];
/// assert_eq!(a.len(), 2);
/// assert_eq!(a.next::<String>().unwrap(), "peer-1");
/// assert_eq!(a.next::<u64>().unwrap(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Arguments::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Arguments::new()$(.with($value))+
    };
}

// ---------------------------------------------------------------------------
// Constructor
// ---------------------------------------------------------------------------

/// Whether a constructor may be invoked directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A constructor declared by a [`Constructible`] type.
pub struct Constructor {
    target: TypeKey,
    signature: Vec<TypeKey>,
    visibility: Visibility,
    body: Box<ConstructorBody>,
}

impl Constructor {
    /// Declare a public constructor for `C` taking `signature`.
    pub fn public<C, B>(signature: Vec<TypeKey>, body: B) -> Self
    where
        C: Any + Send,
        B: Fn(&mut Arguments) -> Result<C, BoxError> + Send + Sync + 'static,
    {
        Self::declare(Visibility::Public, signature, body)
    }

    /// Declare a private constructor for `C`; only a factory can call it.
    pub fn private<C, B>(signature: Vec<TypeKey>, body: B) -> Self
    where
        C: Any + Send,
        B: Fn(&mut Arguments) -> Result<C, BoxError> + Send + Sync + 'static,
    {
        Self::declare(Visibility::Private, signature, body)
    }

    fn declare<C, B>(visibility: Visibility, signature: Vec<TypeKey>, body: B) -> Self
    where
        C: Any + Send,
        B: Fn(&mut Arguments) -> Result<C, BoxError> + Send + Sync + 'static,
    {
        Self {
            target: TypeKey::of::<C>(),
            signature,
            visibility,
            body: Box::new(move |args| body(args).map(|value| Box::new(value) as Instance)),
        }
    }

    pub fn target(&self) -> TypeKey {
        self.target
    }

    pub fn signature(&self) -> &[TypeKey] {
        &self.signature
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Invoke this constructor directly. Private constructors are refused.
    pub fn invoke(&self, args: Arguments) -> FactoryResult<Instance> {
        if self.visibility == Visibility::Private {
            return Err(FactoryError::Inaccessible {
                target: self.target.name(),
                signature: format_signature(&self.signature),
            });
        }
        self.call(args)
    }

    fn call(&self, mut args: Arguments) -> FactoryResult<Instance> {
        args.check(&self.target, &self.signature)?;
        (self.body)(&mut args).map_err(|source| FactoryError::Invocation {
            target: self.target.name(),
            source,
        })
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("target", &self.target)
            .field("signature", &self.signature)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// A resolved, shareable constructor that ignores declared visibility.
///
/// Handles are what the factory caches; cloning one is a reference-count bump.
#[derive(Clone, Debug)]
pub struct ConstructorHandle {
    inner: Arc<Constructor>,
}

impl ConstructorHandle {
    /// Unlock `constructor` for invocation regardless of its visibility.
    pub(crate) fn unlock(constructor: Constructor) -> Self {
        Self {
            inner: Arc::new(constructor),
        }
    }

    /// Invoke the constructor with `args`.
    pub fn invoke(&self, args: Arguments) -> FactoryResult<Instance> {
        self.inner.call(args)
    }

    pub fn target(&self) -> TypeKey {
        self.inner.target
    }

    pub fn signature(&self) -> &[TypeKey] {
        &self.inner.signature
    }

    /// Returns `true` if both handles share the same resolved constructor.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

// ---------------------------------------------------------------------------
// Constructible / TypeHandle
// ---------------------------------------------------------------------------

/// A type that declares the constructors a factory may resolve.
///
/// `constructors()` is the resolution step: it is called on every cache miss
/// and should be free of side effects.
pub trait Constructible: Any + Send {
    fn constructors() -> Vec<Constructor>;
}

/// A type usable as a runtime value: its key plus its declared constructors.
#[derive(Clone, Copy)]
pub struct TypeHandle {
    key: TypeKey,
    constructors: fn() -> Vec<Constructor>,
}

impl TypeHandle {
    /// The handle for `C`.
    pub fn of<C: Constructible>() -> Self {
        Self {
            key: TypeKey::of::<C>(),
            constructors: C::constructors,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// All constructors declared for this type.
    pub fn declared_constructors(&self) -> Vec<Constructor> {
        (self.constructors)()
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.key.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature;

    #[derive(Debug, PartialEq)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    fn endpoint_ctor(visibility: Visibility) -> Constructor {
        let body = |args: &mut Arguments| -> Result<Endpoint, BoxError> {
            let host = args.next::<String>()?;
            let port = args.next::<u16>()?;
            if port == 0 {
                return Err("port must be non-zero".into());
            }
            Ok(Endpoint { host, port })
        };
        match visibility {
            Visibility::Public => Constructor::public(signature![String, u16], body),
            Visibility::Private => Constructor::private(signature![String, u16], body),
        }
    }

    #[test]
    fn public_constructor_invokes() {
        let ctor = endpoint_ctor(Visibility::Public);
        let instance = ctor.invoke(crate::args!["localhost".to_string(), 9000u16]).unwrap();
        let endpoint = instance.downcast::<Endpoint>().unwrap();
        assert_eq!(endpoint.host, "localhost");
        assert_eq!(endpoint.port, 9000);
    }

    #[test]
    fn private_constructor_refuses_direct_invoke() {
        let ctor = endpoint_ctor(Visibility::Private);
        let err = ctor.invoke(crate::args!["h".to_string(), 1u16]).unwrap_err();
        assert!(matches!(err, FactoryError::Inaccessible { .. }));
    }

    #[test]
    fn unlocked_handle_calls_private_constructor() {
        let handle = ConstructorHandle::unlock(endpoint_ctor(Visibility::Private));
        let instance = handle.invoke(crate::args!["h".to_string(), 1u16]).unwrap();
        assert!(instance.downcast_ref::<Endpoint>().is_some());
    }

    #[test]
    fn argument_count_is_checked() {
        let ctor = endpoint_ctor(Visibility::Public);
        let err = ctor.invoke(crate::args!["h".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            FactoryError::ArgumentCount { expected: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn argument_types_are_checked_before_invocation() {
        let ctor = endpoint_ctor(Visibility::Public);
        // u32 is not u16: no widening.
        let err = ctor.invoke(crate::args!["h".to_string(), 1u32]).unwrap_err();
        assert!(matches!(err, FactoryError::ArgumentType { index: 1, .. }));
    }

    #[test]
    fn body_failure_becomes_invocation_error() {
        let ctor = endpoint_ctor(Visibility::Public);
        let err = ctor.invoke(crate::args!["h".to_string(), 0u16]).unwrap_err();
        match err {
            FactoryError::Invocation { source, .. } => {
                assert_eq!(source.to_string(), "port must be non-zero");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn arguments_next_reports_position() {
        let mut args = crate::args![1u8, 2u8];
        assert_eq!(args.next::<u8>().unwrap(), 1);
        let err = args.next::<String>().unwrap_err();
        assert!(matches!(err, FactoryError::ArgumentType { index: 1, .. }));
        assert!(args.next::<u8>().is_err());
    }
}
