//! Immutable, parent-linked call scopes.
//!
//! # Lookup Order
//!
//! A lookup walks from the innermost binding outwards and stops at the first
//! binding whose key matches (closest wins, like shadowing in nested
//! blocks). If the value stored under that key is not of the requested type
//! the lookup yields `None`; it does not continue to outer bindings.
//!
//! # Sharing
//!
//! Scopes are cheap to clone (one `Arc`) and are `Send + Sync`, so a scope
//! can be handed to a spawned task. Values are stored behind `Arc`, so
//! every scope derived from the same binding sees the same value.

use core::any::{Any, TypeId};
use core::fmt;
use std::sync::Arc;

type SharedValue = Arc<dyn Any + Send + Sync>;

/// One binding in the scope chain.
struct Binding {
    /// Outer scope, `None` for the first binding.
    parent: Option<Arc<Binding>>,
    /// Identity of the key this value is stored under.
    key: TypeId,
    /// Key type name, for debugging.
    key_name: &'static str,
    /// The bound value.
    value: SharedValue,
}

/// An immutable propagation context for request-scoped values.
///
/// Extending a scope never changes it: [`with`](Self::with) and friends
/// return a new scope whose parent is `self`. Two scopes derived from the
/// same parent are fully independent of each other.
///
/// # Example
///
/// ```
/// use toolscope_context::CallScope;
///
/// #[derive(Debug, PartialEq)]
/// struct RequestId(u32);
///
/// let root = CallScope::new();
/// let child = root.with(RequestId(7));
///
/// assert_eq!(*child.get::<RequestId>().unwrap(), RequestId(7));
/// assert!(root.get::<RequestId>().is_none());
/// ```
#[derive(Clone, Default)]
pub struct CallScope {
    head: Option<Arc<Binding>>,
}

impl CallScope {
    /// Creates an empty root scope.
    #[must_use]
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Returns a derived scope with `value` bound under its own type.
    #[must_use]
    pub fn with<V: Any + Send + Sync>(&self, value: V) -> Self {
        self.with_shared(Arc::new(value))
    }

    /// Returns a derived scope with an already shared value bound under its own type.
    ///
    /// The scope keeps a reference, not a copy: mutations made through
    /// interior mutability are visible to every holder of the `Arc`.
    #[must_use]
    pub fn with_shared<V: Any + Send + Sync>(&self, value: Arc<V>) -> Self {
        self.with_keyed::<V>(value)
    }

    /// Returns a derived scope with `value` bound under the key type `K`.
    ///
    /// Use a private key type to keep a binding unreachable from code that
    /// does not own the key.
    #[must_use]
    pub fn with_keyed<K: Any>(&self, value: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            head: Some(Arc::new(Binding {
                parent: self.head.clone(),
                key: TypeId::of::<K>(),
                key_name: core::any::type_name::<K>(),
                value,
            })),
        }
    }

    /// Looks up a value bound under its own type.
    #[must_use]
    pub fn get<V: Any + Send + Sync>(&self) -> Option<Arc<V>> {
        self.get_keyed::<V, V>()
    }

    /// Looks up the value bound under key `K` and downcasts it to `V`.
    ///
    /// Returns `None` if nothing is bound under `K` on this scope lineage,
    /// or if the closest binding holds a value of another type.
    #[must_use]
    pub fn get_keyed<K: Any, V: Any + Send + Sync>(&self) -> Option<Arc<V>> {
        let binding = self.find(TypeId::of::<K>())?;
        match Arc::clone(&binding.value).downcast::<V>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::trace!(
                    key = binding.key_name,
                    expected = core::any::type_name::<V>(),
                    "scope binding has unexpected type"
                );
                None
            }
        }
    }

    /// Returns `true` if anything is bound under key `K` on this lineage.
    #[must_use]
    pub fn contains_key<K: Any>(&self) -> bool {
        self.find(TypeId::of::<K>()).is_some()
    }

    /// Returns the number of bindings on this lineage.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.bindings().count()
    }

    /// Returns `true` if nothing has been bound on this lineage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn find(&self, key: TypeId) -> Option<&Binding> {
        self.bindings().find(|binding| binding.key == key)
    }

    fn bindings(&self) -> impl Iterator<Item = &Binding> {
        core::iter::successors(self.head.as_deref(), |binding| binding.parent.as_deref())
    }
}

impl fmt::Debug for CallScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallScope")
            .field(
                "keys",
                &self
                    .bindings()
                    .map(|binding| binding.key_name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
