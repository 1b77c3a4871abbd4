//! `Discriminator`: which subject shapes a rule accepts
//!
//! A discriminator narrows a subject `&S` to a borrowed view of the shape it
//! accepts (`&Self::Target`), or rejects it with `None`. Narrowing is a pure
//! tag check or downcast: it never fails and has no side effects.
//!
//! # Two subject domains
//!
//! - **Closed**: [`Value`] is a sum type, so discriminators are variant checks
//!   ([`IntKind`], [`StrKind`], [`OfKind`], ...).
//! - **Open**: [`Dynamic`] subjects are `Box<dyn Any + Send + Sync>`, discriminated
//!   by downcasting with [`Is<T>`] (see [`is`]).
//!
//! Custom subject enums implement [`Discriminator`] for their own variants.

use crate::{CustomValue, Value, ValueKind};
use std::any::Any;
use std::fmt::{self, Debug};
use std::marker::PhantomData;

/// A subject of genuinely open type, discriminated by downcasting.
pub type Dynamic = Box<dyn Any + Send + Sync>;

/// Narrows a subject of type `S` to the shape a rule accepts.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so built rules can be shared.
///
/// # Example
///
/// ```
/// use typecase::{Discriminator, IntKind, StrKind, Value};
///
/// let subject = Value::from(2);
/// assert_eq!(IntKind.narrow(&subject), Some(&2));
/// assert_eq!(StrKind.narrow(&subject), None);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot discriminate subjects of type `{S}`",
    label = "this discriminator does not implement `Discriminator<{S}>`",
    note = "use the `Value` kinds (IntKind, StrKind, ...) for `Value` subjects, or `is::<T>()` for `Dynamic` subjects"
)]
pub trait Discriminator<S: ?Sized>: Send + Sync + Debug {
    /// The narrowed view handed to guards and transforms.
    type Target: ?Sized;

    /// Returns the narrowed view if the subject has an accepted shape.
    fn narrow<'a>(&self, subject: &'a S) -> Option<&'a Self::Target>;

    /// Short description used in traces and logs.
    fn name(&self) -> &'static str;
}

macro_rules! value_kind {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $target:ty, $label:literal, |$v:ident| $view:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Discriminator<Value> for $name {
            type Target = $target;

            #[inline]
            fn narrow<'a>(&self, subject: &'a Value) -> Option<&'a $target> {
                match subject {
                    Value::$variant($v) => Some($view),
                    _ => None,
                }
            }

            fn name(&self) -> &'static str {
                $label
            }
        }
    };
}

value_kind!(
    /// Accepts [`Value::Bool`], narrowing to `bool`.
    BoolKind, Bool, bool, "bool", |b| b
);
value_kind!(
    /// Accepts [`Value::Int`], narrowing to `i64`.
    IntKind, Int, i64, "int", |i| i
);
value_kind!(
    /// Accepts [`Value::Float`], narrowing to `f64`.
    FloatKind, Float, f64, "float", |x| x
);
value_kind!(
    /// Accepts [`Value::Str`], narrowing to `str`.
    StrKind, Str, str, "str", |s| s.as_str()
);
value_kind!(
    /// Accepts [`Value::Bytes`], narrowing to `[u8]`.
    BytesKind, Bytes, [u8], "bytes", |b| b.as_slice()
);
value_kind!(
    /// Accepts [`Value::List`], narrowing to `[Value]`.
    ListKind, List, [Value], "list", |items| items.as_slice()
);

/// Accepts [`Value::Unit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitKind;

impl Discriminator<Value> for UnitKind {
    type Target = ();

    fn narrow<'a>(&self, subject: &'a Value) -> Option<&'a ()> {
        subject.is_unit().then_some(&())
    }

    fn name(&self) -> &'static str {
        "unit"
    }
}

/// Accepts any [`Value`] whose tag equals the given [`ValueKind`].
///
/// The narrowed view is the whole `Value`. Config-driven rules use this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfKind(pub ValueKind);

impl Discriminator<Value> for OfKind {
    type Target = Value;

    fn narrow<'a>(&self, subject: &'a Value) -> Option<&'a Value> {
        (subject.kind() == self.0).then_some(subject)
    }

    fn name(&self) -> &'static str {
        self.0.name()
    }
}

/// Accepts [`Value::Custom`] payloads of concrete type `T`.
pub struct CustomKind<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> CustomKind<T> {
    /// Create a discriminator for custom payloads of type `T`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for CustomKind<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CustomKind<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Debug for CustomKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomKind<{}>", std::any::type_name::<T>())
    }
}

impl<T: CustomValue + 'static> Discriminator<Value> for CustomKind<T> {
    type Target = T;

    fn narrow<'a>(&self, subject: &'a Value) -> Option<&'a T> {
        subject
            .as_custom()
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Accepts every subject; the narrowed view is the subject itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Anything;

impl<S: ?Sized> Discriminator<S> for Anything {
    type Target = S;

    fn narrow<'a>(&self, subject: &'a S) -> Option<&'a S> {
        Some(subject)
    }

    fn name(&self) -> &'static str {
        "any"
    }
}

/// Downcasting discriminator for [`Dynamic`] subjects.
///
/// Construct with [`is`].
pub struct Is<T> {
    _phantom: PhantomData<fn() -> T>,
}

/// Discriminator accepting [`Dynamic`] subjects whose concrete type is `T`.
///
/// ```
/// use typecase::{is, Discriminator, Dynamic};
///
/// let subject: Dynamic = Box::new(2_i32);
/// assert_eq!(is::<i32>().narrow(&subject), Some(&2));
/// assert_eq!(is::<String>().narrow(&subject), None);
/// ```
#[must_use]
pub fn is<T: Any + Send + Sync>() -> Is<T> {
    Is {
        _phantom: PhantomData,
    }
}

impl<T> Clone for Is<T> {
    fn clone(&self) -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Debug for Is<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Is<{}>", std::any::type_name::<T>())
    }
}

impl<T: Any + Send + Sync> Discriminator<Dynamic> for Is<T> {
    type Target = T;

    fn narrow<'a>(&self, subject: &'a Dynamic) -> Option<&'a T> {
        (**subject).downcast_ref::<T>()
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
