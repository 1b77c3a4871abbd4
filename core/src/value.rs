//! `Value`: the closed sum type for subjects of unknown concrete kind
//!
//! Case tables over `Value` discriminate on an explicit variant tag
//! ([`ValueKind`]) instead of reflective type inspection. The closed set of
//! primitives covers what config files and fixtures can express.
//!
//! # Extensibility via `Custom`
//!
//! For domain-specific payloads not covered by the primitives, implement
//! [`CustomValue`] and wrap in `Value::Custom(Arc::new(your_type))`. The
//! [`CustomKind<T>`](crate::CustomKind) discriminator downcasts it back.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Extension trait for custom subject payloads.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that case tables over `Value`
/// stay shareable across threads.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use typecase::{CustomValue, Value};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl CustomValue for Point {
///     fn custom_type_name(&self) -> &'static str {
///         "point"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let subject = Value::Custom(Arc::new(Point { x: 1, y: 2 }));
/// assert!(subject.is_custom());
/// assert_eq!(subject.type_name(), "point");
/// ```
pub trait CustomValue: Send + Sync + fmt::Debug {
    /// Returns a human-readable type identifier, e.g. `"point"`.
    ///
    /// Named `custom_type_name` to avoid collision with `Any::type_id`.
    fn custom_type_name(&self) -> &'static str;

    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// The variant tag of a [`Value`].
///
/// `OfKind` rules and config-driven rules discriminate on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Unit`]
    Unit,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::Str`]
    Str,
    /// [`Value::Bytes`]
    Bytes,
    /// [`Value::List`]
    List,
    /// [`Value::Custom`]
    Custom,
}

impl ValueKind {
    /// Lowercase name of the tag, as written in config files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Custom => "custom",
        }
    }

    /// Returns `true` for the numeric tags (`int`, `float`).
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A subject value whose concrete kind is only known at runtime.
///
/// # Variants
///
/// - `Unit`: no payload (`null` / `~` in config)
/// - `Bool`, `Int`, `Float`, `Str`, `Bytes`: primitives
/// - `List`: an ordered sequence of values
/// - `Custom`: user-defined payloads implementing [`CustomValue`]
///
/// # Example
///
/// ```
/// use typecase::{Value, ValueKind};
///
/// let subject = Value::from(2);
/// assert_eq!(subject.kind(), ValueKind::Int);
/// assert_eq!(subject.as_int(), Some(2));
/// assert_eq!(subject.as_str(), None);
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// No payload.
    Unit,

    /// Boolean payload.
    Bool(bool),

    /// Integer payload.
    Int(i64),

    /// Floating point payload.
    Float(f64),

    /// String payload.
    Str(String),

    /// Raw bytes payload.
    Bytes(Vec<u8>),

    /// Ordered sequence of values.
    List(Vec<Value>),

    /// Custom payload for domain-specific extensions.
    Custom(Arc<dyn CustomValue>),
}

// Trait objects don't derive PartialEq: Custom compares by Arc identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// The variant tag of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Unit => ValueKind::Unit,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::List(_) => ValueKind::List,
            Self::Custom(_) => ValueKind::Custom,
        }
    }

    /// Returns `true` if this is the `Unit` variant.
    #[inline]
    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Returns `true` if this is the `Custom` variant.
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a float. Integers are not widened.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Lossy numeric view: `Int` widens to `f64`, rounding magnitudes above
    /// 2^53. Range guards compare `Int` subjects exactly instead.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a byte slice.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Try to get the value as a list slice.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Try to get the custom payload.
    ///
    /// Use [`CustomValue::as_any`] to downcast to the concrete type.
    #[inline]
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    /// Length of a `Str` (bytes), `Bytes` or `List` value.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Str(s) => Some(s.len()),
            Self::Bytes(b) => Some(b.len()),
            Self::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Returns a string describing the type of this value.
    ///
    /// For `Custom` variants, this delegates to [`CustomValue::custom_type_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Custom(c) => c.custom_type_name(),
            other => other.kind().name(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Unit
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Unit, Into::into)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Untagged: order matters (bool before int before float).
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Unit(()),
            Bool(bool),
            Int(i64),
            Float(f64),
            Str(String),
            List(Vec<Value>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Unit(()) => Self::Unit,
            Repr::Bool(b) => Self::Bool(b),
            Repr::Int(i) => Self::Int(i),
            Repr::Float(x) => Self::Float(x),
            Repr::Str(s) => Self::Str(s),
            Repr::List(items) => Self::List(items),
        })
    }
}
