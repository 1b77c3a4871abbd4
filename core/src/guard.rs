//! `Guard`: predicates that narrow acceptance beyond the discriminator
//!
//! A guard runs only after the discriminator has accepted the subject, and
//! sees the narrowed view (`&D::Target`). Closures are the usual guards; the
//! [`ValueGuard`] family covers the data-driven cases (config files,
//! fixtures) over whole [`Value`] subjects.
//!
//! # Available value guards
//!
//! - [`ValueGuard::Equals`]: structural equality
//! - [`ValueGuard::Prefix`], [`ValueGuard::Suffix`], [`ValueGuard::Contains`]: string tests
//! - [`ValueGuard::Regex`]: linear-time regular expression (RE2 semantics)
//! - [`ValueGuard::Range`]: inclusive numeric bounds
//! - [`ValueGuard::Len`]: inclusive length bounds on strings, bytes and lists
//! - [`ValueGuard::All`], [`ValueGuard::Any`], [`ValueGuard::Not`]: composition

use crate::{Value, ValueKind};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt::Debug;

/// A predicate over a narrowed subject view.
///
/// Implemented by [`ValueGuard`]. Closures are passed to the rule builder
/// directly via [`RuleBuilder::guard`](crate::RuleBuilder::guard).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so built rules can be shared.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a guard over `{T}`",
    note = "pass closures with `RuleBuilder::guard`; `guard_with` takes `Guard` implementors such as `ValueGuard`"
)]
pub trait Guard<T: ?Sized>: Send + Sync {
    /// Returns `true` if the narrowed subject passes this guard.
    fn check(&self, subject: &T) -> bool;
}

/// Adapts a closure into a [`Guard`].
pub(crate) struct FnGuard<F>(pub(crate) F);

impl<T: ?Sized, F> Guard<T> for FnGuard<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, subject: &T) -> bool {
        (self.0)(subject)
    }
}

/// Data-driven guard over a whole [`Value`].
///
/// Every variant returns `false` for values of a kind it does not test
/// (e.g. `Prefix` on an `Int`); it never fails.
///
/// # Example
///
/// ```
/// use typecase::{Guard, Value, ValueGuard};
///
/// let guard = ValueGuard::All(vec![
///     ValueGuard::Prefix("/api".into()),
///     ValueGuard::Not(Box::new(ValueGuard::Suffix(".json".into()))),
/// ]);
/// assert!(guard.check(&Value::from("/api/users")));
/// assert!(!guard.check(&Value::from("/api/users.json")));
/// assert!(!guard.check(&Value::from(7)));
/// ```
#[derive(Debug, Clone)]
pub enum ValueGuard {
    /// Structural equality with the given value.
    Equals(Value),
    /// String starts with prefix.
    Prefix(String),
    /// String ends with suffix.
    Suffix(String),
    /// String contains substring.
    Contains(String),
    /// String matches the compiled regular expression.
    Regex(Regex),
    /// Number (int or float) within inclusive bounds; an absent bound is open.
    Range {
        /// Inclusive lower bound.
        min: Option<f64>,
        /// Inclusive upper bound.
        max: Option<f64>,
    },
    /// Length of a string (bytes), byte buffer or list within inclusive bounds.
    Len {
        /// Inclusive lower bound.
        min: Option<usize>,
        /// Inclusive upper bound.
        max: Option<usize>,
    },
    /// All children pass (short-circuits on the first failure).
    All(Vec<ValueGuard>),
    /// Any child passes (short-circuits on the first success).
    Any(Vec<ValueGuard>),
    /// Inverts the inner guard.
    Not(Box<ValueGuard>),
}

impl ValueGuard {
    /// Short name of the guard, as written in config files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals(_) => "equals",
            Self::Prefix(_) => "prefix",
            Self::Suffix(_) => "suffix",
            Self::Contains(_) => "contains",
            Self::Regex(_) => "regex",
            Self::Range { .. } => "range",
            Self::Len { .. } => "len",
            Self::All(_) => "all",
            Self::Any(_) => "any",
            Self::Not(_) => "not",
        }
    }

    /// Nesting depth of this guard (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::All(children) | Self::Any(children) => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not(inner) => 1 + inner.depth(),
            _ => 1,
        }
    }

    /// Whether this guard can ever pass for subjects of the given kind.
    ///
    /// `None` stands for "any kind" and is always supported. Used at config
    /// load time to reject guards that could never fire.
    #[must_use]
    pub fn supports(&self, kind: Option<ValueKind>) -> bool {
        let Some(kind) = kind else {
            return true;
        };
        match self {
            Self::Equals(expected) => expected.kind() == kind,
            Self::Prefix(_) | Self::Suffix(_) | Self::Contains(_) | Self::Regex(_) => {
                kind == ValueKind::Str
            }
            Self::Range { .. } => kind.is_numeric(),
            Self::Len { .. } => matches!(kind, ValueKind::Str | ValueKind::Bytes | ValueKind::List),
            Self::All(children) => children.iter().all(|g| g.supports(Some(kind))),
            Self::Any(children) => children.iter().any(|g| g.supports(Some(kind))),
            // `not` of an unsupported test still passes every subject of the kind
            Self::Not(_) => true,
        }
    }
}

impl Guard<Value> for ValueGuard {
    fn check(&self, subject: &Value) -> bool {
        match self {
            Self::Equals(expected) => subject == expected,
            Self::Prefix(p) => subject.as_str().is_some_and(|s| s.starts_with(p.as_str())),
            Self::Suffix(p) => subject.as_str().is_some_and(|s| s.ends_with(p.as_str())),
            Self::Contains(p) => subject.as_str().is_some_and(|s| s.contains(p.as_str())),
            Self::Regex(re) => subject.as_str().is_some_and(|s| re.is_match(s)),
            Self::Range { min, max } => {
                matches!(subject, Value::Int(_) | Value::Float(_))
                    && min.map_or(true, |lo| cmp_bound(subject, lo).is_some_and(Ordering::is_ge))
                    && max.map_or(true, |hi| cmp_bound(subject, hi).is_some_and(Ordering::is_le))
            }
            Self::Len { min, max } => subject.len().is_some_and(|n| {
                min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
            }),
            Self::All(children) => children.iter().all(|g| g.check(subject)),
            Self::Any(children) => children.iter().any(|g| g.check(subject)),
            Self::Not(inner) => !inner.check(subject),
        }
    }
}

/// Orders a numeric subject against a range bound. `Int` subjects are
/// compared exactly, never widened to `f64`.
fn cmp_bound(subject: &Value, bound: f64) -> Option<Ordering> {
    match *subject {
        Value::Int(i) => cmp_int_float(i, bound),
        Value::Float(x) => x.partial_cmp(&bound),
        _ => None,
    }
}

// 2^63, exactly representable as f64.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

#[allow(clippy::cast_possible_truncation)]
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if f < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }
    // In [-2^63, 2^63): the truncated part converts to i64 exactly.
    let whole = f.trunc();
    let fraction = f - whole;
    Some(
        i.cmp(&(whole as i64))
            .then_with(|| 0.0_f64.partial_cmp(&fraction).unwrap_or(Ordering::Equal)),
    )
}
