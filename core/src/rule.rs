//! `Rule`: discriminator + guards + transform
//!
//! A `Rule` binds the three parts of one case into an immutable unit. The
//! [`CaseTable`](crate::CaseTable) stores rules type-erased behind the
//! [`Case`] capability, so rules with different narrowed input types but the
//! same result type can sit in one ordered list.

use crate::guard::Guard;
use crate::{Discriminator, MatchError};
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

pub(crate) type GuardRef<T> = Arc<dyn Guard<T>>;
pub(crate) type TransformFn<T, R, E> = Arc<dyn Fn(&T) -> Result<R, E> + Send + Sync>;

/// Outcome of testing one case against a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The discriminator rejected the subject's shape.
    KindRejected,
    /// The discriminator accepted, but a guard returned `false`.
    GuardRejected,
    /// Discriminator and all guards accepted.
    Accepted,
}

impl Verdict {
    /// Returns `true` for [`Verdict::Accepted`].
    #[inline]
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// The capability a [`CaseTable`](crate::CaseTable) needs from a rule.
///
/// Implemented by [`Rule`]; implement it directly for hand-written cases.
///
/// # Contract
///
/// - [`check`](Self::check) is side-effect-free apart from user guards and
///   never fails for subjects of an incompatible shape.
/// - [`evaluate`](Self::evaluate) never invokes the transform for a subject
///   `check` would not accept.
/// - [`evaluate_accepted`](Self::evaluate_accepted) is only called after
///   `check` returned [`Verdict::Accepted`] for the same subject.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a case over `{S}` producing `Result<{R}, {E}>`",
    note = "build cases with `when(discriminator).then(..)`; the discriminator must accept `{S}` subjects"
)]
pub trait Case<S: ?Sized, R, E>: Send + Sync {
    /// Test the subject against the discriminator, then the guards.
    fn check(&self, subject: &S) -> Verdict;

    /// Produce the result for a subject this case accepts.
    ///
    /// # Errors
    ///
    /// Propagates the transform's own error unchanged. Returns
    /// [`MatchError::NoMatch`] (converted into `E`) if the discriminator or a
    /// guard rejects the subject, without invoking the transform.
    fn evaluate(&self, subject: &S) -> Result<R, E>;

    /// Produce the result for a subject [`check`](Self::check) just accepted.
    ///
    /// The default delegates to [`evaluate`](Self::evaluate). [`Rule`] skips
    /// its guards here, so a table runs each guard once per evaluation.
    ///
    /// # Errors
    ///
    /// As [`evaluate`](Self::evaluate).
    fn evaluate_accepted(&self, subject: &S) -> Result<R, E> {
        self.evaluate(subject)
    }

    /// Short description used in traces and logs.
    fn name(&self) -> &'static str;

    /// Returns `true` iff [`check`](Self::check) returns [`Verdict::Accepted`].
    fn accepts(&self, subject: &S) -> bool {
        self.check(subject).is_accepted()
    }
}

/// One case of a match expression.
///
/// Built with [`when`](crate::when); immutable afterwards. Cloning is cheap
/// (guards and transform are reference counted), so the same rule can be
/// appended to several tables.
///
/// # Type Parameters
///
/// - `S`: the subject type
/// - `D`: the discriminator, narrowing `&S` to `&D::Target`
/// - `R`: the result type
/// - `E`: the error type (defaults to [`MatchError`])
///
/// # Example
///
/// ```
/// use typecase::{when, Case, IntKind, Value};
///
/// let positive = when(IntKind).guard(|n: &i64| *n > 0).then(|n: &i64| n * 10);
///
/// assert!(positive.accepts(&Value::from(5)));
/// assert!(!positive.accepts(&Value::from(-5)));
/// assert!(!positive.accepts(&Value::from("text")));
/// assert_eq!(positive.evaluate(&Value::from(5)), Ok(50));
/// ```
pub struct Rule<S: ?Sized, D: Discriminator<S>, R, E = MatchError> {
    pub(crate) discriminator: D,
    pub(crate) guards: Vec<GuardRef<D::Target>>,
    pub(crate) transform: TransformFn<D::Target, R, E>,
    pub(crate) _subject: PhantomData<fn(&S)>,
}

impl<S: ?Sized, D: Discriminator<S>, R, E> Rule<S, D, R, E> {
    /// The discriminator of this rule.
    #[must_use]
    pub fn discriminator(&self) -> &D {
        &self.discriminator
    }

    /// Returns `true` if this rule has at least one guard.
    #[must_use]
    pub fn is_guarded(&self) -> bool {
        !self.guards.is_empty()
    }

    fn passes_guards(&self, target: &D::Target) -> bool {
        self.guards.iter().all(|g| g.check(target))
    }

    /// Convert this rule's error type, e.g. to append an infallible rule to
    /// a table with a domain error type.
    #[must_use]
    pub fn err_into<E2>(self) -> Rule<S, D, R, E2>
    where
        D::Target: 'static,
        R: 'static,
        E: 'static,
        E2: From<E> + 'static,
    {
        let transform = self.transform;
        Rule {
            discriminator: self.discriminator,
            guards: self.guards,
            transform: Arc::new(move |target: &D::Target| transform(target).map_err(E2::from)),
            _subject: PhantomData,
        }
    }
}

impl<S, D, R, E> Case<S, R, E> for Rule<S, D, R, E>
where
    S: ?Sized,
    D: Discriminator<S>,
    E: From<MatchError>,
{
    fn check(&self, subject: &S) -> Verdict {
        let Some(target) = self.discriminator.narrow(subject) else {
            return Verdict::KindRejected;
        };
        if self.passes_guards(target) {
            Verdict::Accepted
        } else {
            Verdict::GuardRejected
        }
    }

    fn evaluate(&self, subject: &S) -> Result<R, E> {
        match self.discriminator.narrow(subject) {
            Some(target) if self.passes_guards(target) => (self.transform)(target),
            _ => Err(MatchError::NoMatch { rules: 1 }.into()),
        }
    }

    fn evaluate_accepted(&self, subject: &S) -> Result<R, E> {
        match self.discriminator.narrow(subject) {
            Some(target) => (self.transform)(target),
            None => Err(MatchError::NoMatch { rules: 1 }.into()),
        }
    }

    fn name(&self) -> &'static str {
        self.discriminator.name()
    }
}

impl<S: ?Sized, D: Discriminator<S> + Clone, R, E> Clone for Rule<S, D, R, E> {
    fn clone(&self) -> Self {
        Self {
            discriminator: self.discriminator.clone(),
            guards: self.guards.clone(),
            transform: Arc::clone(&self.transform),
            _subject: PhantomData,
        }
    }
}

impl<S: ?Sized, D: Discriminator<S>, R, E> Debug for Rule<S, D, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("discriminator", &self.discriminator)
            .field("guards", &self.guards.len())
            .finish_non_exhaustive()
    }
}

// Send + Sync are automatic: every field is Send + Sync.
