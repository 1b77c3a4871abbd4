//! `RuleBuilder`: staged construction of a [`Rule`]
//!
//! `when(discriminator)` starts a builder; `guard` adds optional guards;
//! `then` / `try_then` / `yields` finish it. There is no way to obtain a
//! `Rule` without a transform:
//!
//! ```compile_fail
//! use typecase::{when, IntKind};
//!
//! let rule = when(IntKind).guard(|n: &i64| *n > 0).build();
//! ```
//!
//! Stage methods borrow the builder and return a new one, so a partially
//! built builder works as a template.

use crate::guard::{FnGuard, Guard};
use crate::rule::GuardRef;
use crate::{Discriminator, MatchError, Rule};
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

/// Start building a rule that accepts subjects the discriminator narrows.
///
/// # Example
///
/// ```
/// use typecase::{when, Case, IntKind, Value};
///
/// let ints = when(IntKind);
/// let even = ints.guard(|n: &i64| n % 2 == 0).yields("even");
/// let any_int = ints.yields("int");
///
/// assert!(even.accepts(&Value::from(4)));
/// assert!(!even.accepts(&Value::from(7)));
/// assert!(any_int.accepts(&Value::from(7)));
/// ```
#[must_use]
pub fn when<S: ?Sized, D: Discriminator<S>>(discriminator: D) -> RuleBuilder<S, D> {
    RuleBuilder::new(discriminator)
}

/// An unfinished [`Rule`]: discriminator plus zero or more guards.
pub struct RuleBuilder<S: ?Sized, D: Discriminator<S>> {
    discriminator: D,
    guards: Vec<GuardRef<D::Target>>,
    _subject: PhantomData<fn(&S)>,
}

impl<S: ?Sized, D: Discriminator<S>> RuleBuilder<S, D> {
    /// Create a builder with no guards.
    #[must_use]
    pub fn new(discriminator: D) -> Self {
        Self {
            discriminator,
            guards: Vec::new(),
            _subject: PhantomData,
        }
    }

    /// Number of guards added so far.
    #[must_use]
    pub fn guard_count(&self) -> usize {
        self.guards.len()
    }
}

impl<S: ?Sized, D: Discriminator<S> + Clone> RuleBuilder<S, D> {
    /// Add a guard closure. Guards stack: all of them must pass, in the
    /// order they were added.
    #[must_use]
    pub fn guard<F>(&self, guard: F) -> Self
    where
        F: Fn(&D::Target) -> bool + Send + Sync + 'static,
    {
        self.guard_with(FnGuard(guard))
    }

    /// Add a [`Guard`] implementor, such as a [`ValueGuard`](crate::ValueGuard).
    #[must_use]
    pub fn guard_with<G>(&self, guard: G) -> Self
    where
        G: Guard<D::Target> + 'static,
    {
        let mut guards = self.guards.clone();
        guards.push(Arc::new(guard));
        Self {
            discriminator: self.discriminator.clone(),
            guards,
            _subject: PhantomData,
        }
    }

    /// Finish with an infallible transform.
    #[must_use]
    pub fn then<R, F>(&self, transform: F) -> Rule<S, D, R>
    where
        F: Fn(&D::Target) -> R + Send + Sync + 'static,
        R: 'static,
        D::Target: 'static,
    {
        self.try_then(move |target: &D::Target| Ok::<R, MatchError>(transform(target)))
    }

    /// Finish with a fallible transform. Its error is returned unchanged
    /// from evaluation.
    #[must_use]
    pub fn try_then<R, E, F>(&self, transform: F) -> Rule<S, D, R, E>
    where
        F: Fn(&D::Target) -> Result<R, E> + Send + Sync + 'static,
    {
        Rule {
            discriminator: self.discriminator.clone(),
            guards: self.guards.clone(),
            transform: Arc::new(transform),
            _subject: PhantomData,
        }
    }

    /// Finish with a constant result, cloned on every evaluation.
    #[must_use]
    pub fn yields<R>(&self, result: R) -> Rule<S, D, R>
    where
        R: Clone + Send + Sync + 'static,
        D::Target: 'static,
    {
        self.then(move |_: &D::Target| result.clone())
    }
}

impl<S: ?Sized, D: Discriminator<S> + Clone> Clone for RuleBuilder<S, D> {
    fn clone(&self) -> Self {
        Self {
            discriminator: self.discriminator.clone(),
            guards: self.guards.clone(),
            _subject: PhantomData,
        }
    }
}

impl<S: ?Sized, D: Discriminator<S>> Debug for RuleBuilder<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBuilder")
            .field("discriminator", &self.discriminator)
            .field("guards", &self.guards.len())
            .finish()
    }
}
