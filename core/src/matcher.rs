//! Matcher: a subject bound to a first-match-wins case table
//!
//! The `Matcher` is the entry point for one match expression: construct it
//! with the subject, append rules in priority order, optionally attach a
//! default, then evaluate.

use crate::{Case, CaseTable, Dynamic, EvalTrace, MatchError};
use std::any::Any;
use std::fmt::{self, Debug};

/// One match expression: a subject plus an ordered [`CaseTable`].
///
/// # Type Parameters
///
/// - `S`: the subject type ([`Value`](crate::Value), [`Dynamic`], or a user enum)
/// - `R`: the result type
/// - `E`: the error type (defaults to [`MatchError`])
///
/// # INV: Idempotent evaluation
///
/// The subject and the rules are immutable once added, so evaluating the
/// same matcher twice tests the same rules and returns the same result
/// (given deterministic user callables).
///
/// # Example
///
/// ```
/// use typecase::{when, BoolKind, IntKind, MatchError, Matcher, StrKind, Value};
///
/// let result = Matcher::new(Value::from(2))
///     .with_rule(when(StrKind).yields("Is String"))
///     .with_rule(when(IntKind).yields("Is Integer"))
///     .evaluate();
/// assert_eq!(result, Ok("Is Integer"));
///
/// let unmatched = Matcher::new(Value::from(2))
///     .with_rule(when(StrKind).yields("Is String"))
///     .with_rule(when(BoolKind).yields("Is Boolean"));
/// assert_eq!(unmatched.evaluate(), Err(MatchError::NoMatch { rules: 2 }));
/// assert_eq!(unmatched.with_default(|| "Unknown").evaluate(), Ok("Unknown"));
/// ```
pub struct Matcher<S, R, E = MatchError> {
    subject: S,
    table: CaseTable<S, R, E>,
}

impl<S, R, E> Matcher<S, R, E> {
    /// Create a matcher for the subject, with no rules and no fallback.
    pub fn new(subject: S) -> Self {
        Self::from_parts(subject, CaseTable::new())
    }

    /// Bind a subject to an existing table (e.g. one loaded from config).
    pub fn from_parts(subject: S, table: CaseTable<S, R, E>) -> Self {
        Self { subject, table }
    }

    /// Append a rule; rules are tested in the order they were added.
    #[must_use]
    pub fn with_rule<C>(mut self, rule: C) -> Self
    where
        C: Case<S, R, E> + 'static,
    {
        self.table.push(rule);
        self
    }

    /// Set the fallback supplier. Last write wins.
    #[must_use]
    pub fn with_default<F>(mut self, fallback: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        self.table = self.table.with_default(fallback);
        self
    }

    /// Set a fallible fallback supplier. Last write wins.
    #[must_use]
    pub fn with_try_default<F>(mut self, fallback: F) -> Self
    where
        F: Fn() -> Result<R, E> + Send + Sync + 'static,
    {
        self.table = self.table.with_try_default(fallback);
        self
    }

    /// The subject being matched.
    pub fn subject(&self) -> &S {
        &self.subject
    }

    /// The rules and fallback of this matcher.
    pub fn table(&self) -> &CaseTable<S, R, E> {
        &self.table
    }

    /// Split into subject and table.
    pub fn into_parts(self) -> (S, CaseTable<S, R, E>) {
        (self.subject, self.table)
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns `true` if there is a fallback.
    pub fn has_fallback(&self) -> bool {
        self.table.has_fallback()
    }

    /// Validate this matcher against safety constraints.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::TooManyRules`] if the rule list is too wide.
    pub fn validate(&self) -> Result<(), MatchError> {
        self.table.validate()
    }
}

impl<S, R, E: From<MatchError>> Matcher<S, R, E> {
    /// Evaluate the rules against the subject.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NoMatch`] (as `E`) when no rule accepts and no
    /// fallback is set; transform and fallback errors pass through unchanged.
    pub fn evaluate(&self) -> Result<R, E> {
        self.table.evaluate(&self.subject)
    }

    /// Evaluate with full trace for debugging.
    #[must_use]
    pub fn evaluate_with_trace(&self) -> EvalTrace<R, E> {
        self.table.evaluate_with_trace(&self.subject)
    }
}

impl<R, E> Matcher<Dynamic, R, E> {
    /// Create a matcher over a value of open type, discriminated with
    /// [`is::<T>()`](crate::is).
    ///
    /// ```
    /// use typecase::{is, when, Matcher};
    ///
    /// let result = Matcher::dynamic(2_i32)
    ///     .with_rule(when(is::<String>()).then(|s: &String| format!("string of {}", s.len())))
    ///     .with_rule(when(is::<i32>()).then(|n: &i32| format!("int {n}")))
    ///     .evaluate();
    /// assert_eq!(result.as_deref(), Ok("int 2"));
    /// ```
    pub fn dynamic<T: Any + Send + Sync>(value: T) -> Self {
        Self::new(Box::new(value))
    }
}

impl<S: Debug, R, E> Debug for Matcher<S, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("subject", &self.subject)
            .field("table", &self.table)
            .finish()
    }
}
