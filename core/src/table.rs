//! `CaseTable`: ordered rules + optional fallback, first-match-wins
//!
//! A `CaseTable` is a match expression without its subject: it can be
//! evaluated against any number of subjects. [`Matcher`](crate::Matcher)
//! binds one subject to one table.

use crate::{Case, EvalStep, EvalTrace, MatchError, Verdict, MAX_RULES};
use std::fmt;
use std::sync::Arc;

pub(crate) type FallbackFn<R, E> = Arc<dyn Fn() -> Result<R, E> + Send + Sync>;

/// Ordered rules with first-match-wins semantics and an optional fallback.
///
/// # Type Parameters
///
/// - `S`: the subject type
/// - `R`: the result type shared by every rule
/// - `E`: the error type (defaults to [`MatchError`]); must absorb
///   `MatchError` so an exhausted table can report [`MatchError::NoMatch`]
///
/// # INV: First-match-wins
///
/// Rules are tested in insertion order. The first rule whose discriminator
/// and guards accept the subject produces the result; no later rule is
/// tested, even if it would also match.
///
/// # Two failure policies
///
/// - No fallback: an exhausted scan fails with [`MatchError::NoMatch`].
/// - Fallback: an exhausted scan returns the supplier's result.
///
/// # Example
///
/// ```
/// use typecase::{when, CaseTable, IntKind, MatchError, StrKind, Value};
///
/// let table = CaseTable::new()
///     .with_rule(when(StrKind).yields("Is String"))
///     .with_rule(when(IntKind).yields("Is Integer"));
///
/// assert_eq!(table.evaluate(&Value::from(2)), Ok("Is Integer"));
/// assert_eq!(
///     table.evaluate(&Value::from(true)),
///     Err(MatchError::NoMatch { rules: 2 })
/// );
/// ```
pub struct CaseTable<S: ?Sized, R, E = MatchError> {
    rules: Vec<Box<dyn Case<S, R, E>>>,
    fallback: Option<FallbackFn<R, E>>,
}

impl<S: ?Sized, R, E> CaseTable<S, R, E> {
    /// Create an empty table (no rules, no fallback).
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: None,
        }
    }

    /// Append a rule; it is tested after every rule already present.
    #[must_use]
    pub fn with_rule<C>(mut self, rule: C) -> Self
    where
        C: Case<S, R, E> + 'static,
    {
        self.push(rule);
        self
    }

    /// Append a rule in place.
    pub fn push<C>(&mut self, rule: C)
    where
        C: Case<S, R, E> + 'static,
    {
        self.rules.push(Box::new(rule));
    }

    /// Set a fallback result supplier. Replaces any previous fallback.
    #[must_use]
    pub fn with_default<F>(self, fallback: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        self.with_try_default(move || Ok(fallback()))
    }

    /// Set a fallible fallback supplier. Its error is returned unchanged.
    /// Replaces any previous fallback.
    #[must_use]
    pub fn with_try_default<F>(mut self, fallback: F) -> Self
    where
        F: Fn() -> Result<R, E> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Remove the fallback, switching back to the fail-fast policy.
    #[must_use]
    pub fn without_default(mut self) -> Self {
        self.fallback = None;
        self
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` if a fallback supplier is configured.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Names of the rules, in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Validate this table against [`MAX_RULES`].
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::TooManyRules`] if the table is too wide.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.rules.len() > MAX_RULES {
            return Err(MatchError::TooManyRules {
                count: self.rules.len(),
                max: MAX_RULES,
            });
        }
        Ok(())
    }
}

impl<S: ?Sized, R, E: From<MatchError>> CaseTable<S, R, E> {
    /// Evaluate the table against a subject.
    ///
    /// Returns the first accepting rule's result, else the fallback's result.
    ///
    /// # Errors
    ///
    /// - [`MatchError::NoMatch`] (converted into `E`) if no rule accepts and
    ///   no fallback is configured.
    /// - Any error returned by the accepting rule's transform or by the
    ///   fallback, unchanged.
    pub fn evaluate(&self, subject: &S) -> Result<R, E> {
        for (index, rule) in self.rules.iter().enumerate() {
            match rule.check(subject) {
                Verdict::Accepted => {
                    tracing::trace!(index, rule = rule.name(), "rule accepted subject");
                    return rule.evaluate_accepted(subject);
                }
                verdict => {
                    tracing::trace!(index, rule = rule.name(), ?verdict, "rule rejected subject");
                }
            }
        }
        self.exhausted()
    }

    /// Evaluate with a full trace for debugging.
    ///
    /// Tests exactly the rules [`evaluate()`](Self::evaluate) would, in the
    /// same order, and stops at the same acceptor.
    #[must_use]
    pub fn evaluate_with_trace(&self, subject: &S) -> EvalTrace<R, E> {
        let mut steps = Vec::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let verdict = rule.check(subject);
            steps.push(EvalStep {
                index,
                rule: rule.name(),
                verdict,
            });
            if verdict.is_accepted() {
                return EvalTrace {
                    result: rule.evaluate_accepted(subject),
                    steps,
                    used_fallback: false,
                };
            }
        }
        EvalTrace {
            used_fallback: self.fallback.is_some(),
            result: self.exhausted(),
            steps,
        }
    }

    fn exhausted(&self) -> Result<R, E> {
        let rules = self.rules.len();
        match &self.fallback {
            Some(fallback) => {
                tracing::debug!(rules, "no rule accepted subject, using fallback");
                fallback()
            }
            None => {
                tracing::debug!(rules, "no rule accepted subject and no fallback configured");
                Err(MatchError::NoMatch { rules }.into())
            }
        }
    }
}

impl<S: ?Sized, R, E> Default for CaseTable<S, R, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized, R, E> fmt::Debug for CaseTable<S, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseTable")
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

// Send + Sync are automatic: `Case` and the fallback are both Send + Sync.
