//! Evaluation trace types for debugging case tables.
//!
//! Use `evaluate_with_trace()` on a [`CaseTable`](crate::CaseTable) or
//! [`Matcher`](crate::Matcher) to see which rules were tested, why each was
//! rejected, and whether the fallback fired.
//!
//! # Example
//!
//! ```
//! use typecase::{when, IntKind, Matcher, StrKind, Value, Verdict};
//!
//! let matcher = Matcher::new(Value::from(7))
//!     .with_rule(when(StrKind).yields("str"))
//!     .with_rule(when(IntKind).guard(|n: &i64| n % 2 == 0).yields("even"))
//!     .with_default(|| "other");
//!
//! let trace = matcher.evaluate_with_trace();
//! assert_eq!(trace.result, Ok("other"));
//! assert!(trace.used_fallback);
//! assert_eq!(trace.steps[0].verdict, Verdict::KindRejected);
//! assert_eq!(trace.steps[1].verdict, Verdict::GuardRejected);
//! ```

use crate::Verdict;
use std::fmt;

/// Trace of a full evaluation.
///
/// # INV: `result` == `evaluate()` result
///
/// The `result` field always equals what `evaluate()` returns for the same
/// subject, and the same user callables run in the same order.
pub struct EvalTrace<R, E> {
    /// The final result (identical to what `evaluate()` returns).
    pub result: Result<R, E>,
    /// Each rule that was tested, in order. Stops after the first acceptor.
    pub steps: Vec<EvalStep>,
    /// Whether the fallback supplier produced the result.
    pub used_fallback: bool,
}

impl<R, E> EvalTrace<R, E> {
    /// Index of the rule that accepted the subject, if any.
    #[must_use]
    pub fn matched_index(&self) -> Option<usize> {
        self.steps
            .iter()
            .find(|step| step.verdict.is_accepted())
            .map(|step| step.index)
    }
}

impl<R: fmt::Debug, E: fmt::Debug> fmt::Debug for EvalTrace<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalTrace")
            .field("result", &self.result)
            .field("steps", &self.steps)
            .field("used_fallback", &self.used_fallback)
            .finish()
    }
}

/// One rule's test in a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalStep {
    /// Position of the rule in the table (0-based).
    pub index: usize,
    /// The rule's name (its discriminator's name).
    pub rule: &'static str,
    /// What the rule decided.
    pub verdict: Verdict,
}
