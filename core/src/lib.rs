//! typecase - runtime case matching on the shape of a value
//!
//! Evaluate an ordered list of typed, optionally guarded case rules against
//! a subject whose concrete kind is only known at runtime, and produce the
//! result of the first rule that accepts it.
//!
//! # Architecture
//!
//! - [`Value`]: Closed sum type for subjects (primitives + extensible `Custom` variant)
//! - [`Discriminator<S>`]: Narrows a subject `&S` to the shape a rule accepts
//! - [`Guard<T>`]: Optional predicate over the narrowed view
//! - [`Rule<S, D, R, E>`]: Discriminator + guards + transform, built with [`when`]
//! - [`Case<S, R, E>`]: Type-erased rule capability (`check` / `evaluate`)
//! - [`CaseTable<S, R, E>`]: Ordered rules + optional fallback, first-match-wins
//! - [`Matcher<S, R, E>`]: A subject bound to a `CaseTable`
//!
//! # Key Design Insights
//!
//! 1. **Sum type over reflection**: `Value` subjects are discriminated by
//!    their variant tag. Downcasting ([`is::<T>()`](is) on [`Dynamic`]
//!    subjects) is reserved for genuinely open domains.
//!
//! 2. **Staged builder**: a [`RuleBuilder`] has no way to produce a rule
//!    without a transform, so an unusable rule cannot be constructed.
//!
//! 3. **Transparent errors**: transform and fallback errors reach the caller
//!    unchanged. The engine only originates [`MatchError::NoMatch`] during
//!    evaluation.
//!
//! # Example
//!
//! ```
//! use typecase::prelude::*;
//!
//! let matcher = Matcher::new(Value::from(7))
//!     .with_rule(when(IntKind).guard(|x: &i64| x % 2 == 0).yields("Even"))
//!     .with_rule(when(IntKind).yields("Odd-or-other"));
//!
//! assert_eq!(matcher.evaluate(), Ok("Odd-or-other"));
//! ```
//!
//! # Config-driven tables
//!
//! With the `config` feature, [`CaseTableConfig`] deserializes from JSON/YAML
//! and loads into a `CaseTable<Value, A>` via [`CaseTable::from_config`].

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod builder;
mod discriminator;
mod guard;
mod matcher;
mod rule;
mod table;
mod trace;
mod value;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use builder::{when, RuleBuilder};
pub use discriminator::{
    is, Anything, BoolKind, BytesKind, CustomKind, Discriminator, Dynamic, FloatKind, IntKind, Is,
    ListKind, OfKind, StrKind, UnitKind,
};
pub use guard::{Guard, ValueGuard};
pub use matcher::Matcher;
pub use rule::{Case, Rule, Verdict};
pub use table::CaseTable;
pub use value::{CustomValue, Value, ValueKind};

// Config (feature-gated)
#[cfg(feature = "config")]
pub use config::{load_json, CaseTableConfig, GuardSpec, KindSpec, RuleConfig};

// Trace types
pub use trace::{EvalStep, EvalTrace};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use typecase::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Discriminators
        is,
        // Builder
        when,
        Anything,
        BoolKind,
        BytesKind,
        // Traits
        Case,
        // Core types
        CaseTable,
        CustomKind,
        CustomValue,
        Discriminator,
        Dynamic,
        // Trace types
        EvalStep,
        EvalTrace,
        FloatKind,
        Guard,
        IntKind,
        ListKind,
        // Errors
        MatchError,
        Matcher,
        OfKind,
        Rule,
        RuleBuilder,
        StrKind,
        UnitKind,
        Value,
        ValueGuard,
        ValueKind,
        Verdict,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of rules in a single [`CaseTable`].
///
/// Checked by [`CaseTable::validate`] and at config load time.
pub const MAX_RULES: usize = 256;

/// Maximum nesting depth of a config guard (`all` / `any` / `not`).
pub const MAX_GUARD_DEPTH: usize = 32;

/// Maximum length for non-regex string guard patterns (prefix, suffix, contains).
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for regex guard patterns.
///
/// Shorter than [`MAX_PATTERN_LENGTH`] because regex compilation cost scales
/// faster than literal matching.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors originated by the engine.
///
/// [`NoMatch`](Self::NoMatch) is the only evaluation-time error. Every other
/// variant is raised while loading a table, before any subject is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Evaluation tested every rule, none accepted, and no fallback is set.
    #[error("no rule accepted the subject ({rules} tested) and no default is configured; add a default or a catch-all rule")]
    NoMatch {
        /// Number of rules that were tested.
        rules: usize,
    },

    /// A data-driven rule is missing its discriminator or its result.
    #[error("rule {index} has no {missing}; every rule needs a kind and a result")]
    MisconfiguredRule {
        /// Position of the rule in the config.
        index: usize,
        /// The missing part (`"kind"` or `"result"`).
        missing: &'static str,
    },

    /// Configuration deserialization failed.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// The underlying error message.
        reason: String,
    },

    /// A regex guard pattern does not compile.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },

    /// A guard pattern exceeds the maximum allowed length.
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Too many rules in a single table.
    #[error("case table has {count} rules, but maximum allowed is {max}")]
    TooManyRules {
        /// Actual number of rules.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A guard is nested too deeply.
    #[error("guard nesting depth is {depth}, but maximum allowed is {max}; flatten the guard")]
    GuardTooDeep {
        /// Actual depth of the guard.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// A guard can never pass for the kind its rule discriminates.
    #[error("rule {index}: `{guard}` guard cannot apply to `{kind}` subjects")]
    IncompatibleGuard {
        /// Position of the rule in the config.
        index: usize,
        /// Name of the offending guard.
        guard: &'static str,
        /// The rule's kind.
        kind: &'static str,
    },
}

impl MatchError {
    /// Stable `snake_case` identifier of the error variant.
    ///
    /// Conformance fixtures refer to load errors by this code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoMatch { .. } => "no_match",
            Self::MisconfiguredRule { .. } => "misconfigured_rule",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::PatternTooLong { .. } => "pattern_too_long",
            Self::TooManyRules { .. } => "too_many_rules",
            Self::GuardTooDeep { .. } => "guard_too_deep",
            Self::IncompatibleGuard { .. } => "incompatible_guard",
        }
    }
}
