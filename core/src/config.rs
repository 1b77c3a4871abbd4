//! Config types for data-driven case tables.
//!
//! These types mirror the runtime types but are serde-deserializable,
//! enabling config-driven construction via [`CaseTable::from_config()`].
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type |
//! |-------------|-------------|
//! | [`CaseTableConfig`] | [`CaseTable<Value, A>`](crate::CaseTable) |
//! | [`RuleConfig`] | [`Rule`](crate::Rule) over [`OfKind`] or [`Anything`] |
//! | [`KindSpec`] | [`OfKind`] / [`Anything`] discriminator |
//! | [`GuardSpec`] | [`ValueGuard`] |
//!
//! # Example
//!
//! ```
//! use typecase::{load_json, Value};
//!
//! let table = load_json::<String>(r#"{
//!     "rules": [
//!         { "kind": "int", "guard": { "range": { "min": 0 } }, "result": "non-negative" },
//!         { "kind": "str", "guard": { "regex": "^user-\\d+$" }, "result": "user id" }
//!     ],
//!     "default": "other"
//! }"#).unwrap();
//!
//! assert_eq!(table.evaluate(&Value::from(3)).as_deref(), Ok("non-negative"));
//! assert_eq!(table.evaluate(&Value::from("user-7")).as_deref(), Ok("user id"));
//! assert_eq!(table.evaluate(&Value::from(-3)).as_deref(), Ok("other"));
//! ```

use crate::{
    when, Anything, CaseTable, Discriminator, MatchError, OfKind, Value, ValueGuard, ValueKind,
    MAX_GUARD_DEPTH, MAX_PATTERN_LENGTH, MAX_REGEX_PATTERN_LENGTH, MAX_RULES,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Configuration for a [`CaseTable`] over [`Value`] subjects.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct CaseTableConfig<A> {
    /// Rules to evaluate in order (first-match-wins).
    pub rules: Vec<RuleConfig<A>>,

    /// Result when no rule accepts. Absent means evaluation fails with
    /// [`MatchError::NoMatch`].
    #[serde(default)]
    pub default: Option<A>,
}

/// Configuration for one rule.
///
/// `kind` and `result` are required; they are optional here so that a
/// missing one is reported as [`MatchError::MisconfiguredRule`] with the
/// rule's index instead of a generic deserialization error.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct RuleConfig<A> {
    /// Which subject kinds the rule accepts.
    #[serde(default)]
    pub kind: Option<KindSpec>,

    /// Optional guard over the subject.
    #[serde(default)]
    pub guard: Option<GuardSpec>,

    /// Result produced when the rule accepts.
    #[serde(default)]
    pub result: Option<A>,
}

/// The discriminator of a config rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindSpec {
    /// Any subject.
    Any,
    /// `Value::Unit`
    Unit,
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::Str`
    Str,
    /// `Value::Bytes`
    Bytes,
    /// `Value::List`
    List,
}

impl KindSpec {
    /// The value kind this selects; `None` for `any`.
    #[must_use]
    pub fn value_kind(self) -> Option<ValueKind> {
        match self {
            Self::Any => None,
            Self::Unit => Some(ValueKind::Unit),
            Self::Bool => Some(ValueKind::Bool),
            Self::Int => Some(ValueKind::Int),
            Self::Float => Some(ValueKind::Float),
            Self::Str => Some(ValueKind::Str),
            Self::Bytes => Some(ValueKind::Bytes),
            Self::List => Some(ValueKind::List),
        }
    }

    /// Name as written in config files.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.value_kind().map_or("any", ValueKind::name)
    }
}

/// A guard as written in configuration.
///
/// Externally tagged:
///
/// ```yaml
/// guard: { prefix: "/api" }
/// guard: { range: { min: 0, max: 10 } }
/// guard: { not: { equals: 0 } }
/// guard: { all: [ { prefix: "a" }, { len: { max: 8 } } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardSpec {
    /// Structural equality.
    Equals(Value),
    /// String starts with prefix.
    Prefix(String),
    /// String ends with suffix.
    Suffix(String),
    /// String contains substring.
    Contains(String),
    /// Regular expression (Rust `regex` crate syntax, linear time).
    Regex(String),
    /// Inclusive numeric bounds.
    Range {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<f64>,
    },
    /// Inclusive length bounds.
    Len {
        /// Inclusive lower bound.
        #[serde(default)]
        min: Option<usize>,
        /// Inclusive upper bound.
        #[serde(default)]
        max: Option<usize>,
    },
    /// All children pass.
    All(Vec<GuardSpec>),
    /// Any child passes.
    Any(Vec<GuardSpec>),
    /// Inner guard fails.
    Not(Box<GuardSpec>),
}

impl GuardSpec {
    /// Compile into a runtime [`ValueGuard`].
    ///
    /// # Errors
    ///
    /// - [`MatchError::GuardTooDeep`] if nesting exceeds [`MAX_GUARD_DEPTH`]
    /// - [`MatchError::PatternTooLong`] if a pattern exceeds its length limit
    /// - [`MatchError::InvalidPattern`] if a regex does not compile
    pub fn to_guard(&self) -> Result<ValueGuard, MatchError> {
        self.compile(1)
    }

    fn compile(&self, depth: usize) -> Result<ValueGuard, MatchError> {
        if depth > MAX_GUARD_DEPTH {
            return Err(MatchError::GuardTooDeep {
                depth,
                max: MAX_GUARD_DEPTH,
            });
        }
        let compile_all = |children: &[GuardSpec]| {
            children
                .iter()
                .map(|c| c.compile(depth + 1))
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(match self {
            Self::Equals(v) => ValueGuard::Equals(v.clone()),
            Self::Prefix(p) => ValueGuard::Prefix(check_len(p, MAX_PATTERN_LENGTH)?),
            Self::Suffix(p) => ValueGuard::Suffix(check_len(p, MAX_PATTERN_LENGTH)?),
            Self::Contains(p) => ValueGuard::Contains(check_len(p, MAX_PATTERN_LENGTH)?),
            Self::Regex(p) => {
                let pattern = check_len(p, MAX_REGEX_PATTERN_LENGTH)?;
                let re = regex::Regex::new(&pattern).map_err(|e| MatchError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                ValueGuard::Regex(re)
            }
            Self::Range { min, max } => ValueGuard::Range {
                min: *min,
                max: *max,
            },
            Self::Len { min, max } => ValueGuard::Len {
                min: *min,
                max: *max,
            },
            Self::All(children) => ValueGuard::All(compile_all(children)?),
            Self::Any(children) => ValueGuard::Any(compile_all(children)?),
            Self::Not(inner) => ValueGuard::Not(Box::new(inner.compile(depth + 1)?)),
        })
    }
}

fn check_len(pattern: &str, max: usize) -> Result<String, MatchError> {
    if pattern.len() > max {
        return Err(MatchError::PatternTooLong {
            len: pattern.len(),
            max,
        });
    }
    Ok(pattern.to_string())
}

impl<A> CaseTable<Value, A>
where
    A: Clone + Send + Sync + 'static,
{
    /// Load a table from configuration.
    ///
    /// Every rule is validated before the table is returned; nothing is
    /// deferred to evaluation time.
    ///
    /// # Errors
    ///
    /// - [`MatchError::TooManyRules`] if the config has more than [`MAX_RULES`] rules
    /// - [`MatchError::MisconfiguredRule`] if a rule lacks `kind` or `result`
    /// - [`MatchError::IncompatibleGuard`] if a guard can never pass for its rule's kind
    /// - Any error from [`GuardSpec::to_guard`]
    pub fn from_config(config: CaseTableConfig<A>) -> Result<Self, MatchError> {
        if config.rules.len() > MAX_RULES {
            return Err(MatchError::TooManyRules {
                count: config.rules.len(),
                max: MAX_RULES,
            });
        }

        let mut table = CaseTable::new();
        for (index, rule) in config.rules.into_iter().enumerate() {
            let kind = rule.kind.ok_or(MatchError::MisconfiguredRule {
                index,
                missing: "kind",
            })?;
            let result = rule.result.ok_or(MatchError::MisconfiguredRule {
                index,
                missing: "result",
            })?;
            let guard = rule.guard.as_ref().map(GuardSpec::to_guard).transpose()?;
            if let Some(guard) = &guard {
                if !guard.supports(kind.value_kind()) {
                    return Err(MatchError::IncompatibleGuard {
                        index,
                        guard: guard.name(),
                        kind: kind.name(),
                    });
                }
            }

            match kind.value_kind() {
                Some(k) => push_rule(&mut table, OfKind(k), guard, result),
                None => push_rule(&mut table, Anything, guard, result),
            }
        }

        let has_default = config.default.is_some();
        if let Some(default) = config.default {
            table = table.with_default(move || default.clone());
        }
        tracing::debug!(rules = table.len(), has_default, "loaded case table from config");
        Ok(table)
    }
}

fn push_rule<D, A>(table: &mut CaseTable<Value, A>, discriminator: D, guard: Option<ValueGuard>, result: A)
where
    D: Discriminator<Value, Target = Value> + Clone + 'static,
    A: Clone + Send + Sync + 'static,
{
    let builder = when(discriminator);
    let builder = match guard {
        Some(guard) => builder.guard_with(guard),
        None => builder,
    };
    table.push(builder.yields(result));
}

/// Parse a JSON config and load it into a table.
///
/// # Errors
///
/// Returns [`MatchError::InvalidConfig`] if the JSON does not deserialize,
/// or any error from [`CaseTable::from_config`].
pub fn load_json<A>(json: &str) -> Result<CaseTable<Value, A>, MatchError>
where
    A: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let config: CaseTableConfig<A> =
        serde_json::from_str(json).map_err(|e| MatchError::InvalidConfig {
            reason: e.to_string(),
        })?;
    CaseTable::from_config(config)
}
