//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against config-loaded case tables.
//!
//! ```yaml
//! name: kind_dispatch
//! description: first rule whose kind matches wins
//! table:
//!   rules:
//!     - { kind: str, result: "Is String" }
//!     - { kind: int, result: "Is Integer" }
//! cases:
//!   - { name: int subject, subject: 2, expect: "Is Integer" }
//!   - { name: bool subject, subject: true, expect_error: no_match }
//! ```
//!
//! A fixture with `expect_load_error` must fail to load with that error code
//! and has no cases.

use serde::Deserialize;
use typecase::prelude::*;
use typecase::CaseTableConfig;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw table config, in the same JSON shape `load_json` accepts; parsed
    /// during the run so that parse failures surface as `invalid_config`
    /// load errors.
    pub table: serde_json::Value,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    /// Error code the table load must fail with.
    #[serde(default)]
    pub expect_load_error: Option<String>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub subject: Value,
    #[serde(default)]
    pub expect: Option<String>,
    /// Error code evaluation must fail with.
    #[serde(default)]
    pub expect_error: Option<String>,
}

impl TestCase {
    /// Outcome this case expects: a result, or an error code.
    pub fn expected(&self) -> Result<String, String> {
        match (&self.expect, &self.expect_error) {
            (Some(result), None) => Ok(result.clone()),
            (None, Some(code)) => Err(code.clone()),
            _ => panic!(
                "case '{}' must set exactly one of `expect` and `expect_error`",
                self.name
            ),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Result<String, String>,
    pub actual: Result<String, String>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Load the fixture's table through the config path.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidConfig`] if the table does not parse,
    /// or any error from [`CaseTable::from_config`].
    pub fn load(&self) -> Result<CaseTable<Value, String>, MatchError> {
        let config: CaseTableConfig<String> =
            serde_json::from_value(self.table.clone()).map_err(|e| MatchError::InvalidConfig {
                reason: e.to_string(),
            })?;
        CaseTable::from_config(config)
    }

    fn load_or_panic(&self) -> CaseTable<Value, String> {
        self.load()
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to load: {e}", self.name))
    }

    /// Run all test cases and return results
    ///
    /// # Panics
    ///
    /// Panics if the table fails to load.
    pub fn run(&self) -> Vec<CaseResult> {
        let table = self.load_or_panic();
        self.cases
            .iter()
            .map(|case| {
                let expected = case.expected();
                let actual = outcome(table.evaluate(&case.subject));
                CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == expected,
                    expected,
                    actual,
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure.
    ///
    /// Also checks that evaluation is repeatable and that the trace agrees
    /// with `evaluate()`.
    pub fn run_and_assert(&self) {
        if let Some(code) = &self.expect_load_error {
            match self.load() {
                Ok(_) => panic!("Fixture '{}' expected load error '{code}'", self.name),
                Err(e) => assert_eq!(
                    e.code(),
                    code,
                    "Fixture '{}' failed with the wrong error: {e}",
                    self.name
                ),
            }
            return;
        }

        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?}",
                self.name, result.case_name, result.expected, result.actual
            );
        }

        let table = self.load_or_panic();
        for case in &self.cases {
            let first = outcome(table.evaluate(&case.subject));
            let second = outcome(table.evaluate(&case.subject));
            assert_eq!(
                first, second,
                "Fixture '{}' case '{}' is not repeatable",
                self.name, case.name
            );

            let trace = table.evaluate_with_trace(&case.subject);
            assert_eq!(
                outcome(trace.result),
                first,
                "Fixture '{}' case '{}': trace disagrees with evaluate",
                self.name,
                case.name
            );
        }
    }
}

fn outcome(result: Result<String, MatchError>) -> Result<String, String> {
    result.map_err(|e| e.code().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fixture() {
        let yaml = r#"
name: smoke
table:
  rules:
    - { kind: int, result: "int" }
cases:
  - { name: hit, subject: 1, expect: "int" }
  - { name: miss, subject: "a", expect_error: no_match }
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        assert_eq!(fixture.cases.len(), 2);
        assert_eq!(fixture.cases[0].subject, Value::from(1));
        assert_eq!(fixture.cases[1].expected(), Err("no_match".to_string()));
        fixture.run_and_assert();
    }

    #[test]
    fn missing_subject_is_unit() {
        let yaml = r#"
name: unit
table:
  rules:
    - { kind: unit, result: "unit" }
cases:
  - { name: absent, expect: "unit" }
  - { name: explicit null, subject: ~, expect: "unit" }
"#;
        Fixture::from_yaml(yaml).unwrap().run_and_assert();
    }

    #[test]
    fn load_error_fixture() {
        let yaml = r#"
name: bad
table:
  rules:
    - { kind: int }
expect_load_error: misconfigured_rule
"#;
        Fixture::from_yaml(yaml).unwrap().run_and_assert();
    }

    #[test]
    fn guarded_table_loads() {
        let yaml = r#"
name: guarded
table:
  rules:
    - { kind: int, guard: { range: { min: 0 } }, result: "non-negative" }
    - kind: str
      guard:
        all:
          - { prefix: "user-" }
          - { not: { len: { max: 5 } } }
      result: "user"
  default: "other"
cases:
  - { name: range passes, subject: 3, expect: "non-negative" }
  - { name: range fails, subject: -3, expect: "other" }
  - { name: composite passes, subject: "user-7", expect: "user" }
  - { name: composite fails, subject: "user-", expect: "other" }
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        assert_eq!(fixture.load().unwrap().len(), 2);
        fixture.run_and_assert();
    }

    #[test]
    fn guarded_rule_without_kind_is_misconfigured() {
        let yaml = r#"
name: no kind
table:
  rules:
    - { guard: { prefix: "a" }, result: "a" }
expect_load_error: misconfigured_rule
"#;
        Fixture::from_yaml(yaml).unwrap().run_and_assert();
    }

    #[test]
    fn unknown_kind_is_invalid_config() {
        let yaml = r#"
name: bad kind
table:
  rules:
    - { kind: tuple, result: "x" }
"#;
        let err = Fixture::from_yaml(yaml).unwrap().load().unwrap_err();
        assert_eq!(err.code(), "invalid_config");
    }

    #[test]
    #[should_panic(expected = "failed")]
    fn wrong_expectation_panics() {
        let yaml = r#"
name: wrong
table:
  rules:
    - { kind: int, result: "int" }
cases:
  - { name: hit, subject: 1, expect: "str" }
"#;
        Fixture::from_yaml(yaml).unwrap().run_and_assert();
    }
}
