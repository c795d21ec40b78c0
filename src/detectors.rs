//! Quality rules and the registry that decides where they apply.
//!
//! Each rule inspects one normalized cell and may raise a single issue.
//! Rules are paired with a column predicate (any column, or column names
//! containing a keyword), so adding a check means adding a registry entry
//! rather than touching the scanner.
//!
//! Rules that need a value declare it through [`Rule::requires_value`]; the
//! registry skips them for empty cells, which keeps an empty cell from also
//! being reported as a malformed email or a duplicate.

use crate::config::QualityConfig;
use crate::constants::{DEFAULT_AGE_KEYWORD, DEFAULT_EMAIL_KEYWORD, EMAIL_PATTERN, issue_text};
use crate::models::{Issue, IssueType, Severity};
use crate::normalize::NormalizedCell;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

/// Basic email shape check: one `@`, no whitespace, a dot in the domain
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Which columns a rule runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMatch {
    /// Every column
    Any,
    /// Columns whose name contains the keyword, ignoring case
    Keyword(String),
}

impl ColumnMatch {
    pub fn keyword(keyword: impl AsRef<str>) -> Self {
        ColumnMatch::Keyword(keyword.as_ref().trim().to_lowercase())
    }

    pub fn matches(&self, column_name: &str) -> bool {
        match self {
            ColumnMatch::Any => true,
            ColumnMatch::Keyword(keyword) => column_name.to_lowercase().contains(keyword.as_str()),
        }
    }
}

/// A single quality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Blank or absent cell
    EmptyCell,
    /// Value already seen earlier in the same column
    Duplicate,
    /// Value that does not look like an email address
    EmailFormat,
    /// Numeric value below zero
    NegativeValue,
}

impl Rule {
    /// Whether the rule only runs on non-empty cells
    pub fn requires_value(&self) -> bool {
        !matches!(self, Rule::EmptyCell)
    }

    pub fn issue_type(&self) -> IssueType {
        match self {
            Rule::EmptyCell => IssueType::Empty,
            Rule::Duplicate => IssueType::Duplicate,
            Rule::EmailFormat => IssueType::InvalidFormat,
            Rule::NegativeValue => IssueType::Outlier,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Rule::EmptyCell => Severity::Medium,
            Rule::Duplicate => Severity::Low,
            Rule::EmailFormat | Rule::NegativeValue => Severity::High,
        }
    }

    /// Run the rule on one cell, recording the value in the column state
    /// when the rule tracks seen values
    pub fn evaluate(&self, cell: &CellContext<'_>, state: &mut ColumnState) -> Option<Issue> {
        let (description, suggested_fix) = match self {
            Rule::EmptyCell => {
                if !cell.value.is_empty() {
                    return None;
                }
                (
                    issue_text::EMPTY_DESCRIPTION.to_string(),
                    issue_text::EMPTY_FIX,
                )
            }
            Rule::Duplicate => {
                if !state.observe(&cell.value.text) {
                    return None;
                }
                (
                    format!(
                        "{}\"{}\"",
                        issue_text::DUPLICATE_DESCRIPTION_PREFIX,
                        cell.value.text
                    ),
                    issue_text::DUPLICATE_FIX,
                )
            }
            Rule::EmailFormat => {
                if is_valid_email(&cell.value.text) {
                    return None;
                }
                (
                    issue_text::INVALID_EMAIL_DESCRIPTION.to_string(),
                    issue_text::INVALID_EMAIL_FIX,
                )
            }
            Rule::NegativeValue => {
                if !cell.value.number.is_some_and(|value| value < 0.0) {
                    return None;
                }
                (
                    issue_text::NEGATIVE_AGE_DESCRIPTION.to_string(),
                    issue_text::NEGATIVE_AGE_FIX,
                )
            }
        };

        Some(Issue {
            row_index: cell.row_index,
            column_index: cell.column_index,
            column_name: cell.column_name.to_string(),
            issue_type: self.issue_type(),
            severity: self.severity(),
            description,
            suggested_fix: suggested_fix.to_string(),
        })
    }
}

/// Location and value of the cell being checked
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    /// 1-based row in the source file
    pub row_index: usize,
    pub column_index: usize,
    pub column_name: &'a str,
    pub value: &'a NormalizedCell,
}

/// Per-column state accumulated over one scan
#[derive(Debug, Clone, Default)]
pub struct ColumnState {
    seen: HashSet<String>,
}

impl ColumnState {
    /// Returns true when the value was already seen; otherwise remembers it
    pub fn observe(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            true
        } else {
            self.seen.insert(value.to_string());
            false
        }
    }

    /// Number of distinct values seen so far
    pub fn distinct_values(&self) -> usize {
        self.seen.len()
    }
}

/// A rule together with the columns it applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorRule {
    pub rule: Rule,
    pub column_match: ColumnMatch,
}

/// Ordered set of rules evaluated for every cell
///
/// Evaluation order is registry order, so issues for one cell always come
/// out in the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorRegistry {
    rules: Vec<DetectorRule>,
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl DetectorRegistry {
    /// Registry with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Empty cell, duplicate, email format and negative age, in that order
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(Rule::EmptyCell, ColumnMatch::Any)
            .with_rule(Rule::Duplicate, ColumnMatch::Any)
            .with_rule(
                Rule::EmailFormat,
                ColumnMatch::keyword(DEFAULT_EMAIL_KEYWORD),
            )
            .with_rule(
                Rule::NegativeValue,
                ColumnMatch::keyword(DEFAULT_AGE_KEYWORD),
            )
    }

    /// Registry honouring the enabled checks and keywords of a configuration
    pub fn from_config(config: &QualityConfig) -> Self {
        let mut registry = Self::empty();
        if config.check_empty {
            registry = registry.with_rule(Rule::EmptyCell, ColumnMatch::Any);
        }
        if config.check_duplicates {
            registry = registry.with_rule(Rule::Duplicate, ColumnMatch::Any);
        }
        if config.check_email_format {
            registry = registry.with_rule(
                Rule::EmailFormat,
                ColumnMatch::keyword(&config.email_keyword),
            );
        }
        if config.check_negative_values {
            registry = registry.with_rule(
                Rule::NegativeValue,
                ColumnMatch::keyword(&config.age_keyword),
            );
        }

        debug!("Built detector registry with {} rules", registry.len());
        registry
    }

    /// Append a rule; it runs after every rule already registered
    pub fn with_rule(mut self, rule: Rule, column_match: ColumnMatch) -> Self {
        self.rules.push(DetectorRule { rule, column_match });
        self
    }

    pub fn rules(&self) -> &[DetectorRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that apply to a column, in registry order
    pub fn rules_for_column(&self, column_name: &str) -> Vec<Rule> {
        self.rules
            .iter()
            .filter(|entry| entry.column_match.matches(column_name))
            .map(|entry| entry.rule)
            .collect()
    }
}

/// Run a column's rules over one cell, appending any issues raised
pub fn evaluate_cell(
    rules: &[Rule],
    cell: &CellContext<'_>,
    state: &mut ColumnState,
    issues: &mut Vec<Issue>,
) {
    for rule in rules {
        if rule.requires_value() && cell.value.is_empty() {
            continue;
        }
        if let Some(issue) = rule.evaluate(cell, state) {
            issues.push(issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use crate::normalize::normalize;

    fn run(rules: &[Rule], column_name: &str, raw: &str, state: &mut ColumnState) -> Vec<Issue> {
        let value = normalize(Some(&Cell::from(raw)));
        let cell = CellContext {
            row_index: 2,
            column_index: 0,
            column_name,
            value: &value,
        };
        let mut issues = Vec::new();
        evaluate_cell(rules, &cell, state, &mut issues);
        issues
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@b.com@c.com"));
    }

    #[test]
    fn test_column_match_is_case_insensitive() {
        let email = ColumnMatch::keyword("Email");
        assert!(email.matches("Contact EMAIL"));
        assert!(email.matches("email_address"));
        assert!(!email.matches("Phone"));
        assert!(ColumnMatch::Any.matches(""));
    }

    #[test]
    fn test_standard_registry_order() {
        let registry = DetectorRegistry::standard();
        let rules: Vec<Rule> = registry.rules().iter().map(|entry| entry.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::EmptyCell,
                Rule::Duplicate,
                Rule::EmailFormat,
                Rule::NegativeValue
            ]
        );
        assert_eq!(
            registry.rules_for_column("Name"),
            vec![Rule::EmptyCell, Rule::Duplicate]
        );
        assert_eq!(
            registry.rules_for_column("Work Email"),
            vec![Rule::EmptyCell, Rule::Duplicate, Rule::EmailFormat]
        );
    }

    #[test]
    fn test_empty_cell_suppresses_value_rules() {
        let rules = DetectorRegistry::standard().rules_for_column("Email");
        let mut state = ColumnState::default();

        let issues = run(&rules, "Email", "   ", &mut state);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::Empty);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert_eq!(state.distinct_values(), 0);
    }

    #[test]
    fn test_duplicate_records_first_occurrence_only() {
        let rules = [Rule::Duplicate];
        let mut state = ColumnState::default();

        assert!(run(&rules, "Name", "A", &mut state).is_empty());
        let second = run(&rules, "Name", " A ", &mut state);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].description, "Duplicate value: \"A\"");
        assert_eq!(second[0].severity, Severity::Low);
        assert_eq!(run(&rules, "Name", "A", &mut state).len(), 1);
        assert_eq!(state.distinct_values(), 1);
    }

    #[test]
    fn test_invalid_email_and_duplicate_on_same_cell() {
        let rules = DetectorRegistry::standard().rules_for_column("Email");
        let mut state = ColumnState::default();

        assert_eq!(run(&rules, "Email", "bad", &mut state).len(), 1);
        let issues = run(&rules, "Email", "bad", &mut state);
        let types: Vec<IssueType> = issues.iter().map(|issue| issue.issue_type).collect();
        assert_eq!(types, vec![IssueType::Duplicate, IssueType::InvalidFormat]);
    }

    #[test]
    fn test_negative_value_rule() {
        let rules = [Rule::NegativeValue];
        let mut state = ColumnState::default();

        let issues = run(&rules, "Age", "-5", &mut state);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::Outlier);
        assert_eq!(issues[0].description, "Negative age value");

        assert!(run(&rules, "Age", "5", &mut state).is_empty());
        assert!(run(&rules, "Age", "0", &mut state).is_empty());
        assert!(run(&rules, "Age", "abc", &mut state).is_empty());
        assert!(run(&rules, "Age", "-5years", &mut state).is_empty());
    }

    #[test]
    fn test_registry_from_config() {
        let config = QualityConfig::default()
            .without_duplicate_check()
            .with_age_keyword("Years");
        let registry = DetectorRegistry::from_config(&config);

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.rules_for_column("years_old"),
            vec![Rule::EmptyCell, Rule::NegativeValue]
        );
        assert_eq!(registry.rules_for_column("Age"), vec![Rule::EmptyCell]);
    }

    #[test]
    fn test_registry_from_default_config_matches_standard() {
        assert_eq!(
            DetectorRegistry::from_config(&QualityConfig::default()),
            DetectorRegistry::standard()
        );
    }
}
