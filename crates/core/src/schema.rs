//! Declarative column schema for spreadsheet uploads.
//!
//! A [`ColumnRuleSet`] is pure data: one [`ColumnRule`] per target field,
//! binding a 1-based column position to a required-ness flag and a typed
//! validation/coercion contract ([`RuleKind`]). The set is validated once
//! at construction; the row validator inspects it with ordinary control
//! flow, never reflection.

// ---------------------------------------------------------------------------
// Rule kinds
// ---------------------------------------------------------------------------

/// Numeric width a validated number is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericTarget {
    /// 32-bit integer, truncating toward zero.
    Integer,
    /// 64-bit integer, truncating toward zero.
    Long,
    /// 64-bit float, kept as parsed.
    Float,
}

/// The typed contract of a single column. Exactly one kind per rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// The trimmed cell string is assigned verbatim.
    Text,
    /// Culture-invariant decimal with optional inclusive bounds.
    Number {
        min: Option<f64>,
        max: Option<f64>,
        target: NumericTarget,
    },
    /// Token-set boolean; tokens are matched case-insensitively.
    Boolean {
        true_tokens: Vec<String>,
        false_tokens: Vec<String>,
    },
    /// Exact-format date with optional inclusive year bounds (0 = unbounded).
    Date {
        /// chrono format string, e.g. `%d%m%Y`.
        format: String,
        /// Human-readable format name used in error messages, e.g. `DDMMYYYY`.
        format_name: String,
        min_year: i32,
        max_year: i32,
    },
    /// Case-insensitive membership in a fixed value set.
    Enumeration { allowed: Vec<String> },
}

impl RuleKind {
    /// Boolean kind with the default `true`/`1` and `false`/`0` token sets.
    pub fn boolean_default() -> Self {
        Self::Boolean {
            true_tokens: vec!["true".to_string(), "1".to_string()],
            false_tokens: vec!["false".to_string(), "0".to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Column rules
// ---------------------------------------------------------------------------

/// Declarative constraint + coercion contract bound to one column position.
#[derive(Debug, Clone)]
pub struct ColumnRule {
    /// Stable field identifier (snake_case).
    pub field: String,
    /// Header text shown in the sheet and in error messages.
    pub header: String,
    /// 1-based column index (A=1, B=2, ...).
    pub column: u16,
    /// Whether an empty cell is a validation failure.
    pub required: bool,
    pub kind: RuleKind,
    /// Custom error message overriding the generated defaults.
    pub message: Option<String>,
}

/// Why a rule set failed construction.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("rule set must contain at least one rule")]
    Empty,
    #[error("duplicate column index {0} in rule set")]
    DuplicateColumn(u16),
}

/// An ordered, field-indexed table of column rules.
///
/// Iteration follows declaration order, which is also the column order
/// used for header generation.
#[derive(Debug, Clone)]
pub struct ColumnRuleSet {
    rules: Vec<ColumnRule>,
}

impl ColumnRuleSet {
    /// Validate and build a rule set: non-empty, distinct column indices.
    pub fn new(rules: Vec<ColumnRule>) -> Result<Self, SchemaError> {
        if rules.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.column) {
                return Err(SchemaError::DuplicateColumn(rule.column));
            }
        }
        Ok(Self { rules })
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    /// Look up a rule by its field identifier.
    pub fn get(&self, field: &str) -> Option<&ColumnRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Highest 1-based column index covered by the set.
    pub fn last_column(&self) -> u16 {
        self.rules.iter().map(|r| r.column).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text_rule(field: &str, column: u16) -> ColumnRule {
        ColumnRule {
            field: field.to_string(),
            header: field.to_uppercase(),
            column,
            required: false,
            kind: RuleKind::Text,
            message: None,
        }
    }

    #[test]
    fn empty_rule_set_rejected() {
        assert!(matches!(ColumnRuleSet::new(vec![]), Err(SchemaError::Empty)));
    }

    #[test]
    fn duplicate_column_rejected() {
        let result = ColumnRuleSet::new(vec![text_rule("a", 1), text_rule("b", 1)]);
        assert!(matches!(result, Err(SchemaError::DuplicateColumn(1))));
    }

    #[test]
    fn rules_keep_declaration_order() {
        let set = ColumnRuleSet::new(vec![text_rule("b", 2), text_rule("a", 1)]).unwrap();
        let fields: Vec<_> = set.rules().iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, ["b", "a"]);
    }

    #[test]
    fn lookup_by_field() {
        let set = ColumnRuleSet::new(vec![text_rule("a", 1), text_rule("b", 2)]).unwrap();
        assert_eq!(set.get("b").unwrap().column, 2);
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn last_column_is_max_index() {
        let set = ColumnRuleSet::new(vec![text_rule("a", 3), text_rule("b", 1)]).unwrap();
        assert_eq!(set.last_column(), 3);
    }

    #[test]
    fn default_boolean_tokens() {
        let RuleKind::Boolean { true_tokens, false_tokens } = RuleKind::boolean_default() else {
            panic!("expected boolean kind");
        };
        assert_eq!(true_tokens, ["true", "1"]);
        assert_eq!(false_tokens, ["false", "0"]);
    }
}
