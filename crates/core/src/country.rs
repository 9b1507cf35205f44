//! The country catalog upload schema and its typed row/record types.

use chrono::NaiveDate;

use crate::schema::{ColumnRule, ColumnRuleSet, NumericTarget, RuleKind};
use crate::validate::CellValue;

/// Column rules for the countries upload sheet.
///
/// Panics if the static schema is invalid, which is a programming error
/// we want to surface at startup rather than per request.
pub fn country_rules() -> ColumnRuleSet {
    ColumnRuleSet::new(vec![
        ColumnRule {
            field: "code".to_string(),
            header: "Code".to_string(),
            column: 1,
            required: true,
            kind: RuleKind::Number { min: None, max: None, target: NumericTarget::Integer },
            message: None,
        },
        ColumnRule {
            field: "name".to_string(),
            header: "Name".to_string(),
            column: 2,
            required: true,
            kind: RuleKind::Text,
            message: None,
        },
        ColumnRule {
            field: "is_active".to_string(),
            header: "IsActive".to_string(),
            column: 3,
            required: true,
            kind: RuleKind::Boolean {
                true_tokens: ["true", "yes", "y", "1"].map(String::from).to_vec(),
                false_tokens: ["false", "no", "n", "0"].map(String::from).to_vec(),
            },
            message: None,
        },
        ColumnRule {
            field: "start_date".to_string(),
            header: "StartDate".to_string(),
            column: 4,
            required: true,
            kind: RuleKind::Date {
                format: "%d%m%Y".to_string(),
                format_name: "DDMMYYYY".to_string(),
                min_year: 2000,
                max_year: 2100,
            },
            message: None,
        },
    ])
    .expect("country upload schema is valid")
}

/// A typed row from the countries upload sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub code: i32,
    pub name: String,
    pub is_active: bool,
    pub start_date: NaiveDate,
}

impl CountryRow {
    /// Rebuild a typed row from a value vector in [`country_rules`] order.
    ///
    /// Returns `None` when the vector does not have the expected shape,
    /// which cannot happen for values produced by a passing validation.
    pub fn from_cells(cells: &[CellValue]) -> Option<Self> {
        match cells {
            [CellValue::Int(code), CellValue::Text(name), CellValue::Bool(is_active), CellValue::Date(start_date)] => {
                Some(Self {
                    code: *code as i32,
                    name: name.clone(),
                    is_active: *is_active,
                    start_date: *start_date,
                })
            }
            _ => None,
        }
    }
}

/// A country record ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCountry {
    /// Stringified numeric code, as stored by the catalog.
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub start_date: NaiveDate,
    pub created_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_covers_four_columns_in_order() {
        let rules = country_rules();
        let headers: Vec<_> = rules.rules().iter().map(|r| r.header.as_str()).collect();
        assert_eq!(headers, ["Code", "Name", "IsActive", "StartDate"]);
        assert!(rules.rules().iter().all(|r| r.required));
    }

    #[test]
    fn typed_row_from_valid_cells() {
        let cells = [
            CellValue::Int(1001),
            CellValue::Text("Singapore".to_string()),
            CellValue::Bool(true),
            CellValue::Date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        ];
        let row = CountryRow::from_cells(&cells).unwrap();
        assert_eq!(row.code, 1001);
        assert_eq!(row.name, "Singapore");
        assert!(row.is_active);
    }

    #[test]
    fn mismatched_shape_returns_none() {
        assert!(CountryRow::from_cells(&[CellValue::Empty]).is_none());
    }
}
