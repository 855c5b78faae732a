//! Nested-loop equality joins.
//!
//! Every left row is compared with every right row, O(|left|·|right|).
//! A merged row is the left row overlaid by the right row, so right-hand
//! values win on a column-name collision.

use serde::{Deserialize, Serialize};
use tabula_core::prelude::{Error, Result, Row};

/// `left` names a column of the accumulated result, `right` a column of
/// the table being joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub left: String,
    pub right: String,
}

impl JoinCondition {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl<L: Into<String>, R: Into<String>> From<(L, R)> for JoinCondition {
    fn from((left, right): (L, R)) -> Self {
        Self::new(left, right)
    }
}

/// Binary join with direct field access: comparing a row that lacks its
/// join field is an error (`MissingField`). Nothing is compared, and so
/// nothing can fail, when either side is empty.
pub fn nested_loop_join(
    left: &[Row],
    right: &[Row],
    left_field: &str,
    right_field: &str,
) -> Result<Vec<Row>> {
    let mut out = Vec::new();
    for l in left {
        for r in right {
            let lv = l
                .get(left_field)
                .ok_or_else(|| Error::MissingField(left_field.to_string()))?;
            let rv = r
                .get(right_field)
                .ok_or_else(|| Error::MissingField(right_field.to_string()))?;
            if lv == rv {
                out.push(l.merged_with(r));
            }
        }
    }
    Ok(out)
}

/// Join that tolerates missing fields: a row lacking either join field
/// never matches.
pub fn tolerant_join(left: &[Row], right: &[Row], cond: &JoinCondition) -> Vec<Row> {
    let mut out = Vec::new();
    for l in left {
        let Some(lv) = l.get(&cond.left) else {
            continue;
        };
        for r in right {
            if r.get(&cond.right) == Some(lv) {
                out.push(l.merged_with(r));
            }
        }
    }
    out
}

/// Left-deep chain: start from `seed`, then join each `(rows, condition)`
/// step into the accumulated result with `tolerant_join`.
pub fn chain_join(seed: &[Row], steps: &[(&[Row], &JoinCondition)]) -> Vec<Row> {
    let mut result = seed.to_vec();
    for (rows, cond) in steps {
        result = tolerant_join(&result, rows, cond);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().copied().collect()
    }

    fn employees() -> Vec<Row> {
        vec![
            row(&[("e_id", "1"), ("department_id", "201"), ("name", "John")]),
            row(&[("e_id", "2"), ("department_id", "202"), ("name", "Emily")]),
        ]
    }

    fn departments() -> Vec<Row> {
        vec![
            row(&[("d_id", "201"), ("department_name", "Accounting")]),
            row(&[("d_id", "202"), ("department_name", "Legal_Department")]),
        ]
    }

    fn goods() -> Vec<Row> {
        vec![
            row(&[("g_id", "1"), ("product_name", "Product_A"), ("employee_id", "1")]),
            row(&[("g_id", "2"), ("product_name", "Product_B"), ("employee_id", "2")]),
        ]
    }

    #[test]
    fn test_join_counts_matching_pairs() {
        let mut depts = departments();
        depts.push(row(&[("d_id", "201"), ("department_name", "Audit")]));
        let out = nested_loop_join(&employees(), &depts, "department_id", "d_id").unwrap();
        // John matches 201 twice, Emily matches 202 once.
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].get("department_name"), Some("Accounting"));
        assert_eq!(out[1].get("department_name"), Some("Audit"));
        assert_eq!(out[2].get("name"), Some("Emily"));
    }

    #[test]
    fn test_right_overrides_left() {
        let left = vec![row(&[("id", "1"), ("name", "left")])];
        let right = vec![row(&[("id", "1"), ("name", "right")])];
        let out = nested_loop_join(&left, &right, "id", "id").unwrap();
        assert_eq!(out[0].get("name"), Some("right"));
        assert_eq!(out[0].len(), 2);
    }

    #[test]
    fn test_strict_join_missing_field_errors() {
        let err = nested_loop_join(&employees(), &departments(), "dept", "d_id").unwrap_err();
        assert!(matches!(err, Error::MissingField(f) if f == "dept"));

        // No comparison happens against an empty side.
        let out = nested_loop_join(&employees(), &[], "dept", "d_id").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_tolerant_join_skips_missing_fields() {
        let mut left = employees();
        left.push(row(&[("name", "NoDept")]));
        let right = vec![row(&[("department_name", "Nowhere")])];
        let cond = JoinCondition::new("department_id", "d_id");
        // Neither side has a usable key; absent never equals absent.
        assert!(tolerant_join(&left, &right, &cond).is_empty());
        assert_eq!(tolerant_join(&left, &departments(), &cond).len(), 2);
    }

    #[test]
    fn test_chain_join_three_tables() {
        let depts = departments();
        let goods = goods();
        let c1 = JoinCondition::from(("department_id", "d_id"));
        let c2 = JoinCondition::from(("e_id", "employee_id"));
        let steps: [(&[Row], &JoinCondition); 2] =
            [(depts.as_slice(), &c1), (goods.as_slice(), &c2)];
        let out = chain_join(&employees(), &steps);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("product_name"), Some("Product_A"));
        assert_eq!(out[1].get("department_name"), Some("Legal_Department"));
        assert_eq!(out[1].get("name"), Some("Emily"));
    }

    #[test]
    fn test_chain_join_no_steps_returns_seed() {
        let out = chain_join(&employees(), &[]);
        assert_eq!(out, employees());
    }
}
