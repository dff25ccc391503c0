use serde_json::Value;

use super::error::FilterError;
use super::types::{is_valid_identifier, quote_identifier, FilterOp};

/// Translates a JSON where-object into a parameterized SQL predicate.
///
/// `{ "organization_id": "…", "status": { "$in": ["DRAFT"] }, "$or": [ … ] }`
/// becomes `"organization_id" = $1 AND "status" IN ($2) AND (…)`.
pub struct FilterWhere {
    param_values: Vec<Value>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self { param_values: vec![] }
    }

    /// Returns the predicate ("1=1" when there are no conditions) and its parameters
    pub fn generate(where_data: &Value) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new();
        let sql = filter_where.build_group(where_data)?;
        Ok((sql.unwrap_or_else(|| "1=1".to_string()), filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn build_group(&mut self, where_data: &Value) -> Result<Option<String>, FilterError> {
        let obj = match where_data {
            Value::Null => return Ok(None),
            Value::Object(obj) => obj,
            _ => return Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        };

        let mut parts = Vec::new();
        for (key, value) in obj {
            let part = if key.starts_with('$') {
                self.build_logical(key, value)?
            } else {
                self.build_field(key, value)?
            };
            parts.extend(part);
        }

        Ok(match parts.len() {
            0 => None,
            _ => Some(parts.join(" AND ")),
        })
    }

    fn build_logical(&mut self, op: &str, value: &Value) -> Result<Option<String>, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let mut sql_parts = Vec::new();
                for v in arr {
                    if let Some(sql) = self.build_group(v)? {
                        sql_parts.push(format!("({})", sql));
                    }
                }
                if sql_parts.is_empty() {
                    // An empty $or matches nothing, an empty $and matches everything
                    return Ok(if op == "$or" { Some("1=0".to_string()) } else { None });
                }
                let joiner = if op == "$and" { " AND " } else { " OR " };
                Ok(Some(format!("({})", sql_parts.join(joiner))))
            }
            "$not" => Ok(self.build_group(value)?.map(|sql| format!("NOT ({})", sql))),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn build_field(&mut self, field: &str, value: &Value) -> Result<Option<String>, FilterError> {
        if !is_valid_identifier(field) {
            return Err(FilterError::InvalidColumn(field.to_string()));
        }

        match value {
            Value::Object(obj) if obj.keys().all(|k| k.starts_with('$')) => {
                let mut parts = Vec::new();
                for (op_key, op_val) in obj {
                    let operator = FilterOp::from_key(op_key)
                        .ok_or_else(|| FilterError::UnsupportedOperator(op_key.clone()))?;
                    parts.push(self.build_condition(field, operator, op_val)?);
                }
                Ok(match parts.len() {
                    0 => None,
                    _ => Some(parts.join(" AND ")),
                })
            }
            // Implicit equality: { field: value }
            _ => Ok(Some(self.build_condition(field, FilterOp::Eq, value)?)),
        }
    }

    fn build_condition(&mut self, field: &str, operator: FilterOp, data: &Value) -> Result<String, FilterError> {
        let column = quote_identifier(field);
        let sql = match operator {
            FilterOp::Eq if data.is_null() => format!("{} IS NULL", column),
            FilterOp::Ne if data.is_null() => format!("{} IS NOT NULL", column),
            FilterOp::Eq => format!("{} = {}", column, self.param(data)),
            FilterOp::Ne => format!("{} <> {}", column, self.param(data)),
            FilterOp::Gt => format!("{} > {}", column, self.param(data)),
            FilterOp::Gte => format!("{} >= {}", column, self.param(data)),
            FilterOp::Lt => format!("{} < {}", column, self.param(data)),
            FilterOp::Lte => format!("{} <= {}", column, self.param(data)),
            FilterOp::Like => format!("{} LIKE {}", column, self.string_param(data, "$like")?),
            FilterOp::ILike => format!("{} ILIKE {}", column, self.string_param(data, "$ilike")?),
            FilterOp::In | FilterOp::NIn => {
                let values = data.as_array().ok_or_else(|| {
                    FilterError::InvalidOperatorData("$in/$nin requires an array".to_string())
                })?;
                if values.is_empty() {
                    return Ok(if operator == FilterOp::In { "1=0" } else { "1=1" }.to_string());
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v)).collect();
                let keyword = if operator == FilterOp::In { "IN" } else { "NOT IN" };
                format!("{} {} ({})", column, keyword, params.join(", "))
            }
        };
        Ok(sql)
    }

    fn string_param(&mut self, data: &Value, op: &str) -> Result<String, FilterError> {
        if !data.is_string() {
            return Err(FilterError::InvalidOperatorData(format!("{} requires a string pattern", op)));
        }
        Ok(self.param(data))
    }

    fn param(&mut self, value: &Value) -> String {
        self.param_values.push(value.clone());
        format!("${}", self.param_values.len())
    }
}

impl Default for FilterWhere {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_where_matches_everything() {
        let (sql, params) = FilterWhere::generate(&json!({})).unwrap();
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn numbers_placeholders_in_order() {
        let (sql, params) = FilterWhere::generate(&json!({
            "organization_id": "org",
            "status": { "$in": ["DRAFT", "RESERVED"] }
        }))
        .unwrap();
        assert_eq!(sql, "\"organization_id\" = $1 AND \"status\" IN ($2, $3)");
        assert_eq!(params, vec![json!("org"), json!("DRAFT"), json!("RESERVED")]);
    }

    #[test]
    fn nested_logical_groups_share_parameter_numbering() {
        let (sql, params) = FilterWhere::generate(&json!({
            "organization_id": "org",
            "$or": [ { "name": { "$ilike": "%a%" } }, { "custodian_user_id": null } ]
        }))
        .unwrap();
        // Map keys are sorted, so the "$or" group comes first
        assert_eq!(
            sql,
            "((\"name\" ILIKE $1) OR (\"custodian_user_id\" IS NULL)) AND \"organization_id\" = $2"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn empty_in_matches_nothing() {
        let (sql, _) = FilterWhere::generate(&json!({ "status": { "$in": [] } })).unwrap();
        assert_eq!(sql, "1=0");
    }

    #[test]
    fn range_operators() {
        let (sql, params) = FilterWhere::generate(&json!({
            "from_at": { "$gte": "2024-02-01T00:00:00Z", "$lt": "2024-03-01T00:00:00Z" }
        }))
        .unwrap();
        assert_eq!(sql, "\"from_at\" >= $1 AND \"from_at\" < $2");
        assert_eq!(params.len(), 2);

        let (sql, _) = FilterWhere::generate(&json!({ "created_at": { "$gt": 1, "$lte": 2 } })).unwrap();
        assert_eq!(sql, "\"created_at\" > $1 AND \"created_at\" <= $2");
    }

    #[test]
    fn negated_operators() {
        let (sql, params) = FilterWhere::generate(&json!({ "status": { "$ne": "DRAFT" } })).unwrap();
        assert_eq!(sql, "\"status\" <> $1");
        assert_eq!(params, vec![json!("DRAFT")]);

        let (sql, params) = FilterWhere::generate(&json!({ "to_at": { "$ne": null } })).unwrap();
        assert_eq!(sql, "\"to_at\" IS NOT NULL");
        assert!(params.is_empty());

        let (sql, params) = FilterWhere::generate(&json!({ "status": { "$nin": ["ARCHIVED", "CANCELLED"] } })).unwrap();
        assert_eq!(sql, "\"status\" NOT IN ($1, $2)");
        assert_eq!(params.len(), 2);

        let (sql, _) = FilterWhere::generate(&json!({ "status": { "$nin": [] } })).unwrap();
        assert_eq!(sql, "1=1");

        let (sql, params) = FilterWhere::generate(&json!({ "$not": { "status": "DRAFT" } })).unwrap();
        assert_eq!(sql, "NOT (\"status\" = $1)");
        assert_eq!(params, vec![json!("DRAFT")]);
    }

    #[test]
    fn rejects_unsafe_column_names() {
        let err = FilterWhere::generate(&json!({ "name\"; DROP TABLE bookings; --": 1 })).unwrap_err();
        assert!(matches!(err, FilterError::InvalidColumn(_)));
    }

    #[test]
    fn rejects_unknown_operator() {
        let err = FilterWhere::generate(&json!({ "name": { "$regex": "x" } })).unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedOperator(_)));
    }
}
