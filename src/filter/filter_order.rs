use serde_json::Value;

use super::error::FilterError;
use super::types::{is_valid_identifier, quote_identifier, FilterOrderInfo, NullsPosition, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Accepts `"from_at asc nulls last, created_at desc"`, an array of such
    /// strings, or an object `{ "created_at": "desc" }`.
    pub fn validate_and_parse(order: &Value) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let infos = match order {
            Value::Null => vec![],
            Value::String(s) => Self::parse_order_string(s)?,
            Value::Array(arr) => {
                let mut out = Vec::new();
                for v in arr {
                    match v {
                        Value::String(s) => out.extend(Self::parse_order_string(s)?),
                        other => {
                            return Err(FilterError::InvalidOrder(format!("unexpected order entry: {}", other)))
                        }
                    }
                }
                out
            }
            Value::Object(obj) => {
                let mut out = Vec::new();
                for (k, v) in obj {
                    let spec = format!("{} {}", k, v.as_str().unwrap_or("asc"));
                    out.extend(Self::parse_order_string(&spec)?);
                }
                out
            }
            other => return Err(FilterError::InvalidOrder(format!("unexpected order value: {}", other))),
        };
        Ok(infos)
    }

    fn parse_order_string(s: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let tokens: Vec<String> = part.split_whitespace().map(|t| t.to_ascii_lowercase()).collect();
            let Some(column) = part.split_whitespace().next() else { continue };
            if !is_valid_identifier(column) {
                return Err(FilterError::InvalidColumn(column.to_string()));
            }

            let rest: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
            let (sort, nulls) = match rest.as_slice() {
                [] | ["asc"] => (SortDirection::Asc, None),
                ["desc"] => (SortDirection::Desc, None),
                ["nulls", "first"] => (SortDirection::Asc, Some(NullsPosition::First)),
                ["nulls", "last"] => (SortDirection::Asc, Some(NullsPosition::Last)),
                [dir, "nulls", pos] => {
                    let sort = match *dir {
                        "asc" => SortDirection::Asc,
                        "desc" => SortDirection::Desc,
                        _ => return Err(FilterError::InvalidOrder(part.trim().to_string())),
                    };
                    let nulls = match *pos {
                        "first" => NullsPosition::First,
                        "last" => NullsPosition::Last,
                        _ => return Err(FilterError::InvalidOrder(part.trim().to_string())),
                    };
                    (sort, Some(nulls))
                }
                _ => return Err(FilterError::InvalidOrder(part.trim().to_string())),
            };

            out.push(FilterOrderInfo { column: column.to_string(), sort, nulls });
        }
        Ok(out)
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| {
                let nulls = match i.nulls {
                    Some(NullsPosition::First) => " NULLS FIRST",
                    Some(NullsPosition::Last) => " NULLS LAST",
                    None => "",
                };
                format!("{} {}{}", quote_identifier(&i.column), i.sort.to_sql(), nulls)
            })
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_direction_and_nulls() {
        let infos = FilterOrder::validate_and_parse(&json!("from_at asc nulls last, created_at DESC")).unwrap();
        assert_eq!(
            FilterOrder::generate(&infos),
            "ORDER BY \"from_at\" ASC NULLS LAST, \"created_at\" DESC"
        );
    }

    #[test]
    fn rejects_garbage_direction() {
        assert!(FilterOrder::validate_and_parse(&json!("name sideways")).is_err());
    }

    #[test]
    fn rejects_injection_in_column() {
        assert!(FilterOrder::validate_and_parse(&json!("name;drop asc")).is_err());
    }
}
