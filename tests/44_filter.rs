use anyhow::Result;
use serde_json::json;

use shelf_bookings::filter::{Filter, FilterData, FilterError};

// The JSON filter surface used by the Postgres booking store

#[test]
fn filter_data_deserializes_where_key() -> Result<()> {
    let data: FilterData = serde_json::from_value(json!({
        "where": { "status": { "$in": ["OVERDUE", "ONGOING"] } },
        "order": "from_at asc nulls last, created_at desc",
        "limit": 20,
        "offset": 40
    }))?;

    let mut filter = Filter::new("bookings")?;
    filter.assign(data)?;
    let sql = filter.to_sql()?;

    assert_eq!(
        sql.query,
        "SELECT * FROM \"bookings\" WHERE \"status\" IN ($1, $2) \
         ORDER BY \"from_at\" ASC NULLS LAST, \"created_at\" DESC LIMIT 20 OFFSET 40"
    );
    assert_eq!(sql.params, vec![json!("OVERDUE"), json!("ONGOING")]);
    Ok(())
}

#[test]
fn count_ignores_paging() -> Result<()> {
    let mut filter = Filter::new("bookings")?;
    filter.assign(FilterData {
        where_clause: Some(json!({ "name": { "$ilike": "%kit%" } })),
        limit: Some(5),
        offset: Some(10),
        ..Default::default()
    })?;

    let count = filter.to_count_sql()?;
    assert_eq!(count.query, "SELECT COUNT(*) AS count FROM \"bookings\" WHERE \"name\" ILIKE $1");
    Ok(())
}

#[test]
fn rejects_injection_in_order() {
    let mut filter = Filter::new("bookings").expect("valid table");
    let err = filter.order(json!("created_at; DROP TABLE bookings")).err();
    assert!(matches!(err, Some(FilterError::InvalidOrder(_)) | Some(FilterError::InvalidColumn(_))));
}

#[test]
fn rejects_bad_table_name() {
    assert!(matches!(Filter::new("bookings b"), Err(FilterError::InvalidTableName(_))));
}

#[test]
fn excludes_finished_bookings_in_a_window() -> Result<()> {
    let mut filter = Filter::new("bookings")?;
    filter.assign(FilterData {
        where_clause: Some(json!({
            "from_at": { "$gte": "2024-02-01T00:00:00Z", "$lte": "2024-02-29T23:59:59Z" },
            "status": { "$nin": ["COMPLETE", "ARCHIVED"] },
            "$not": { "custodian_user_id": null }
        })),
        ..Default::default()
    })?;

    let sql = filter.to_sql()?;
    assert_eq!(
        sql.query,
        "SELECT * FROM \"bookings\" WHERE NOT (\"custodian_user_id\" IS NULL) \
         AND \"from_at\" >= $1 AND \"from_at\" <= $2 AND \"status\" NOT IN ($3, $4)"
    );
    assert_eq!(sql.params.len(), 4);
    Ok(())
}
