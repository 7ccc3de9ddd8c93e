use anyhow::Result;
use serde_json::json;
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

use vip_orders_etl::app::extract_use_case::{transform, ExtractUseCase};
use vip_orders_etl::config::InputConfig;
use vip_orders_etl::domain::RawCustomer;
use vip_orders_etl::infra::CsvTableWriter;
use vip_orders_etl::pipeline::ingestion::load_vip_ids;
use vip_orders_etl::pipeline::processing::finalize;
use vip_orders_etl::pipeline::processing::quality_gate::QualityIssueKind;

fn fixture() -> serde_json::Value {
    json!([
        {
            "id": "12",
            "name": " Lin ",
            "registration_date": "2021-07-19",
            "orders": [
                {
                    "order_id": 301,
                    "order_date": "2023-05-01",
                    "order_total_value": 100.0,
                    "items": [
                        { "item_id": 2, "product_name": "Lamp", "category": 4, "price": " $40.00", "quantity": "2" },
                        { "item_id": 1, "product_name": "Shirt", "category": "APPAREL ", "price": "$20", "quantity": 1 },
                        { "item_id": 5, "product_name": "Broken", "category": 1, "price": "n/a", "quantity": 5 }
                    ]
                },
                {
                    "order_id": "oops",
                    "order_date": "whenever",
                    "order_total_value": null,
                    "items": [
                        { "item_id": "8", "product_name": "Mystery", "category": 99, "price": "$1.50", "quantity": 0 }
                    ]
                }
            ]
        },
        {
            "id": 7,
            "name": "Sam",
            "registration_date": "not a date",
            "orders": [
                {
                    "order_id": 150,
                    "order_total_value": -30,
                    "items": [
                        { "item_id": "abc", "product_name": "Dropped", "category": 3, "price": 2, "quantity": 1 },
                        { "item_id": 4, "product_name": "Novel", "category": "books", "price": "$-3", "quantity": 2 },
                        { "item_id": 6, "category": 3, "price": 9, "quantity": 1 }
                    ]
                }
            ]
        }
    ])
}

fn customers() -> Vec<RawCustomer> {
    serde_json::from_value(fixture()).unwrap()
}

#[test]
fn test_final_table_invariants() -> Result<()> {
    let vip = load_vip_ids(Cursor::new("7\n  12 \nabc\n-3\n"));
    let (table, stats) = transform(&customers(), &vip)?;

    assert_eq!(stats.items, 7);
    assert_eq!(stats.dropped_missing_product_id, 1);
    assert_eq!(stats.dropped_zero_price, 1);

    // Unnamed item 6 is dropped at the final stage
    assert_eq!(table.rows.len(), 4);

    for row in &table.rows {
        assert_eq!(row.total_item_price, row.unit_price * row.item_quantity as f64);
        assert!(row.product_id.is_some());
        assert!(row.order_id.is_some());
        assert!(row.product_name.as_deref().is_some_and(|n| !n.is_empty()));
        assert!(row.is_vip, "every customer in the fixture is a VIP");
    }

    let keys: Vec<_> = table.rows.iter().map(|r| r.sort_key()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    assert_eq!(
        keys,
        vec![
            (Some(7), Some(150), Some(4)),
            (Some(12), Some(0), Some(8)),
            (Some(12), Some(301), Some(1)),
            (Some(12), Some(301), Some(2)),
        ]
    );
    Ok(())
}

#[test]
fn test_derived_metrics_and_categories() -> Result<()> {
    let vip = load_vip_ids(Cursor::new(""));
    let (table, _) = transform(&customers(), &vip)?;

    let lamp = table.rows.iter().find(|r| r.product_id == Some(2)).unwrap();
    assert_eq!(lamp.category, "Home Goods");
    assert_eq!(lamp.total_item_price, 80.0);
    assert_eq!(lamp.total_order_value_percentage, 0.8);
    assert!(!lamp.is_vip);

    let shirt = table.rows.iter().find(|r| r.product_id == Some(1)).unwrap();
    assert_eq!(shirt.category, "Apparel");

    let mystery = table.rows.iter().find(|r| r.product_id == Some(8)).unwrap();
    assert_eq!(mystery.category, "Misc");
    assert_eq!(mystery.order_id, Some(0));
    assert_eq!(mystery.order_date, None);
    assert_eq!(mystery.total_order_value_percentage, 0.0);

    // Negative order total: percentage pinned to zero
    let novel = table.rows.iter().find(|r| r.product_id == Some(4)).unwrap();
    assert_eq!(novel.total_item_price, -6.0);
    assert_eq!(novel.total_order_value_percentage, 0.0);
    assert_eq!(novel.registration_date, None);
    Ok(())
}

#[test]
fn test_diagnostics_do_not_change_rows() -> Result<()> {
    let vip = load_vip_ids(Cursor::new("12\n"));
    let (table, _) = transform(&customers(), &vip)?;
    let d = &table.diagnostics;

    // Computed before the final drop, so the unnamed row is counted
    assert_eq!(d.count(QualityIssueKind::MissingRegistrationDate), 2);
    assert_eq!(d.count(QualityIssueKind::NonPositivePriceOrQuantity), 2);
    assert_eq!(d.count(QualityIssueKind::NegativeOrderPercentage), 0);
    assert_eq!(d.count(QualityIssueKind::ZeroTotalWithQuantity), 0);

    let refinalized = finalize(table.rows.clone())?;
    assert_eq!(refinalized.rows, table.rows);
    Ok(())
}

#[test]
fn test_end_to_end_csv_export() -> Result<()> {
    let dir = tempdir()?;
    let orders_path = dir.path().join("customer_orders.json");
    let vip_path = dir.path().join("vip_customers.txt");
    let output_path = dir.path().join("out").join("customer_data_cleaned_vip.csv");
    fs::write(&orders_path, fixture().to_string())?;
    fs::write(&vip_path, "12\n")?;

    let use_case = ExtractUseCase::new(Box::new(CsvTableWriter::new(&output_path)));
    let result = use_case.run(&InputConfig { orders_path, vip_path })?;

    assert_eq!(result.table.rows.len(), 4);

    let content = fs::read_to_string(&output_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("customer_id,customer_name,registration_date,is_vip,"));
    assert_eq!(lines[1], "7,Sam,,false,150,,4,Novel,Books,-3.0,2,-6.0,0.0");
    assert_eq!(lines[4], "12,Lin,2021-07-19,true,301,2023-05-01,2,Lamp,Home Goods,40.0,2,80.0,0.8");
    Ok(())
}

#[test]
fn test_absent_customer_id_is_fatal() {
    let bad: Vec<RawCustomer> = serde_json::from_value(json!([
        { "id": "anon", "orders": [{ "order_id": 1, "items": [
            { "item_id": 1, "product_name": "Thing", "price": 1, "quantity": 1 }
        ]}]}
    ]))
    .unwrap();

    let result = transform(&bad, &load_vip_ids(Cursor::new("")));

    assert!(result.is_err());
}
