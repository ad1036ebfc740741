//! Five days of April 2025 sales used when no record store is reachable,
//! and by tests that want realistic data.

use chrono::NaiveDate;

use crate::money::Yen;
use crate::types::{LineItem, SalesRecord, TaxRate};

/// Returns the demo history, ascending by date.
pub fn demo_sales_history() -> Vec<SalesRecord> {
    use TaxRate::{Reduced, Standard};

    let item = |id: u32, name: &str, price: i64, qty: i64, minutes: i64, rate: TaxRate| {
        LineItem::new(id, name, Yen::new(price), rate, qty, minutes)
    };

    vec![
        record(
            "1",
            1,
            "中元",
            vec![
                item(1, "中辛", 175, 8, 25, Standard),
                item(2, "乳酸菌", 140, 12, 35, Reduced),
                item(5, "匠", 355, 5, 40, Standard),
            ],
        ),
        record(
            "2",
            2,
            "平林",
            vec![
                item(3, "てしごと（ウス丸）", 215, 10, 50, Standard),
                item(6, "てしごと本格", 415, 6, 45, Standard),
                item(9, "一本漬け（日本）", 255, 8, 30, Reduced),
            ],
        ),
        record(
            "3",
            3,
            "坂口",
            vec![
                item(4, "日本", 155, 15, 30, Reduced),
                item(7, "手作り白菜200g", 315, 7, 60, Standard),
                item(8, "本格", 405, 5, 45, Standard),
            ],
        ),
        record(
            "4",
            4,
            "木島",
            vec![
                item(10, "一本漬け（本格）", 255, 12, 40, Standard),
                item(11, "一本漬け（手）", 355, 8, 55, Standard),
                item(12, "ビニール（中辛）", 685, 4, 35, Standard),
            ],
        ),
        record(
            "5",
            5,
            "一ノ瀬",
            vec![
                item(13, "ビニール500g", 360, 10, 45, Standard),
                item(14, "330g", 275, 15, 50, Standard),
                item(15, "CGC", 275, 12, 40, Standard),
            ],
        ),
    ]
}

fn record(id: &str, day: u32, recorder: &str, items: Vec<LineItem>) -> SalesRecord {
    // April 1..=5 of 2025 always exist
    let date = NaiveDate::from_ymd_opt(2025, 4, day).unwrap_or_default();
    SalesRecord::new(id, date, recorder, items, TaxRate::Standard)
}
