//! Text pushed to the shared chat after a daily entry is saved.

use crate::types::SalesRecord;

/// Renders the post-save broadcast message.
///
/// ```text
/// 【本日の売上（税抜）】¥4,855
/// 作成者：中元
/// 作った商品：
/// ・中辛 x 8個
/// ・乳酸菌 x 12個
/// ```
///
/// The headline figure is the tax-excluded subtotal.
pub fn save_notification_text(record: &SalesRecord) -> String {
    let products: Vec<String> = record
        .line_items
        .iter()
        .map(|item| format!("・{} x {}個", item.name, item.quantity))
        .collect();

    format!(
        "【本日の売上（税抜）】{}\n作成者：{}\n作った商品：\n{}",
        record.subtotal,
        record.recorder,
        products.join("\n")
    )
}
