//! 打点表格生成器
//!
//! 输出 `timestamp,text` 表格，时间保留 3 位小数，块内换行写作 `\N`。
//! 对齐器的输出也使用同样的格式。

use std::fmt::Write;

use crate::converter::{
    types::{Anchor, ConvertError},
    utils::escape_line_breaks,
};

/// 表格的表头行
pub const ANCHOR_CSV_HEADER: &str = "timestamp,text";

/// 按需为 CSV 字段加引号。
fn quote_field(field: &str) -> String {
    if field.contains([',', '"']) || field.starts_with(' ') || field.ends_with(' ') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// 生成打点表格内容。
pub fn generate_anchor_csv(anchors: &[Anchor]) -> Result<String, ConvertError> {
    let mut output = String::with_capacity(anchors.len() * 48 + 16);
    writeln!(output, "{ANCHOR_CSV_HEADER}")?;

    for anchor in anchors {
        writeln!(
            output,
            "{:.3},{}",
            anchor.timestamp.max(0.0),
            quote_field(&escape_line_breaks(&anchor.text))
        )?;
    }

    Ok(output)
}
