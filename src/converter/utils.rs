//! 包含一些工具函数的模块。

use crate::converter::types::{Anchor, LyricBlock};

/// 文件中表示块内换行的两字符转义序列。
pub const LINE_BREAK_ESCAPE: &str = r"\N";

/// 对锚点向量应用一个时间偏移。
///
/// 此函数会就地修改传入的锚点，偏移后的时间戳不会小于 0。
///
/// # 参数
/// * `anchors` - 一个可变的 `Anchor` 切片。
/// * `offset_seconds` - 要应用的偏移量（秒）。正数表示延迟歌词，负数表示提前歌词。
pub fn apply_offset(anchors: &mut [Anchor], offset_seconds: f64) {
    if offset_seconds == 0.0 {
        return;
    }

    for anchor in anchors.iter_mut() {
        anchor.timestamp = (anchor.timestamp + offset_seconds).max(0.0);
    }
}

/// 把歌词块和按块序号给出的时间戳组合为锚点。
///
/// 时间戳数量少于块数量时，只为前面的块生成锚点。
pub fn anchors_from_blocks(blocks: &[LyricBlock], timestamps: &[f64]) -> Vec<Anchor> {
    blocks
        .iter()
        .zip(timestamps)
        .map(|(block, &timestamp)| Anchor::new(block.index, timestamp, block.text.clone()))
        .collect()
}

/// 把文本中的换行转换为两字符的 `\N` 转义序列。
pub fn escape_line_breaks(text: &str) -> String {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect::<Vec<_>>()
        .join(LINE_BREAK_ESCAPE)
}

/// 把 `\N`（以及历史上出现过的 `\n` 字面量）还原为真正的换行。
pub fn unescape_line_breaks(text: &str) -> String {
    text.replace(LINE_BREAK_ESCAPE, "\n").replace(r"\n", "\n")
}

/// 规范化文本中的空白字符
pub fn normalize_text_whitespace(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// 规范化块文本：每个物理行内部的空白被折叠，空行被丢弃，行之间以 `'\n'` 连接。
pub fn normalize_block_text(text: &str) -> String {
    text.lines()
        .map(normalize_text_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
