//! 文本相似度算法模块，简单实现

use strsim::normalized_levenshtein;

/// 把文本规范化为用于比较的形式：
/// 转为小写、移除标点符号、折叠连续空白。
#[must_use]
pub fn normalize_for_matching(text: &str) -> String {
    let folded: String = text
        .chars()
        // 撇号直接删去，"don't" 与 "dont" 视为相同
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 比较两段已经规范化的文本，返回 `0.0..=1.0` 的相似度。
#[must_use]
pub fn similarity_normalized(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// 比较两段原始文本的相似度。
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_normalized(&normalize_for_matching(a), &normalize_for_matching(b))
}
