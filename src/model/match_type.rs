//! 定义了文本对齐中用于描述配对方式和匹配程度的数据结构。

use serde::{Deserialize, Serialize};

/// 一个语音识别片段是如何得到最终文本的。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    /// 相似度达到阈值，使用了最相似的权威歌词行。
    Similar,
    /// 没有足够相似的行，按阅读顺序使用了下一条未被消费的行。
    InOrder,
    /// 权威歌词已全部被消费，保留了识别出的原始文本。
    Unmatched,
}

impl MatchKind {
    /// 此配对是否使用了权威歌词文本。
    #[must_use]
    pub fn uses_authoritative_text(self) -> bool {
        !matches!(self, MatchKind::Unmatched)
    }
}

/// 相似度分数的粗略分级，用于日志与报告。
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SimilarityLevel {
    /// 完全不相似
    #[default]
    NoMatch,
    /// 低
    Low,
    /// 中
    Medium,
    /// 高
    High,
    /// 很高
    VeryHigh,
    /// 规范化后完全相同
    Perfect,
}

impl SimilarityLevel {
    /// 把 `0.0..=1.0` 的相似度映射到分级。
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 1.0 => SimilarityLevel::Perfect,
            s if s >= 0.9 => SimilarityLevel::VeryHigh,
            s if s >= 0.75 => SimilarityLevel::High,
            s if s >= 0.5 => SimilarityLevel::Medium,
            s if s > 0.0 => SimilarityLevel::Low,
            _ => SimilarityLevel::NoMatch,
        }
    }
}
