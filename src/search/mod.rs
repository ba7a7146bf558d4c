//! 在候选歌词行中查找与给定文本最相似的一行。

pub mod matcher;

use tracing::trace;

/// 一个候选行的比较结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// 候选行在原始序列中的序号。
    pub index: usize,
    /// 与查询文本的相似度。
    pub score: f64,
}

/// 在一组已经规范化的候选行中查找与查询最相似的一个。
///
/// # 参数
/// * `normalized_query` - 经过 [`matcher::normalize_for_matching`] 处理的查询文本。
/// * `candidates` - `(序号, 规范化文本)` 的迭代器，通常只包含尚未被消费的行。
///
/// # 返回
/// 分数最高的候选；分数相同时取序号最靠前（最先出现）的一个。没有候选时返回 `None`。
pub fn find_best_candidate<'a, I>(normalized_query: &str, candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let mut best: Option<Candidate> = None;

    for (index, normalized_line) in candidates {
        let score = matcher::similarity_normalized(normalized_query, normalized_line);
        trace!(index, score, "候选行比较");
        if best.is_none_or(|b| score > b.score) {
            best = Some(Candidate { index, score });
        }
    }

    best
}
