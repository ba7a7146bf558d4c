//! 文本对齐器：把时间准确但文本有误的语音识别结果，与文本准确但没有时间的权威歌词合并。
//!
//! 对每个语音识别片段（按原始顺序），与所有**尚未被消费**的权威歌词行比较规范化相似度，
//! 取分数最高的一行：
//!
//! - 分数不低于 `min_similarity` 时消费该行，使用片段的时间戳；
//! - 否则按阅读顺序消费下一条未被消费的行；
//! - 若权威歌词已全部被消费，则保留片段原来的文本。
//!
//! 这是一种贪心的、保持顺序的局部最优分配，复杂度为 `O(片段数 × 剩余行数)`，
//! 已被消费的行不会被重新分配，即使后面的片段与它更相似。

use tracing::{debug, info, warn};

use crate::{
    converter::types::{AlignmentOptions, AlignmentPair, AlignmentResult, Anchor, AsrSegment},
    model::match_type::{MatchKind, SimilarityLevel},
    search::{find_best_candidate, matcher},
};

/// 一行尚未被消费的权威歌词。
struct PendingLine<'a> {
    index: usize,
    text: &'a str,
    normalized: String,
}

/// 将语音识别片段与权威歌词对齐。
///
/// # 参数
/// * `segments` - 按时间排序的语音识别片段。
/// * `authoritative_lines` - 按阅读顺序排列的权威歌词行。
/// * `options` - 对齐选项。
///
/// # 返回
/// 输出的锚点数量总是等于片段数量；每一行权威歌词最多被使用一次。
/// 没有权威歌词时，结果就是识别文本本身。
pub fn align_segments<S: AsRef<str>>(
    segments: &[AsrSegment],
    authoritative_lines: &[S],
    options: &AlignmentOptions,
) -> AlignmentResult {
    // 按原始顺序保存，`remove` 之后第一个元素总是下一条未被消费的行
    let mut pending: Vec<PendingLine<'_>> = authoritative_lines
        .iter()
        .enumerate()
        .map(|(index, line)| PendingLine {
            index,
            text: line.as_ref(),
            normalized: matcher::normalize_for_matching(line.as_ref()),
        })
        .collect();

    let mut result = AlignmentResult {
        anchors: Vec::with_capacity(segments.len()),
        pairs: Vec::with_capacity(segments.len()),
    };

    for (segment_index, segment) in segments.iter().enumerate() {
        let normalized_segment = matcher::normalize_for_matching(&segment.text);

        let best = find_best_candidate(
            &normalized_segment,
            pending
                .iter()
                .enumerate()
                .map(|(position, line)| (position, line.normalized.as_str())),
        );

        let (position, score, kind) = match best {
            Some(candidate) if candidate.score >= options.min_similarity => {
                (Some(candidate.index), candidate.score, MatchKind::Similar)
            }
            Some(candidate) => {
                // 第一个待处理行就是阅读顺序中的下一行
                let fallback_score =
                    matcher::similarity_normalized(&normalized_segment, &pending[0].normalized);
                debug!(
                    segment_index,
                    best_score = candidate.score,
                    "没有足够相似的歌词行，按顺序使用下一行"
                );
                (Some(0), fallback_score, MatchKind::InOrder)
            }
            None => (None, 0.0, MatchKind::Unmatched),
        };

        let (line_index, text) = match position {
            Some(position) => {
                let line = pending.remove(position);
                (Some(line.index), line.text.to_string())
            }
            None => {
                warn!(segment_index, "权威歌词已用尽，保留识别文本");
                (None, segment.text.clone())
            }
        };

        debug!(
            segment_index,
            ?line_index,
            score,
            level = ?SimilarityLevel::from_score(score),
            ?kind,
            "片段对齐完成"
        );

        result
            .anchors
            .push(Anchor::new(segment_index, segment.start, text));
        result.pairs.push(AlignmentPair {
            segment_index,
            line_index,
            score,
            kind,
        });
    }

    let matched = result
        .pairs
        .iter()
        .filter(|p| p.kind == MatchKind::Similar)
        .count();
    info!(
        "对齐完成：{} 个片段，{} 个相似匹配，{} 行权威歌词未被使用。",
        segments.len(),
        matched,
        pending.len()
    );

    result
}
