//! 时间轴解析器：把有序的锚点转换为互不重叠、带淡入淡出的字幕显示区间。
//!
//! 对第 *i* 个锚点，`start = max(0, t + global_offset)`，并且不早于前一个锚点的 `start`。
//!
//! 1. 存在后继时：`end = next.start - spacing`；
//! 2. 若上一步的结果早于 `start`（两块距离比 `spacing` 还近），改用更紧的
//!    `end = next.start - overlap_buffer`；
//! 3. 最后一个锚点：`end = start + tail_duration`；
//! 4. 最终 `end = max(end, start + min_visible)`。

use tracing::{debug, warn};

use crate::converter::types::{Anchor, Cue, TimingOptions};

/// 计算所有锚点调整后的开始时间。
///
/// 乱序的锚点会被钳制到前一个开始时间，而不是被拒绝。
fn adjusted_starts(anchors: &[Anchor], options: &TimingOptions) -> Vec<f64> {
    let mut starts = Vec::with_capacity(anchors.len());
    let mut previous = 0.0_f64;

    for anchor in anchors {
        let shifted = (anchor.timestamp + options.global_offset_seconds).max(0.0);
        let start = if shifted < previous {
            warn!(
                block_index = anchor.block_index,
                timestamp = anchor.timestamp,
                "锚点早于前一个锚点，已钳制到 {previous:.3}s"
            );
            previous
        } else {
            shifted
        };
        starts.push(start);
        previous = start;
    }

    starts
}

/// 计算一条字幕的候选结束时间（钳制到最短可见时长之前）。
fn candidate_end(start: f64, next_start: Option<f64>, options: &TimingOptions) -> f64 {
    match next_start {
        Some(next) => {
            let spaced = next - options.spacing_seconds;
            if spaced < start {
                // 两块离得太近，无法留出完整的间隔
                debug!(start, next, "间隔不足，使用重叠缓冲");
                next - options.overlap_buffer_seconds
            } else {
                spaced
            }
        }
        None => start + options.tail_duration_seconds,
    }
}

/// 把有序锚点解析为字幕列表。
///
/// 输出与输入等长；空输入得到空输出，由调用方决定是否视为错误。
/// 这是一个纯函数，相同的输入总会得到完全相同的输出。
pub fn resolve_cues(anchors: &[Anchor], options: &TimingOptions) -> Vec<Cue> {
    if anchors.is_empty() {
        return Vec::new();
    }

    let starts = adjusted_starts(anchors, options);
    let min_visible = options.min_visible_seconds.max(0.0);

    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            let start = starts[i];
            let next_start = starts.get(i + 1).copied();
            let end = candidate_end(start, next_start, options).max(start + min_visible);

            Cue {
                start,
                end,
                text: anchor.text.clone(),
                fade_in_ms: options.fade_in_ms,
                fade_out_ms: options.fade_out_ms,
            }
        })
        .collect()
}
