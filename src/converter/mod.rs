//! 时间轴核心模块
//!
//! 两条流水线共用同一个时间轴解析器与 ASS 生成器：
//!
//! - 直接路径：打点得到锚点 → [`render_ass_document`]；
//! - 识别路径：语音识别片段 + 权威歌词 → [`align_to_anchor_csv`] → 锚点表格 → [`render_ass_document`]。

pub mod generators;
pub mod parsers;
pub mod processors;
pub mod timecode;
pub mod types;
pub mod utils;

pub use types::{Anchor, ArtifactFormat, AsrSegment, Cue, LyricBlock};

use tracing::{debug, warn};

use crate::converter::{
    generators::{anchor_csv_generator::generate_anchor_csv, ass_generator::generate_ass},
    processors::{interval_resolver::resolve_cues, text_aligner::align_segments},
    types::{AlignmentOptions, AlignmentResult, AssStyleOptions, ConvertError, TimingOptions},
};

/// 把锚点解析为字幕并生成完整的 ASS 文档。
///
/// # 参数
/// * `anchors` - 有序的锚点。
/// * `timing` - 时间轴解析选项。
/// * `style` - ASS 样式选项。
/// * `title` - 文档标题，通常是歌曲标签。
///
/// # 返回
/// 成功时返回 ASS 文档内容与解析出的字幕列表。没有锚点时文档只包含头部。
pub fn render_ass_document(
    anchors: &[Anchor],
    timing: &TimingOptions,
    style: &AssStyleOptions,
    title: &str,
) -> Result<(String, Vec<Cue>), ConvertError> {
    if anchors.is_empty() {
        warn!("没有锚点，生成的文档中不会有任何字幕。");
    }

    let cues = resolve_cues(anchors, timing);
    let document = generate_ass(&cues, style, title)?;
    debug!("已为 '{}' 生成 {} 条字幕", title, cues.len());
    Ok((document, cues))
}

/// 用权威歌词替换语音识别文本，并输出与锚点表格相同格式的结果。
///
/// # 返回
/// 成功时返回对齐结果与表格内容。
pub fn align_to_anchor_csv<S: AsRef<str>>(
    segments: &[AsrSegment],
    authoritative_lines: &[S],
    options: &AlignmentOptions,
) -> Result<(AlignmentResult, String), ConvertError> {
    let result = align_segments(segments, authoritative_lines, options);
    let csv = generate_anchor_csv(&result.anchors)?;
    Ok((result, csv))
}
