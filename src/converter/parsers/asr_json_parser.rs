//! # 语音识别 JSON 解析器
//!
//! 接受 Whisper 风格的输出 `{"segments": [{"start", "end", "text"}, ...]}`，
//! 也接受直接由片段组成的 JSON 数组。

use serde::Deserialize;
use tracing::warn;

use crate::converter::{
    types::{AsrSegment, ConvertError},
    utils::normalize_text_whitespace,
};

#[derive(Debug, Deserialize)]
struct RawSegment {
    start: Option<f64>,
    end: Option<f64>,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTranscript {
    Wrapped { segments: Vec<RawSegment> },
    Bare(Vec<RawSegment>),
}

/// 解析语音识别输出为片段列表。
///
/// 缺少开始时间或时间为负数的片段会被跳过并记录警告。
/// 文本为空的片段仍然保留，它的时间可以由对齐器配上权威歌词。
/// 输出按文件中的顺序排列。
///
/// # 错误
/// 内容不是受支持的 JSON 结构时返回 `ConvertError::JsonParse`。
pub fn parse_asr_json(content: &str) -> Result<Vec<AsrSegment>, ConvertError> {
    let raw: RawTranscript = serde_json::from_str(content)
        .map_err(|e| ConvertError::json_parse(e, "语音识别片段".to_string()))?;

    let raw_segments = match raw {
        RawTranscript::Wrapped { segments } | RawTranscript::Bare(segments) => segments,
    };

    let segments = raw_segments
        .into_iter()
        .enumerate()
        .filter_map(|(i, seg)| {
            let text = normalize_text_whitespace(&seg.text);
            match seg.start {
                Some(start) if start.is_finite() && start >= 0.0 => {
                    Some(AsrSegment {
                        start,
                        end: seg.end.filter(|e| e.is_finite() && *e >= start),
                        text,
                    })
                }
                _ => {
                    warn!("跳过第 {} 个无效的语音识别片段: {:?}", i, seg);
                    None
                }
            }
        })
        .collect();

    Ok(segments)
}
