//! ASS 格式解析器
//!
//! 只读取 `[Events]` 部分中的 `Dialogue` 行，用于校验或重新导入生成的字幕。

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

use crate::converter::{
    timecode::parse_time_token,
    types::{ConvertError, ParsedDialogue},
    utils::unescape_line_breaks,
};

/// 用于解析ASS文件中 [Events] 部分的 Dialogue 或 Comment 行
static ASS_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<Type>Comment|Dialogue):\s*",       // 行类型
        r"(?P<Layer>\d+)\s*,",                    // Layer
        r"(?P<Start>\d+:\d{2}:\d{2}\.\d{2})\s*,", // 开始时间
        r"(?P<End>\d+:\d{2}:\d{2}\.\d{2})\s*,",   // 结束时间
        r"(?P<Style>[^,]*?)\s*,",                 // 样式
        r"(?P<Actor>[^,]*?)\s*,",                 // 角色
        r"[^,]*,[^,]*,[^,]*,",                    // 忽略 MarginL, MarginR, MarginV
        r"(?P<Effect>[^,]*?)\s*,",                // 特效
        r"(?P<Text>.*?)\s*$"                      // 文本内容
    ))
    .expect("编译 ASS_LINE_REGEX 失败")
});

/// 用于解析文本开头的淡入淡出标签 `{\fad(入,出)}`
static FADE_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\\fad\((?P<in>\d+)\s*,\s*(?P<out>\d+)\)\}").expect("编译 FADE_TAG_REGEX 失败")
});

/// 解析 ASS 内容中的所有对话事件。
///
/// 无法识别的事件行会被跳过并记录警告。
///
/// # 错误
/// 文件中没有 `[Events]` 部分时返回 `ConvertError::InvalidFormat`。
pub fn parse_ass_dialogues(content: &str) -> Result<Vec<ParsedDialogue>, ConvertError> {
    let mut dialogues = Vec::new();
    let mut in_events_section = false;
    let mut found_events_section = false;

    for (line_num_zero_based, line_str_raw) in content.lines().enumerate() {
        let line_num = line_num_zero_based + 1;
        let line_str = line_str_raw.trim();

        if line_str.starts_with('[') && line_str.ends_with(']') {
            in_events_section = line_str.eq_ignore_ascii_case("[Events]");
            found_events_section |= in_events_section;
            continue;
        }

        if !in_events_section || line_str.is_empty() || line_str.starts_with("Format:") {
            continue;
        }

        let Some(caps) = ASS_LINE_REGEX.captures(line_str) else {
            warn!("第 {} 行: 格式与预期的 ASS 事件格式不匹配，已跳过。", line_num);
            continue;
        };

        if &caps["Type"] != "Dialogue" {
            continue;
        }

        let (start, end) = match (
            parse_time_token(&caps["Start"]),
            parse_time_token(&caps["End"]),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(e), _) | (_, Err(e)) => {
                warn!("第 {} 行: 时间无效 ({})，已跳过。", line_num, e);
                continue;
            }
        };
        let raw_text = &caps["Text"];

        let (fade, text_body) = match FADE_TAG_REGEX.captures(raw_text) {
            Some(fade_caps) => {
                let fade_in: u32 = fade_caps["in"].parse()?;
                let fade_out: u32 = fade_caps["out"].parse()?;
                let tag_len = fade_caps.get(0).map_or(0, |m| m.end());
                (Some((fade_in, fade_out)), &raw_text[tag_len..])
            }
            None => (None, raw_text),
        };

        dialogues.push(ParsedDialogue {
            start,
            end,
            style: caps["Style"].to_string(),
            text: unescape_line_breaks(text_body),
            fade,
        });
    }

    if !found_events_section {
        return Err(ConvertError::InvalidFormat(
            "ASS 内容中缺少 [Events] 部分".to_string(),
        ));
    }

    Ok(dialogues)
}
