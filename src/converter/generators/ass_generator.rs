//! ASS 格式生成器

use std::fmt::Write;

use tracing::debug;

use crate::converter::{
    timecode::format_ass_time,
    types::{AssStyleOptions, ConvertError, Cue},
    utils::{escape_line_breaks, normalize_text_whitespace},
};

/// 所有对话事件使用的样式名
const STYLE_NAME: &str = "Default";

/// 构建淡入淡出标签。两个时长都为 0 时不输出标签。
fn fade_tag(cue: &Cue) -> String {
    if cue.fade_in_ms == 0 && cue.fade_out_ms == 0 {
        String::new()
    } else {
        format!(r"{{\fad({},{})}}", cue.fade_in_ms, cue.fade_out_ms)
    }
}

/// ASS 中的布尔值：-1 为真，0 为假。
fn ass_flag(value: bool) -> i8 {
    if value { -1 } else { 0 }
}

/// ASS 生成的主入口函数。
///
/// 相同的字幕列表与样式总会生成逐字节相同的内容；`title` 只出现在 `[Script Info]` 中。
/// 每条字幕对应一个 `Dialogue` 事件，块内换行被转义为 `\N`。
pub fn generate_ass(
    cues: &[Cue],
    style: &AssStyleOptions,
    title: &str,
) -> Result<String, ConvertError> {
    let mut ass_content = String::with_capacity(cues.len() * 100 + 1024);

    // --- [Script Info] 部分 ---
    writeln!(ass_content, "[Script Info]")?;
    writeln!(ass_content, "Title: {}", normalize_text_whitespace(title))?;
    writeln!(ass_content, "ScriptType: v4.00+")?;
    writeln!(ass_content, "WrapStyle: {}", style.wrap_style)?;
    writeln!(ass_content, "ScaledBorderAndShadow: yes")?;
    writeln!(ass_content, "PlayResX: {}", style.play_res_x)?;
    writeln!(ass_content, "PlayResY: {}", style.play_res_y)?;
    writeln!(ass_content)?;

    // --- [V4+ Styles] 部分 ---
    writeln!(ass_content, "[V4+ Styles]")?;
    writeln!(
        ass_content,
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding"
    )?;
    writeln!(
        ass_content,
        "Style: {STYLE_NAME},{},{},{},{},{},{},{},{},0,0,100,100,0,0,1,{},{},{},{},{},{},1",
        style.font_name,
        style.font_size,
        style.primary_colour,
        style.secondary_colour,
        style.outline_colour,
        style.back_colour,
        ass_flag(style.bold),
        ass_flag(style.italic),
        style.outline,
        style.shadow,
        style.alignment,
        style.margin_l,
        style.margin_r,
        style.margin_v,
    )?;
    writeln!(ass_content)?;

    // --- [Events] 部分 ---
    writeln!(ass_content, "[Events]")?;
    writeln!(
        ass_content,
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
    )?;

    for cue in cues {
        writeln!(
            ass_content,
            "Dialogue: 0,{},{},{STYLE_NAME},,0,0,0,,{}{}",
            format_ass_time(cue.start),
            format_ass_time(cue.end),
            fade_tag(cue),
            escape_line_breaks(&cue.text)
        )?;
    }

    debug!("生成了 {} 条 ASS 对话事件", cues.len());

    Ok(ass_content)
}
