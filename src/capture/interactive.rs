//! 基于行输入的交互式打点驱动。
//!
//! 读取操作者输入的每一行：
//!
//! - 空行或无法识别的输入：打点并前进（误按的键不会丢失一次打点）；
//! - `u`：撤销上一次打点；
//! - `q`：中止；
//! - 输入结束：中止。
//!
//! 唯一的阻塞点是读取操作者输入，没有超时。

use std::io::{BufRead, Write};

use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    capture::{CaptureCommand, CaptureOutcome, CaptureSession, CaptureState, Clock},
    converter::{timecode::format_clock_time, types::ConvertError},
};

/// 按字素截断文本用于提示展示，被截断时以 `…` 结尾。
pub fn preview_text(text: &str, max_graphemes: usize) -> String {
    let single_line = text.lines().collect::<Vec<_>>().join(" / ");
    let mut graphemes = single_line.graphemes(true);
    let head: String = graphemes.by_ref().take(max_graphemes).collect();
    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// 把一行输入映射为指令。`None` 表示输入已经结束。
fn parse_input_line(line: Option<&str>) -> CaptureCommand {
    match line.map(|l| l.trim().to_lowercase()) {
        None => CaptureCommand::Abort,
        Some(input) => match input.as_str() {
            "u" => CaptureCommand::Undo,
            "q" => CaptureCommand::Abort,
            _ => CaptureCommand::Advance,
        },
    }
}

/// 读取一行输入，输入结束时返回 `None`。
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, ConvertError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

/// 运行一次交互式打点会话，直到完成或中止。
///
/// 提示与回显写入 `writer`，指令从 `reader` 中逐行读取。
/// 会话不需要确认时会立即开始计时。
pub fn run_interactive<C, R, W>(
    mut session: CaptureSession<C>,
    mut reader: R,
    mut writer: W,
) -> Result<CaptureOutcome, ConvertError>
where
    C: Clock,
    R: BufRead,
    W: Write,
{
    let total = session.blocks().len();

    if session.options().require_start_confirmation {
        write!(writer, "共 {total} 个歌词块。按回车开始计时，输入 q 退出: ")?;
        writer.flush()?;
        let command = match parse_input_line(read_line(&mut reader)?.as_deref()) {
            CaptureCommand::Abort => CaptureCommand::Abort,
            _ => CaptureCommand::Start,
        };
        session.apply(command)?;
    } else {
        session.apply(CaptureCommand::Start)?;
    }

    let preview_len = session.options().preview_graphemes;

    while let CaptureState::AwaitingMark(i) = session.state() {
        let preview = session
            .current_block()
            .map(|b| preview_text(&b.text, preview_len))
            .unwrap_or_default();
        write!(writer, "[{}/{}] {} ", i + 1, total, preview)?;
        writer.flush()?;

        let command = parse_input_line(read_line(&mut reader)?.as_deref());
        if let Err(e) = session.apply(command) {
            warn!("忽略无效的打点指令: {}", e);
            continue;
        }

        match command {
            CaptureCommand::Advance => {
                if let Some(anchor) = session.anchors().last() {
                    writeln!(writer, "  @ {}", format_clock_time(anchor.timestamp))?;
                }
            }
            CaptureCommand::Undo => writeln!(writer, "  已撤销")?,
            CaptureCommand::Abort => writeln!(writer, "  已中止")?,
            CaptureCommand::Start => {}
        }
    }

    Ok(session.into_outcome())
}
