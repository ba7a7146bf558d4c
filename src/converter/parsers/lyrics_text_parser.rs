//! # 纯文本歌词解析器
//!
//! 纯文本歌词以空行分隔歌词块，同一块内的多行在显示时会同时出现。

use crate::converter::{types::LyricBlock, utils::normalize_text_whitespace};

/// 将纯文本歌词按空行切分为歌词块。
///
/// 块内的各行会被规范化空白后以 `'\n'` 连接；连续的空行视为一个分隔。
pub fn parse_lyric_blocks(content: &str) -> Vec<LyricBlock> {
    fn flush(current: &mut Vec<String>, blocks: &mut Vec<LyricBlock>) {
        if !current.is_empty() {
            let index = blocks.len();
            blocks.push(LyricBlock::new(index, current.join("\n")));
            current.clear();
        }
    }

    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw_line in content.trim_start_matches('\u{feff}').lines() {
        let line = normalize_text_whitespace(raw_line);
        if line.is_empty() {
            flush(&mut current, &mut blocks);
        } else {
            current.push(line);
        }
    }
    flush(&mut current, &mut blocks);

    blocks
}

/// 将纯文本歌词中的每个非空行作为一个单独的歌词块。
pub fn parse_lyric_lines(content: &str) -> Vec<LyricBlock> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(normalize_text_whitespace)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| LyricBlock::new(index, line))
        .collect()
}
