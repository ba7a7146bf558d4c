//! 抓取歌词清理器。
//!
//! 从歌词网站抓取的文本常夹带页面元数据（贡献者、嵌入提示、推荐列表等）和乱码字符，
//! 在作为权威歌词使用之前需要先移除。

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::converter::{types::LyricCleanerOptions, utils::normalize_text_whitespace};

/// 默认的关键词：整行只要按单词包含其中之一就会被移除
const DEFAULT_KEYWORDS: &[&str] = &[
    "Contributors",
    "Produced by",
    "Embed",
    "Lyrics",
    "You might also like",
    "Translations",
    "Track Info",
    "Written by",
];

/// 默认的正则表达式：只有数字的行，以及页面末尾形如 `5Embed` 的嵌入计数
const DEFAULT_REGEX_PATTERNS: &[&str] = &[r"^\d+\s*$", r"(?i)^\d*\s*embed$"];

/// 默认的错误页面标记：歌词中出现任意一个就认为来源返回的是错误信息
const DEFAULT_ERROR_MARKERS: &[&str] = &[
    "403",
    "error",
    "permission_denied",
    "api key",
    "not found",
    "unauthorized",
];

/// 用于移除抓取时产生的方块和替换字符
static JUNK_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[■□\u{FFFD}]+").expect("编译 JUNK_CHARS_REGEX 失败"));

/// 用于识别 `[Chorus]`、`[Verse 1: Artist]` 这类段落标记
static SECTION_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]*\]$").expect("编译 SECTION_HEADER_REGEX 失败"));

/// 根据选项编译出的所有行过滤规则。
struct LineFilters {
    keyword_regexes: Vec<Regex>,
    line_regexes: Vec<Regex>,
}

impl LineFilters {
    fn from_options(options: &LyricCleanerOptions) -> Self {
        let keyword_regexes = match &options.keywords {
            Some(keywords) => keywords
                .iter()
                .filter_map(|k| compile_keyword(k))
                .collect(),
            None => DEFAULT_KEYWORDS
                .iter()
                .filter_map(|k| compile_keyword(k))
                .collect(),
        };

        let patterns: Vec<&str> = match &options.regex_patterns {
            Some(patterns) => patterns.iter().map(String::as_str).collect(),
            None => DEFAULT_REGEX_PATTERNS.to_vec(),
        };
        let line_regexes = patterns
            .into_iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("忽略无效的清理正则表达式 '{}': {}", p, e);
                    None
                }
            })
            .collect();

        Self {
            keyword_regexes,
            line_regexes,
        }
    }

    fn should_drop(&self, line: &str) -> bool {
        self.keyword_regexes.iter().any(|re| re.is_match(line))
            || self.line_regexes.iter().any(|re| re.is_match(line))
    }
}

fn compile_keyword(keyword: &str) -> Option<Regex> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }
    let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("忽略无效的清理关键词 '{}': {}", keyword, e);
            None
        }
    }
}

/// 清理抓取到的歌词文本。
///
/// 被移除的行直接丢弃；段落之间的空行会保留（连续空行折叠为一个），
/// 以便后续按空行切分歌词块。
pub fn clean_lyric_text(raw: &str, options: &LyricCleanerOptions) -> String {
    if !options.enabled {
        return raw.to_string();
    }

    let filters = LineFilters::from_options(options);
    let mut output: Vec<String> = Vec::new();
    let mut removed = 0usize;

    for raw_line in raw.lines() {
        let mut line = raw_line.to_string();
        for (from, to) in &options.replacements {
            if !from.is_empty() {
                line = line.replace(from.as_str(), to);
            }
        }
        let line = normalize_text_whitespace(&JUNK_CHARS_REGEX.replace_all(&line, ""));

        if line.is_empty() {
            if output.last().is_some_and(|l| !l.is_empty()) {
                output.push(String::new());
            }
            continue;
        }

        if filters.should_drop(&line)
            || (options.strip_section_headers && SECTION_HEADER_REGEX.is_match(&line))
        {
            debug!("移除歌词中的元数据行: {}", line);
            removed += 1;
            continue;
        }

        output.push(line);
    }

    while output.last().is_some_and(String::is_empty) {
        output.pop();
    }

    if removed > 0 {
        debug!("共移除了 {} 行元数据。", removed);
    }

    output.join("\n")
}

/// 清理抓取到的歌词文本，并返回所有非空行。
pub fn clean_lyric_lines(raw: &str, options: &LyricCleanerOptions) -> Vec<String> {
    clean_lyric_text(raw, options)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// 检查清理后的歌词是否可以作为权威歌词使用。
///
/// # 返回
/// * `None` - 歌词有效。
/// * `Some(reason)` - 歌词过短或看起来是错误页面，附带原因描述。
pub fn invalid_lyrics_reason(
    cleaned_text: &str,
    options: &LyricCleanerOptions,
) -> Option<String> {
    let trimmed = cleaned_text.trim();
    if trimmed.is_empty() {
        return Some("清理后为空".to_string());
    }

    let char_count = trimmed.chars().count();
    if char_count < options.min_valid_chars {
        return Some(format!(
            "只有 {char_count} 个字符，少于 {} 个",
            options.min_valid_chars
        ));
    }

    let lowered = trimmed.to_lowercase();
    let marker = match &options.error_markers {
        Some(markers) => markers
            .iter()
            .map(String::as_str)
            .find(|m| !m.is_empty() && lowered.contains(&m.to_lowercase())),
        None => DEFAULT_ERROR_MARKERS
            .iter()
            .copied()
            .find(|m| lowered.contains(m)),
    };

    marker.map(|m| format!("包含错误标记 '{m}'"))
}
