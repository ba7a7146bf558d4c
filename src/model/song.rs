//! 歌曲信息与产物文件命名。

use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::converter::types::ArtifactFormat;

/// 用于把名称中连续的非字母数字字符折叠为一个下划线
static UNSAFE_NAME_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("编译 UNSAFE_NAME_CHARS_REGEX 失败"));

/// 一首歌曲的基本信息。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Song {
    /// 艺术家
    pub artist: String,
    /// 歌曲标题
    pub title: String,
}

impl Song {
    /// 创建一个新的 `Song`。
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// 供人阅读的标签，例如 `John Frusciante - The Past Recedes`，用作字幕文档标题。
    #[must_use]
    pub fn label(&self) -> String {
        match (self.artist.trim(), self.title.trim()) {
            ("", title) => title.to_string(),
            (artist, "") => artist.to_string(),
            (artist, title) => format!("{artist} - {title}"),
        }
    }

    /// 可安全用于文件名的标识，形如 `John_Frusciante_The_Past_Recedes`。
    #[must_use]
    pub fn slug(&self) -> String {
        let parts: Vec<String> = [&self.artist, &self.title]
            .iter()
            .map(|s| sanitize_name(s))
            .filter(|s| !s.is_empty())
            .collect();
        parts.join("_")
    }

    /// 生成不带时间戳的产物文件名，例如 `Artist_Title.csv`。
    #[must_use]
    pub fn artifact_file_name(&self, format: ArtifactFormat) -> String {
        format!("{}.{}", self.slug(), format.to_extension_str())
    }

    /// 生成带会话时间戳的产物文件名，例如 `Artist_Title_2025-01-31_2359.ass`。
    #[must_use]
    pub fn session_file_name(&self, format: ArtifactFormat, at: &DateTime<Local>) -> String {
        format!(
            "{}_{}.{}",
            self.slug(),
            at.format("%Y-%m-%d_%H%M"),
            format.to_extension_str()
        )
    }
}

/// 把任意名称转换为只包含 `[A-Za-z0-9_]` 的形式。
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    UNSAFE_NAME_CHARS_REGEX
        .replace_all(name.trim(), "_")
        .trim_matches('_')
        .to_string()
}
