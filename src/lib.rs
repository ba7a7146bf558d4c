#![warn(missing_docs)]

//! # Karaoke Time RS
//!
//! 一个为卡拉 OK 视频制作歌词时间轴的 Rust 库。
//!
//! ## 主要功能
//!
//! - **打点**: 操作者跟随音频逐块打点，记录每个歌词块出现的时间。
//! - **时间轴解析**: 把有序锚点转换为互不重叠、带淡入淡出的字幕显示区间。
//! - **文本对齐**: 用权威歌词替换语音识别结果中的错误文本，同时保留识别出的时间。
//! - **字幕生成**: 输出可直接交给渲染器的 ASS 字幕文档。
//!
//! ## 从锚点生成字幕
//!
//! ```rust
//! use karaoke_time_rs::KaraokeHelper;
//! use karaoke_time_rs::converter::types::Anchor;
//! use karaoke_time_rs::model::song::Song;
//!
//! let helper = KaraokeHelper::new();
//! let anchors = vec![
//!     Anchor::new(0, 0.0, "Hello"),
//!     Anchor::new(1, 2.0, "World"),
//!     Anchor::new(2, 5.0, "Goodbye"),
//! ];
//!
//! let cues = helper.resolve(&anchors);
//! assert_eq!(cues.len(), 3);
//!
//! let document = helper.render_ass(&anchors, &Song::new("Artist", "Song")).unwrap();
//! assert!(document.contains("Title: Artist - Song"));
//! ```
//!
//! ## 用权威歌词修正识别文本
//!
//! ```rust
//! use karaoke_time_rs::KaraokeHelper;
//! use karaoke_time_rs::converter::types::AsrSegment;
//!
//! let helper = KaraokeHelper::new();
//! let segments = vec![AsrSegment { start: 1.0, end: None, text: "hallo wurld".into() }];
//!
//! let result = helper.align(&segments, &["Hello world"]);
//! assert_eq!(result.anchors[0].text, "Hello world");
//! assert_eq!(result.anchors[0].timestamp, 1.0);
//! ```
pub mod capture;
pub mod config;
pub mod converter;
pub mod error;
pub mod model;
pub mod providers;
pub mod search;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

pub use crate::{
    error::{KaraokeError, Result},
    model::song::Song,
};

use crate::{
    capture::{CaptureSession, Clock},
    converter::{
        generators::ass_generator::generate_ass,
        processors::{
            artifact_io::{save_anchor_csv, write_ass_file},
            interval_resolver::resolve_cues,
            text_aligner::align_segments,
        },
        types::{
            AlignmentResult, Anchor, ArtifactFormat, AsrSegment, Cue, KaraokeOptions, LyricBlock,
        },
    },
    providers::{FetchedLyrics, LyricsProvider, fetch_lyrics_ordered},
};

// ==========================================================
//  顶层 API
// ==========================================================

/// 顶层助手，持有配置与歌词来源，为用户提供统一、简单的接口。
///
/// 这是与本库交互的主要入口点。
pub struct KaraokeHelper {
    options: KaraokeOptions,
    providers: Vec<Box<dyn LyricsProvider>>,
}

/// 一次会话写出的产物文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionArtifacts {
    /// 锚点表格的路径
    pub anchor_csv: PathBuf,
    /// ASS 字幕的路径
    pub ass: PathBuf,
}

impl Default for KaraokeHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl KaraokeHelper {
    /// 使用默认配置创建一个没有歌词来源的实例。
    pub fn new() -> Self {
        Self::with_options(KaraokeOptions::default())
    }

    /// 使用给定配置创建实例。
    pub fn with_options(options: KaraokeOptions) -> Self {
        Self {
            options,
            providers: Vec::new(),
        }
    }

    /// 从用户配置目录加载配置并创建实例，加载失败时使用默认配置。
    pub fn from_user_config() -> Self {
        Self::with_options(config::load_options_or_default())
    }

    /// 当前配置。
    pub fn options(&self) -> &KaraokeOptions {
        &self.options
    }

    /// 当前配置的可变引用。
    pub fn options_mut(&mut self) -> &mut KaraokeOptions {
        &mut self.options
    }

    /// 追加一个歌词来源。来源按添加顺序依次尝试。
    pub fn add_provider(&mut self, provider: Box<dyn LyricsProvider>) -> &mut Self {
        info!("添加歌词来源 '{}'", provider.name());
        self.providers.push(provider);
        self
    }

    /// 按顺序尝试所有歌词来源，返回第一份清理后仍有内容的歌词。
    ///
    /// # 返回
    /// * `Ok(Some(FetchedLyrics))` - 如果某个来源给出了可用的歌词。
    /// * `Ok(None)` - 如果所有来源都没有可用的歌词。
    pub async fn fetch_lyrics(&self, song: &Song) -> Result<Option<FetchedLyrics>> {
        fetch_lyrics_ordered(&self.providers, song, &self.options.cleaner).await
    }

    /// 为一组歌词块创建打点会话，会话使用当前配置中的打点选项。
    pub fn capture_session<C: Clock>(&self, blocks: Vec<LyricBlock>, clock: C) -> CaptureSession<C> {
        CaptureSession::new(blocks, self.options.capture.clone(), clock)
    }

    /// 把锚点解析为字幕。
    pub fn resolve(&self, anchors: &[Anchor]) -> Vec<Cue> {
        resolve_cues(anchors, &self.options.timing)
    }

    /// 用权威歌词替换语音识别文本。
    pub fn align<S: AsRef<str>>(
        &self,
        segments: &[AsrSegment],
        authoritative_lines: &[S],
    ) -> AlignmentResult {
        align_segments(segments, authoritative_lines, &self.options.alignment)
    }

    /// 从锚点生成 ASS 文档，歌曲标签作为文档标题。
    pub fn render_ass(&self, anchors: &[Anchor], song: &Song) -> Result<String> {
        let cues = self.resolve(anchors);
        Ok(generate_ass(&cues, &self.options.style, &song.label())?)
    }

    /// 把锚点表格与 ASS 字幕以带时间戳的文件名写入 `dir`。
    ///
    /// 文件名形如 `Artist_Title_2025-01-31_2359.csv`。
    pub fn write_session_artifacts(
        &self,
        dir: &Path,
        song: &Song,
        anchors: &[Anchor],
        at: &DateTime<Local>,
    ) -> Result<SessionArtifacts> {
        let anchor_csv = dir.join(song.session_file_name(ArtifactFormat::AnchorCsv, at));
        let ass = dir.join(song.session_file_name(ArtifactFormat::Ass, at));

        save_anchor_csv(&anchor_csv, anchors)?;
        let cues = self.resolve(anchors);
        write_ass_file(&ass, &cues, &self.options.style, &song.label())?;

        Ok(SessionArtifacts { anchor_csv, ass })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{capture::ManualClock, providers::StaticTextProvider};

    #[test]
    fn test_helper_uses_its_options() {
        let mut helper = KaraokeHelper::new();
        helper.options_mut().timing.tail_duration_seconds = 10.0;

        let cues = helper.resolve(&[Anchor::new(0, 1.0, "only")]);
        assert_eq!(cues[0].end, 11.0);

        helper.options_mut().capture.count_in_seconds = 3.0;
        let session = helper.capture_session(vec![], ManualClock::new());
        assert_eq!(session.options().count_in_seconds, 3.0);
    }

    #[tokio::test]
    async fn test_fetch_with_registered_provider() {
        let mut helper = KaraokeHelper::new();
        helper.add_provider(Box::new(StaticTextProvider::new(
            "[Chorus]\nla la, the lanterns are drifting down the river",
        )));

        let fetched = helper.fetch_lyrics(&Song::new("a", "b")).await.unwrap();
        assert_eq!(
            fetched.map(|f| f.lines()),
            Some(vec!["la la, the lanterns are drifting down the river".to_string()])
        );
    }

    #[test]
    fn test_write_session_artifacts() {
        let dir =
            std::env::temp_dir().join(format!("karaoke_time_session_{}", std::process::id()));
        let at = Local.with_ymd_and_hms(2025, 3, 9, 14, 5, 0).unwrap();
        let song = Song::new("Artist", "Title");
        let anchors = vec![Anchor::new(0, 0.0, "a"), Anchor::new(1, 1.0, "b")];

        let written = KaraokeHelper::new()
            .write_session_artifacts(&dir, &song, &anchors, &at)
            .unwrap();

        assert!(written.anchor_csv.ends_with("Artist_Title_2025-03-09_1405.csv"));
        assert!(written.ass.ends_with("Artist_Title_2025-03-09_1405.ass"));
        let ass = std::fs::read_to_string(&written.ass).unwrap();
        assert!(ass.contains("Title: Artist - Title"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
