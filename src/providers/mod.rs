//! 歌词来源模块
//!
//! 该模块定义了获取权威歌词文本的抽象。核心算法不关心歌词从哪里来，
//! 这里只提供按固定顺序依次尝试多个来源的回退逻辑。

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::{
    converter::{
        parsers::lyrics_text_parser::parse_lyric_blocks,
        processors::lyric_cleaner::{clean_lyric_text, invalid_lyrics_reason},
        types::{LyricBlock, LyricCleanerOptions},
    },
    error::Result,
    model::song::Song,
};

pub mod local;

pub use local::{LocalTextProvider, StaticTextProvider};

/// 定义了所有歌词来源需要实现的通用接口。
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// 返回来源的唯一名称，一个全小写的静态字符串，例如 `"local"`。
    fn name(&self) -> &'static str;

    /// 获取一首歌的原始歌词文本。
    ///
    /// # 返回
    /// * `Ok(Some(text))` - 找到了歌词。
    /// * `Ok(None)` - 该来源中没有这首歌。
    /// * `Err(_)` - 来源本身出错。
    async fn fetch_lyrics(&self, song: &Song) -> Result<Option<String>>;
}

/// 从某个来源获取并清理过的歌词。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedLyrics {
    /// 给出歌词的来源名称
    pub provider: &'static str,
    /// 来源返回的原始文本
    pub raw_text: String,
    /// 清理后的文本，段落之间保留一个空行
    pub cleaned_text: String,
}

impl FetchedLyrics {
    /// 清理后的所有非空行，用作文本对齐的权威歌词。
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.cleaned_text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 按空行切分出的歌词块，用作打点的输入。
    #[must_use]
    pub fn blocks(&self) -> Vec<LyricBlock> {
        parse_lyric_blocks(&self.cleaned_text)
    }
}

/// 按顺序依次尝试各个来源，返回第一个清理后通过有效性检查的结果。
///
/// 单个来源出错只会记录警告并继续尝试下一个。过短或像错误页面的歌词
/// （见 [`invalid_lyrics_reason`]）同样会被跳过。
#[instrument(skip(providers, options), fields(song = %song.label()))]
pub async fn fetch_lyrics_ordered(
    providers: &[Box<dyn LyricsProvider>],
    song: &Song,
    options: &LyricCleanerOptions,
) -> Result<Option<FetchedLyrics>> {
    for provider in providers {
        debug!("正在尝试歌词来源: '{}'", provider.name());
        match provider.fetch_lyrics(song).await {
            Ok(Some(raw_text)) => {
                let cleaned_text = clean_lyric_text(&raw_text, options);
                if let Some(reason) = invalid_lyrics_reason(&cleaned_text, options) {
                    info!(
                        "来源 '{}' 的歌词无效 ({})，继续尝试。",
                        provider.name(),
                        reason
                    );
                    continue;
                }
                info!("在 '{}' 成功获取到歌词，搜索结束。", provider.name());
                return Ok(Some(FetchedLyrics {
                    provider: provider.name(),
                    raw_text,
                    cleaned_text,
                }));
            }
            Ok(None) => debug!("来源 '{}' 中没有这首歌。", provider.name()),
            Err(e) => warn!("从来源 '{}' 获取歌词时失败: {}", provider.name(), e),
        }
    }
    info!("所有来源都未能找到歌词。");
    Ok(None)
}
