//! 本地歌词来源。

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    converter::types::ArtifactFormat,
    error::{KaraokeError, Result},
    model::song::Song,
    providers::LyricsProvider,
};

/// 从目录中读取 `{slug}.txt` 的歌词来源。
#[derive(Debug, Clone)]
pub struct LocalTextProvider {
    dir: PathBuf,
}

impl LocalTextProvider {
    /// 创建一个读取 `dir` 目录的来源。
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 某首歌对应的歌词文件路径。
    #[must_use]
    pub fn path_for(&self, song: &Song) -> PathBuf {
        self.dir
            .join(song.artifact_file_name(ArtifactFormat::PlainText))
    }
}

#[async_trait]
impl LyricsProvider for LocalTextProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn fetch_lyrics(&self, song: &Song) -> Result<Option<String>> {
        let path = self.path_for(song);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("本地歌词文件 {:?} 不存在。", path);
                Ok(None)
            }
            Err(e) => Err(KaraokeError::File { path, source: e }),
        }
    }
}

/// 直接持有一段歌词文本的来源，例如操作者手动粘贴的歌词。
#[derive(Debug, Clone)]
pub struct StaticTextProvider {
    text: String,
}

impl StaticTextProvider {
    /// 用给定文本创建来源。
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl LyricsProvider for StaticTextProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_lyrics(&self, _song: &Song) -> Result<Option<String>> {
        if self.text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.text.clone()))
        }
    }
}
