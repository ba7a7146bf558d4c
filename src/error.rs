//! 定义了整个 `karaoke-time` 库的错误类型 `KaraokeError`。

use std::{io, path::PathBuf};
use thiserror::Error;

use crate::converter::types::ConvertError;

/// `karaoke-time` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum KaraokeError {
    /// JSON 解析或序列化失败 (源自 `serde_json::Error`)
    #[error("JSON 处理失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// 整数解析失败 (源自 `std::num::ParseIntError`)
    #[error("整数解析失败: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// 浮点数解析失败 (源自 `std::num::ParseFloatError`)
    #[error("浮点数解析失败: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// 读写某个文件失败
    #[error("访问文件 {path:?} 失败: {source}")]
    File {
        /// 出错的文件路径
        path: PathBuf,
        /// 底层 IO 错误
        #[source]
        source: io::Error,
    },

    /// 通用的产物解析错误
    #[error("解析失败: {0}")]
    Parser(String),

    /// 打点会话收到了不允许的指令
    #[error("打点指令无效: {0}")]
    Capture(String),

    /// 所有歌词来源都没有给出可用的歌词
    #[error("在所有来源中都未找到歌词")]
    LyricNotFound,

    /// 找不到用户配置目录
    #[error("无法找到用户配置目录")]
    ConfigDirNotFound,

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

/// `KaraokeError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, KaraokeError>;

impl From<ConvertError> for KaraokeError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::ParseInt(e) => Self::ParseInt(e),
            ConvertError::ParseFloat(e) => Self::ParseFloat(e),
            ConvertError::Io(e) => Self::Io(e),
            ConvertError::FileRead { path, source } | ConvertError::FileWrite { path, source } => {
                Self::File { path, source }
            }

            ConvertError::JsonParse { source, context } => {
                let error_message = format!("解析 JSON 内容 {context} 失败: {source}");
                Self::Parser(error_message)
            }

            ConvertError::InvalidTime(s) | ConvertError::InvalidFormat(s) => Self::Parser(s),

            e @ ConvertError::InvalidCaptureTransition { .. } => Self::Capture(e.to_string()),

            ConvertError::Format(e) => Self::Internal(e.to_string()),
            ConvertError::Internal(s) => Self::Internal(s),
        }
    }
}
