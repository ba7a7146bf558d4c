//! 定义了时间轴解析、文本对齐与字幕生成中使用的核心数据类型。

use std::{fmt, io, path::PathBuf};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};
use thiserror::Error;
use tracing::warn;

use crate::model::match_type::MatchKind;

//=============================================================================
// 1. 错误枚举
//=============================================================================

/// 定义解析、对齐和生成过程中可能发生的各种错误。
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 无效的时间格式字符串。
    #[error("无效的时间格式: {0}")]
    InvalidTime(String),
    /// 浮点数解析错误。
    #[error("解析错误: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
    /// 整数解析错误。
    #[error("解析错误: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
    /// 字符串格式化错误。
    #[error("格式错误: {0}")]
    Format(#[from] fmt::Error),
    /// 内部逻辑错误或未明确分类的错误。
    #[error("错误: {0}")]
    Internal(String),
    /// 未附带路径信息的 IO 错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
    /// 读取文件失败。
    #[error("读取文件 {path:?} 失败: {source}")]
    FileRead {
        /// 出错的文件路径
        path: PathBuf,
        /// 底层 IO 错误
        #[source]
        source: io::Error,
    },
    /// 写入文件失败。
    #[error("写入文件 {path:?} 失败: {source}")]
    FileWrite {
        /// 出错的文件路径
        path: PathBuf,
        /// 底层 IO 错误
        #[source]
        source: io::Error,
    },
    /// JSON 解析错误。
    #[error("解析 JSON 内容 {context} 失败: {source}")]
    JsonParse {
        /// 底层 `serde_json` 错误
        #[source]
        source: serde_json::Error,
        /// 有关错误发生位置的上下文信息。
        context: String,
    },
    /// 文件的整体结构不符合预期（例如缺失表头）。
    #[error("无效的文件格式: {0}")]
    InvalidFormat(String),
    /// 打点会话收到了当前状态下不允许的指令。
    #[error("打点状态 {state} 下不允许执行 {command}")]
    InvalidCaptureTransition {
        /// 当前状态的描述
        state: String,
        /// 被拒绝的指令
        command: String,
    },
}

impl ConvertError {
    /// 创建一个带有上下文的 `JsonParse` 错误。
    #[must_use]
    pub fn json_parse(source: serde_json::Error, context: String) -> Self {
        Self::JsonParse { source, context }
    }

    /// 创建一个带有路径的 `FileRead` 错误。
    #[must_use]
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// 创建一个带有路径的 `FileWrite` 错误。
    #[must_use]
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}

//=============================================================================
// 2. 产物格式枚举
//=============================================================================

/// 枚举：流水线中读写的各类产物文件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize, EnumIter)]
#[strum(ascii_case_insensitive)]
#[derive(Default)]
pub enum ArtifactFormat {
    /// `timestamp,text` 形式的打点表格。
    #[default]
    AnchorCsv,
    /// `Advanced SubStation Alpha` 字幕脚本。
    Ass,
    /// Whisper 风格的语音识别 JSON 输出。
    AsrJson,
    /// 以空行分段的纯文本歌词。
    PlainText,
}

impl ArtifactFormat {
    /// 将产物格式转换为对应的文件扩展名字符串。
    #[must_use]
    pub fn to_extension_str(self) -> &'static str {
        match self {
            ArtifactFormat::AnchorCsv => "csv",
            ArtifactFormat::Ass => "ass",
            ArtifactFormat::AsrJson => "json",
            ArtifactFormat::PlainText => "txt",
        }
    }

    /// 从文件扩展名解析产物格式，不区分大小写，会忽略开头的点。
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.');
        let found = Self::iter().find(|f| f.to_extension_str().eq_ignore_ascii_case(ext));
        if found.is_none() {
            warn!("[ArtifactFormat] 未知的扩展名: {}", ext);
        }
        found
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::AnchorCsv => write!(f, "Anchor CSV"),
            ArtifactFormat::Ass => write!(f, "ASS"),
            ArtifactFormat::AsrJson => write!(f, "ASR JSON"),
            ArtifactFormat::PlainText => write!(f, "Plain Text"),
        }
    }
}

//=============================================================================
// 3. 时间轴内部表示结构
//=============================================================================

/// 一个歌词块：在同一时刻整体显示的一段文本。
///
/// 多个物理行在内存中以 `'\n'` 连接；块的身份由其序号决定。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LyricBlock {
    /// 块在歌词中的序号（从 0 开始）。
    pub index: usize,
    /// 块的显示文本。
    pub text: String,
}

impl LyricBlock {
    /// 创建一个新的歌词块。
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// 以 ` / ` 连接各物理行，便于在单行终端中展示。
    #[must_use]
    pub fn display_text(&self) -> String {
        self.text.lines().collect::<Vec<_>>().join(" / ")
    }
}

/// 锚点：把一个歌词块绑定到一个时间点（秒）。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    /// 对应歌词块的序号。
    pub block_index: usize,
    /// 时间戳，单位为秒。
    pub timestamp: f64,
    /// 该块的文本。
    pub text: String,
}

impl Anchor {
    /// 创建一个新的锚点。
    pub fn new(block_index: usize, timestamp: f64, text: impl Into<String>) -> Self {
        Self {
            block_index,
            timestamp,
            text: text.into(),
        }
    }
}

/// 一条最终的字幕显示区间。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cue {
    /// 开始时间（秒）。
    pub start: f64,
    /// 结束时间（秒）。
    pub end: f64,
    /// 显示文本，物理行之间以 `'\n'` 分隔。
    pub text: String,
    /// 淡入时长（毫秒）。
    pub fade_in_ms: u32,
    /// 淡出时长（毫秒）。
    pub fade_out_ms: u32,
}

impl Cue {
    /// 该字幕的可见时长（秒）。
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// 语音识别产生的一个片段：时间准确，文本可能有误。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AsrSegment {
    /// 开始时间（秒）。
    pub start: f64,
    /// 结束时间（秒），部分识别引擎不提供。
    #[serde(default)]
    pub end: Option<f64>,
    /// 识别出的文本。
    pub text: String,
}

/// 一个语音识别片段与一行权威歌词之间的配对结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentPair {
    /// 语音识别片段的序号。
    pub segment_index: usize,
    /// 被消费的权威歌词行序号；没有可用的行时为 `None`。
    pub line_index: Option<usize>,
    /// 片段与被选中行的相似度，取值 `0.0..=1.0`。
    pub score: f64,
    /// 配对方式。
    pub kind: MatchKind,
}

/// 文本对齐的完整结果。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentResult {
    /// 对齐后的时间轴，长度总是等于语音识别片段数。
    pub anchors: Vec<Anchor>,
    /// 每个片段的配对详情。
    pub pairs: Vec<AlignmentPair>,
}

//=============================================================================
// 4. 解析结果结构体
//=============================================================================

/// 解析打点表格后得到的数据。
#[derive(Debug, Clone, Default)]
pub struct ParsedAnchorData {
    /// 按文件顺序排列的锚点。
    pub anchors: Vec<Anchor>,
    /// 解析期间被跳过的行的警告信息。
    pub warnings: Vec<String>,
}

/// 从 ASS 文件中读回的一条对话事件。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedDialogue {
    /// 开始时间（秒）。
    pub start: f64,
    /// 结束时间（秒）。
    pub end: f64,
    /// 样式名。
    pub style: String,
    /// 去除了淡入淡出标签、`\N` 已还原为换行的文本。
    pub text: String,
    /// 文本开头的 `\fad` 标签参数（如果存在）。
    pub fade: Option<(u32, u32)>,
}

//=============================================================================
// 5. 选项结构体
//=============================================================================

/// 时间轴解析选项。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingOptions {
    /// 正常情况下相邻两条字幕之间留出的空白（秒）。
    pub spacing_seconds: f64,
    /// 歌词过密时用来代替 `spacing_seconds` 的更小间隙（秒）。
    pub overlap_buffer_seconds: f64,
    /// 每条字幕至少可见的时长（秒）。
    pub min_visible_seconds: f64,
    /// 最后一条字幕没有后继，使用此时长（秒）。
    pub tail_duration_seconds: f64,
    /// 应用于所有锚点的全局偏移（秒），正数表示延后。
    pub global_offset_seconds: f64,
    /// 淡入时长（毫秒）。
    pub fade_in_ms: u32,
    /// 淡出时长（毫秒）。
    pub fade_out_ms: u32,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            spacing_seconds: 0.1,
            overlap_buffer_seconds: 0.05,
            min_visible_seconds: 0.5,
            tail_duration_seconds: 3.0,
            global_offset_seconds: 0.0,
            fade_in_ms: 0,
            fade_out_ms: 0,
        }
    }
}

/// ASS 生成选项，对应唯一的 `Default` 样式与脚本信息。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssStyleOptions {
    /// 画布宽度。
    pub play_res_x: u32,
    /// 画布高度。
    pub play_res_y: u32,
    /// 字体名称。
    pub font_name: String,
    /// 字号。
    pub font_size: u32,
    /// 主颜色，`&HAABBGGRR` 形式。
    pub primary_colour: String,
    /// 次颜色。
    pub secondary_colour: String,
    /// 描边颜色。
    pub outline_colour: String,
    /// 背景/阴影颜色。
    pub back_colour: String,
    /// 是否加粗。
    pub bold: bool,
    /// 是否斜体。
    pub italic: bool,
    /// 描边宽度。
    pub outline: u32,
    /// 阴影距离。
    pub shadow: u32,
    /// 小键盘式对齐代码（1-9），5 为画面正中。
    pub alignment: u8,
    /// 左边距。
    pub margin_l: u32,
    /// 右边距。
    pub margin_r: u32,
    /// 垂直边距。
    pub margin_v: u32,
    /// 自动换行方式，2 表示不自动换行，只在 `\N` 处换行。
    pub wrap_style: u8,
}

impl Default for AssStyleOptions {
    fn default() -> Self {
        Self {
            play_res_x: 1920,
            play_res_y: 1080,
            font_name: "Helvetica Neue".to_string(),
            font_size: 120,
            primary_colour: "&H00FFFFFF".to_string(),
            secondary_colour: "&H000000FF".to_string(),
            outline_colour: "&H00000000".to_string(),
            back_colour: "&H64000000".to_string(),
            bold: true,
            italic: false,
            outline: 3,
            shadow: 0,
            alignment: 5,
            margin_l: 50,
            margin_r: 50,
            margin_v: 60,
            wrap_style: 2,
        }
    }
}

/// 文本对齐选项。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AlignmentOptions {
    /// 认为片段与歌词行匹配所需的最低相似度。
    pub min_similarity: f64,
}

impl Default for AlignmentOptions {
    fn default() -> Self {
        Self {
            min_similarity: 0.3,
        }
    }
}

/// 打点会话选项。
///
/// 所有开关都在构造会话时显式传入，不从全局状态或命令行中读取。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// 开始信号之后的预备时长（秒），会从每个记录的时间中扣除。
    pub count_in_seconds: f64,
    /// 是否需要操作者确认后才开始计时。为 `false` 时会话立即开始。
    pub require_start_confirmation: bool,
    /// 提示中展示的歌词预览长度（按字素计）。
    pub preview_graphemes: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            count_in_seconds: 0.0,
            require_start_confirmation: true,
            preview_graphemes: 70,
        }
    }
}

/// 抓取歌词清理器的选项。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LyricCleanerOptions {
    /// 是否启用清理。
    pub enabled: bool,
    /// 整行包含这些关键词（按单词、不区分大小写）时移除该行。
    /// 如果为 `None`，将使用一组内建的默认关键词。
    pub keywords: Option<Vec<String>>,
    /// 匹配这些正则表达式的行会被移除。
    /// 如果为 `None`，将使用一组内建的默认正则表达式。
    pub regex_patterns: Option<Vec<String>>,
    /// 是否移除 `[Chorus]` 这类段落标记行。
    pub strip_section_headers: bool,
    /// 在其他规则之前执行的字面替换，用于修正固定的错词。
    pub replacements: Vec<(String, String)>,
    /// 清理后的歌词少于这么多个字符时视为无效（例如只抓到了一段提示语）。
    pub min_valid_chars: usize,
    /// 清理后的歌词包含这些片段（不区分大小写）时视为错误页面。
    /// 如果为 `None`，将使用一组内建的默认标记。
    pub error_markers: Option<Vec<String>>,
}

impl Default for LyricCleanerOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            keywords: None,
            regex_patterns: None,
            strip_section_headers: true,
            replacements: Vec::new(),
            min_valid_chars: 40,
            error_markers: None,
        }
    }
}

//=============================================================================
// 6. 总选项
//=============================================================================

/// 整个流程的配置选项。
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KaraokeOptions {
    /// 时间轴解析选项
    pub timing: TimingOptions,
    /// ASS 样式选项
    pub style: AssStyleOptions,
    /// 文本对齐选项
    pub alignment: AlignmentOptions,
    /// 打点会话选项
    pub capture: CaptureOptions,
    /// 歌词清理选项
    pub cleaner: LyricCleanerOptions,
}
