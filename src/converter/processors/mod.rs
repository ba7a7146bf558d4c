//! 时间轴与文本处理器模块

pub mod artifact_io;
pub mod interval_resolver;
pub mod lyric_cleaner;
pub mod text_aligner;
