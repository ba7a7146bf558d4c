//! 产物解析器模块

pub mod anchor_csv_parser;
pub mod asr_json_parser;
pub mod ass_parser;
pub mod lyrics_text_parser;
