//! 产物生成器模块

pub mod anchor_csv_generator;
pub mod ass_generator;
