//! 定义了歌曲与匹配结果等领域模型。

pub mod match_type;
pub mod song;
