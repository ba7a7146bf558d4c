//! 时间码的双向转换。
//!
//! 所有计算都以秒为单位的 `f64` 进行，只在序列化时才转换为定点的 `H:MM:SS.cc` 等表示。
//! 支持解析的时间标记：
//!
//! - 纯秒数：`12`、`12.345`
//! - 分秒：`MM:SS`、`MM:SS.cc`（小数分隔符可为 `.` 或 `,`）
//! - 时分秒：`H:MM:SS.cc`

use regex::Regex;
use std::sync::LazyLock;

use crate::converter::types::ConvertError;

/// 用于解析带冒号的时间标记
static CLOCK_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<h>\d+):)?(?P<m>\d+):(?P<s>\d{1,2})(?:[.,](?P<f>\d+))?$")
        .expect("编译 CLOCK_TIME_REGEX 失败")
});

/// 用于识别纯秒数形式的时间标记
static RAW_SECONDS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d*)?|\.\d+)$").expect("编译 RAW_SECONDS_REGEX 失败")
});

/// 将秒数四舍五入为厘秒。负数按 0 处理。
fn to_centiseconds(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 100.0).round() as u64
}

/// 将秒数格式化为 ASS 时间字符串 `H:MM:SS.cc` (小时:分钟:秒.厘秒)。
#[must_use]
pub fn format_ass_time(seconds: f64) -> String {
    let total_cs = to_centiseconds(seconds);
    let cs = total_cs % 100;
    let total_seconds = total_cs / 100;
    let secs = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;
    format!("{hours}:{minutes:02}:{secs:02}.{cs:02}")
}

/// 将秒数格式化为 `MM:SS.cc`，分钟数不会折算成小时。
#[must_use]
pub fn format_clock_time(seconds: f64) -> String {
    let total_cs = to_centiseconds(seconds);
    let cs = total_cs % 100;
    let total_seconds = total_cs / 100;
    let secs = total_seconds % 60;
    let minutes = total_seconds / 60;
    format!("{minutes:02}:{secs:02}.{cs:02}")
}

/// 将一个时间标记解析为秒数。
///
/// # 错误
/// 标记为空、格式不受支持、秒数或分钟数越界时返回 `ConvertError::InvalidTime`。
pub fn parse_time_token(token: &str) -> Result<f64, ConvertError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ConvertError::InvalidTime("空的时间标记".to_string()));
    }

    if RAW_SECONDS_REGEX.is_match(token) {
        return Ok(token.parse::<f64>()?);
    }

    let caps = CLOCK_TIME_REGEX
        .captures(token)
        .ok_or_else(|| ConvertError::InvalidTime(format!("无法识别的时间标记: '{token}'")))?;

    let hours: u64 = match caps.name("h") {
        Some(h) => h.as_str().parse()?,
        None => 0,
    };
    let minutes: u64 = caps["m"].parse()?;
    let secs: u64 = caps["s"].parse()?;

    if secs >= 60 {
        return Err(ConvertError::InvalidTime(format!(
            "时间标记 '{token}' 的秒数越界"
        )));
    }
    if caps.name("h").is_some() && minutes >= 60 {
        return Err(ConvertError::InvalidTime(format!(
            "时间标记 '{token}' 的分钟数越界"
        )));
    }

    let fraction = match caps.name("f") {
        Some(f) => format!("0.{}", f.as_str()).parse::<f64>()?,
        None => 0.0,
    };

    let whole_seconds = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(secs))
        .ok_or_else(|| ConvertError::InvalidTime(format!("时间标记 '{token}' 超出可表示范围")))?;

    Ok(whole_seconds as f64 + fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "期望 {expected}，实际 {actual}"
        );
    }

    #[test]
    fn test_format_ass_time() {
        assert_eq!(format_ass_time(0.0), "0:00:00.00");
        assert_eq!(format_ass_time(1.5), "0:00:01.50");
        assert_eq!(format_ass_time(61.234), "0:01:01.23");
        assert_eq!(format_ass_time(3725.999), "1:02:06.00");
    }

    #[test]
    fn test_format_ass_time_clamps_negative() {
        assert_eq!(format_ass_time(-3.0), "0:00:00.00");
        assert_eq!(format_ass_time(f64::NAN), "0:00:00.00");
    }

    #[test]
    fn test_format_clock_time_keeps_minutes() {
        assert_eq!(format_clock_time(75.5), "01:15.50");
        assert_eq!(format_clock_time(3900.0), "65:00.00");
    }

    #[test]
    fn test_parse_raw_seconds() {
        assert_close(parse_time_token("12").unwrap(), 12.0);
        assert_close(parse_time_token(" 12.345 ").unwrap(), 12.345);
        assert_close(parse_time_token(".5").unwrap(), 0.5);
    }

    #[test]
    fn test_parse_minutes_seconds() {
        assert_close(parse_time_token("01:15.50").unwrap(), 75.5);
        assert_close(parse_time_token("1:05").unwrap(), 65.0);
        assert_close(parse_time_token("0:02,25").unwrap(), 2.25);
    }

    #[test]
    fn test_parse_hours_minutes_seconds() {
        assert_close(parse_time_token("1:02:06.00").unwrap(), 3726.0);
        assert_close(parse_time_token("0:00:01.50").unwrap(), 1.5);
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        for seconds in [0.0, 0.01, 1.5, 59.99, 61.23, 3599.99, 3600.0] {
            let formatted = format_ass_time(seconds);
            assert_close(parse_time_token(&formatted).unwrap(), seconds);
        }
    }

    #[test]
    fn test_parse_rejects_invalid_tokens() {
        for token in ["", "abc", "-1.0", "1:60", "1:60:00", "12:3a", "1::2"] {
            assert!(
                matches!(parse_time_token(token), Err(ConvertError::InvalidTime(_))),
                "'{token}' 应当被拒绝"
            );
        }
    }

    #[test]
    fn test_parse_rejects_oversized_tokens() {
        for token in ["99999999999999999:00:00", "9999999999999999999:00"] {
            assert!(
                matches!(parse_time_token(token), Err(ConvertError::InvalidTime(_))),
                "'{token}' 应当被拒绝"
            );
        }
    }
}
