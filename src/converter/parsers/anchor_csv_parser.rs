//! # 打点表格解析器
//!
//! 表头可以是 `timestamp,text`，也可以是历史上使用过的 `time,lyric`。
//! 时间列接受纯秒数、`MM:SS.cc` 与 `H:MM:SS.cc`；文本列中的 `\N` 表示块内换行。
//! 格式错误的行会被跳过并记录警告，不会中断整个文件的解析。

use tracing::warn;

use crate::converter::{
    timecode::parse_time_token,
    types::{Anchor, ConvertError, ParsedAnchorData},
    utils::{normalize_block_text, unescape_line_breaks},
};

/// 时间列可用的列名
const TIME_COLUMN_NAMES: &[&str] = &["timestamp", "time", "start"];
/// 文本列可用的列名
const TEXT_COLUMN_NAMES: &[&str] = &["text", "lyric", "lyrics"];

/// 按 CSV 规则拆分一条记录。
///
/// 支持以双引号包裹的字段与字段内的 `""` 转义。
pub(crate) fn split_csv_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut field_started_quoted = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => {
                    in_quotes = false;
                    // 引号闭合后只能紧跟分隔符或行尾
                    if let Some(&next) = chars.peek()
                        && next != ','
                    {
                        return Err(format!("引号字段之后出现了意外的字符 '{next}'"));
                    }
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                field_started_quoted = false;
            }
            '"' if field.is_empty() && !field_started_quoted => {
                in_quotes = true;
                field_started_quoted = true;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err("引号字段没有闭合".to_string());
    }
    fields.push(field);
    Ok(fields)
}

/// 在表头中查找时间列和文本列的位置。
fn locate_columns(header: &[String]) -> Option<(usize, usize)> {
    let normalized: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    let find = |names: &[&str]| normalized.iter().position(|h| names.contains(&h.as_str()));
    Some((find(TIME_COLUMN_NAMES)?, find(TEXT_COLUMN_NAMES)?))
}

/// 解析打点表格内容到 `ParsedAnchorData` 结构。
///
/// # 错误
/// 找不到可识别的表头时返回 `ConvertError::InvalidFormat`。
/// 空内容返回空结果而不是错误。
pub fn parse_anchor_csv(content: &str) -> Result<ParsedAnchorData, ConvertError> {
    let mut data = ParsedAnchorData::default();
    let mut lines = content
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Ok(data);
    };

    let header = split_csv_record(header_line.trim())
        .map_err(|e| ConvertError::InvalidFormat(format!("无法解析表头: {e}")))?;
    let (time_col, text_col) = locate_columns(&header).ok_or_else(|| {
        ConvertError::InvalidFormat(format!(
            "无法识别的表头 '{}'，应为 timestamp,text 或 time,lyric",
            header_line.trim()
        ))
    })?;
    let text_is_last = text_col + 1 == header.len();

    for (line_num_zero_based, raw_line) in lines {
        let line_num = line_num_zero_based + 1;
        let mut skip = |reason: String| {
            let message = format!("第 {line_num} 行已跳过: {reason}");
            warn!("{}", message);
            data.warnings.push(message);
        };

        let fields = match split_csv_record(raw_line) {
            Ok(fields) => fields,
            Err(e) => {
                skip(e);
                continue;
            }
        };

        if fields.len() <= time_col.max(text_col) {
            skip(format!("字段数量不足 ({})", fields.len()));
            continue;
        }

        let timestamp = match parse_time_token(&fields[time_col]) {
            Ok(t) => t,
            Err(e) => {
                skip(e.to_string());
                continue;
            }
        };

        // 未加引号的文本里的逗号会多拆出字段，把它们拼回去
        let raw_text = if text_is_last && fields.len() > header.len() {
            fields[text_col..].join(",")
        } else {
            fields[text_col].clone()
        };
        let text = normalize_block_text(&unescape_line_breaks(&raw_text));
        if text.is_empty() {
            skip("文本为空".to_string());
            continue;
        }

        let block_index = data.anchors.len();
        data.anchors.push(Anchor::new(block_index, timestamp, text));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_and_quoted_fields() {
        assert_eq!(split_csv_record("1.5,hello").unwrap(), ["1.5", "hello"]);
        assert_eq!(
            split_csv_record(r#"1.5,"hello, ""world""""#).unwrap(),
            ["1.5", r#"hello, "world""#]
        );
        assert_eq!(split_csv_record("a,,b").unwrap(), ["a", "", "b"]);
    }

    #[test]
    fn test_split_rejects_broken_quotes() {
        assert!(split_csv_record(r#"1,"open"#).is_err());
        assert!(split_csv_record(r#"1,"closed"x"#).is_err());
    }

    #[test]
    fn test_parse_timestamp_text_header() {
        let content = "timestamp,text\n0.000,Hello\n2.5,World\\Nagain\n";
        let data = parse_anchor_csv(content).unwrap();

        assert!(data.warnings.is_empty());
        assert_eq!(data.anchors.len(), 2);
        assert_eq!(data.anchors[1], Anchor::new(1, 2.5, "World\nagain"));
    }

    #[test]
    fn test_parse_legacy_time_lyric_header() {
        let content = "\u{feff}time,lyric\n00:01.50,First\n01:02.25,\"Second, with comma\"\n";
        let data = parse_anchor_csv(content).unwrap();

        assert_eq!(data.anchors.len(), 2);
        assert_eq!(data.anchors[0].timestamp, 1.5);
        assert_eq!(data.anchors[1].timestamp, 62.25);
        assert_eq!(data.anchors[1].text, "Second, with comma");
    }

    #[test]
    fn test_unquoted_commas_are_rejoined() {
        let data = parse_anchor_csv("timestamp,text\n3,one, two, three").unwrap();
        assert_eq!(data.anchors[0].text, "one, two, three");
    }

    #[test]
    fn test_malformed_rows_are_skipped_with_warning() {
        let content = "timestamp,text\n1.0,ok\nnot-a-time,bad\n2.0\n3.0,   \n4.0,fine";
        let data = parse_anchor_csv(content).unwrap();

        let texts: Vec<_> = data.anchors.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, ["ok", "fine"]);
        assert_eq!(data.anchors[1].block_index, 1, "块序号应连续");
        assert_eq!(data.warnings.len(), 3);
        assert!(data.warnings[0].contains("第 3 行"));
    }

    #[test]
    fn test_oversized_time_row_is_skipped() {
        let content = "timestamp,text\n1.0,ok\n99999999999999999:00:00,huge\n2.0,fine";
        let data = parse_anchor_csv(content).unwrap();

        let texts: Vec<_> = data.anchors.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, ["ok", "fine"]);
        assert_eq!(data.warnings.len(), 1);
        assert!(data.warnings[0].contains("第 3 行"));
    }

    #[test]
    fn test_unknown_header_is_error() {
        let result = parse_anchor_csv("foo,bar\n1,2");
        assert!(matches!(result, Err(ConvertError::InvalidFormat(_))));
    }

    #[test]
    fn test_empty_content_is_empty_result() {
        let data = parse_anchor_csv("\n\n").unwrap();
        assert!(data.anchors.is_empty());
    }
}
