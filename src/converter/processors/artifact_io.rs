//! 产物文件的读写。
//!
//! 每次写入都在一个作用域内完成：文件句柄在成功与失败的所有路径上都会被关闭。
//! 引擎不对同一首歌的产物文件加跨进程锁，并发编辑的串行化由调用方负责。

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use tracing::{info, warn};

use crate::converter::{
    generators::{anchor_csv_generator::generate_anchor_csv, ass_generator::generate_ass},
    parsers::{
        anchor_csv_parser::parse_anchor_csv, asr_json_parser::parse_asr_json,
        lyrics_text_parser::parse_lyric_blocks,
    },
    types::{
        Anchor, ArtifactFormat, AsrSegment, AssStyleOptions, ConvertError, Cue, LyricBlock,
        ParsedAnchorData,
    },
};

/// 从文件路径的扩展名推断产物格式。
pub fn format_from_path(path: &Path) -> Option<ArtifactFormat> {
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(ArtifactFormat::from_extension)
}

/// 读取整个文本文件，错误中附带文件路径。
pub fn read_text_file(path: &Path) -> Result<String, ConvertError> {
    fs::read_to_string(path).map_err(|e| ConvertError::file_read(path, e))
}

/// 把文本内容写入文件，必要时创建父目录。
///
/// # 错误
/// 任何一步失败都返回 `ConvertError::FileWrite`，其中的路径总是目标文件 `path`。
pub fn write_text_file(path: &Path, content: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ConvertError::file_write(path, e))?;
    }

    let file = File::create(path).map_err(|e| ConvertError::file_write(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| ConvertError::file_write(path, e))?;

    Ok(())
}

/// 读取并解析打点表格文件。
pub fn load_anchor_csv(path: &Path) -> Result<ParsedAnchorData, ConvertError> {
    let data = parse_anchor_csv(&read_text_file(path)?)?;
    if !data.warnings.is_empty() {
        warn!("读取 {:?} 时跳过了 {} 行", path, data.warnings.len());
    }
    Ok(data)
}

/// 把锚点保存为打点表格文件。
pub fn save_anchor_csv(path: &Path, anchors: &[Anchor]) -> Result<(), ConvertError> {
    write_text_file(path, &generate_anchor_csv(anchors)?)?;
    info!("已保存 {} 个锚点到 {:?}", anchors.len(), path);
    Ok(())
}

/// 读取以空行分段的纯文本歌词文件。
pub fn load_lyric_blocks(path: &Path) -> Result<Vec<LyricBlock>, ConvertError> {
    Ok(parse_lyric_blocks(&read_text_file(path)?))
}

/// 读取语音识别 JSON 文件。
pub fn load_asr_segments(path: &Path) -> Result<Vec<AsrSegment>, ConvertError> {
    parse_asr_json(&read_text_file(path)?)
}

/// 生成 ASS 文档并写入文件。
pub fn write_ass_file(
    path: &Path,
    cues: &[Cue],
    style: &AssStyleOptions,
    title: &str,
) -> Result<(), ConvertError> {
    let content = generate_ass(cues, style, title)?;
    write_text_file(path, &content)?;
    info!("已写入 {} 条字幕到 {:?}", cues.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "karaoke_time_artifact_io_{}_{}",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            format_from_path(Path::new("out/song.CSV")),
            Some(ArtifactFormat::AnchorCsv)
        );
        assert_eq!(
            format_from_path(Path::new("song.ass")),
            Some(ArtifactFormat::Ass)
        );
        assert_eq!(format_from_path(Path::new("song")), None);
    }

    #[test]
    fn test_save_and_load_anchor_csv_creates_parent_dirs() {
        let dir = scratch_dir("csv");
        let path = dir.join("nested").join("song.csv");
        let anchors = vec![Anchor::new(0, 0.5, "a"), Anchor::new(1, 1.75, "b\nc")];

        save_anchor_csv(&path, &anchors).unwrap();
        let loaded = load_anchor_csv(&path).unwrap();

        assert_eq!(loaded.anchors, anchors);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_ass_write_reports_target_path() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not_a_dir");
        fs::write(&blocker, "plain file").unwrap();
        let target = blocker.join("song.ass");
        let cues = vec![Cue {
            start: 0.0,
            end: 1.0,
            text: "a".to_string(),
            fade_in_ms: 0,
            fade_out_ms: 0,
        }];

        let result = write_ass_file(&target, &cues, &AssStyleOptions::default(), "t");

        match result {
            Err(ConvertError::FileWrite { path, .. }) => assert_eq!(path, target),
            other => panic!("应返回 FileWrite 错误，实际为 {other:?}"),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_lyric_blocks_from_file() {
        let dir = scratch_dir("blocks");
        let path = dir.join("lyrics.txt");
        write_text_file(&path, "First line\nsecond line\n\n\nChorus here\n").unwrap();

        let blocks = load_lyric_blocks(&path).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "First line\nsecond line");
        assert_eq!(blocks[1].index, 1);
        assert_eq!(blocks[1].text, "Chorus here");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let path = scratch_dir("missing").join("nope.txt");
        match read_text_file(&path) {
            Err(ConvertError::FileRead { path: p, .. }) => assert_eq!(p, path),
            other => panic!("应返回 FileRead 错误，实际为 {other:?}"),
        }
    }
}
