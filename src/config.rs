//! 负责处理应用的持久化配置。
//!
//! 配置以 JSON 形式保存在 `<用户配置目录>/karaoke-time/config.json`，
//! 文件缺失时使用默认值，缺失的字段同样回落到默认值。

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    converter::{processors::artifact_io::write_text_file, types::KaraokeOptions},
    error::{KaraokeError, Result},
};

/// 配置目录的名称
const CONFIG_DIR_NAME: &str = "karaoke-time";
/// 配置文件的名称
const CONFIG_FILE_NAME: &str = "config.json";

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "config.json"。
pub fn get_config_file_path(filename: &str) -> Result<PathBuf> {
    let mut config_dir = dirs::config_dir().ok_or(KaraokeError::ConfigDirNotFound)?;
    config_dir.push(CONFIG_DIR_NAME);
    config_dir.push(filename);
    Ok(config_dir)
}

/// 从指定路径加载配置。文件不存在时返回默认配置。
pub fn load_options_from(path: &Path) -> Result<KaraokeOptions> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let options: KaraokeOptions = serde_json::from_str(&content)?;
            info!("已从 {:?} 加载配置。", path);
            Ok(options)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("配置文件 {:?} 不存在，将使用默认配置。", path);
            Ok(KaraokeOptions::default())
        }
        Err(e) => Err(KaraokeError::File {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// 将配置序列化为 JSON 并保存到指定路径。
pub fn save_options_to(options: &KaraokeOptions, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(options)?;
    write_text_file(path, &content)?;
    info!("配置已保存到 {:?}。", path);
    Ok(())
}

/// 从默认位置加载配置。
pub fn load_options() -> Result<KaraokeOptions> {
    load_options_from(&get_config_file_path(CONFIG_FILE_NAME)?)
}

/// 将配置保存到默认位置。
pub fn save_options(options: &KaraokeOptions) -> Result<()> {
    save_options_to(options, &get_config_file_path(CONFIG_FILE_NAME)?)
}

/// 加载配置，失败时记录警告并回落到默认配置。
pub fn load_options_or_default() -> KaraokeOptions {
    load_options().unwrap_or_else(|e| {
        warn!("加载配置失败，将使用默认配置: {}", e);
        KaraokeOptions::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("karaoke_time_config_{}_{}", name, std::process::id()))
            .join(CONFIG_FILE_NAME)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let options = load_options_from(&scratch_path("missing")).unwrap();
        assert_eq!(options, KaraokeOptions::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("roundtrip");
        let mut options = KaraokeOptions::default();
        options.timing.spacing_seconds = 0.25;
        options.capture.count_in_seconds = 4.0;
        options.style.font_name = "Arial".to_string();

        save_options_to(&options, &path).unwrap();
        let loaded = load_options_from(&path).unwrap();

        assert_eq!(loaded, options);
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let options: KaraokeOptions =
            serde_json::from_str(r#"{"timing": {"tail_duration_seconds": 5.0}}"#).unwrap();
        assert_eq!(options.timing.tail_duration_seconds, 5.0);
        assert_eq!(options.timing.spacing_seconds, 0.1);
        assert_eq!(options.style, Default::default());
    }

    #[test]
    fn test_default_path_layout() {
        if let Ok(path) = get_config_file_path(CONFIG_FILE_NAME) {
            assert!(path.ends_with("karaoke-time/config.json"));
        }
    }
}
