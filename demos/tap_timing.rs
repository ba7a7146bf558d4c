//! 用于演示 `karaoke-time` 库的打点流程。
//!
//! 从 `<歌词目录>/<Artist_Title>.txt` 读取歌词，跟随音频在终端中逐块按回车打点，
//! 完成后把锚点表格与 ASS 字幕写入输出目录。
//!
//! ## 如何运行
//!
//! ```bash
//! cargo run --example tap_timing -- "Artist" "Title" ./lyrics ./output
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
};

use chrono::Local;
use karaoke_time_rs::{
    KaraokeHelper, Song,
    capture::{CaptureOutcome, SystemClock, run_interactive},
    converter::{processors::artifact_io::save_anchor_csv, types::ArtifactFormat},
    error::{KaraokeError, Result},
    providers::LocalTextProvider,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,karaoke_time_rs=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [artist, title, lyrics_dir, rest @ ..] = args.as_slice() else {
        eprintln!("用法: tap_timing <艺术家> <标题> <歌词目录> [输出目录]");
        return Ok(());
    };
    let output_dir = rest.first().map_or_else(|| PathBuf::from("."), PathBuf::from);
    let song = Song::new(artist.as_str(), title.as_str());

    let mut helper = KaraokeHelper::from_user_config();
    helper.add_provider(Box::new(LocalTextProvider::new(lyrics_dir)));

    let Some(lyrics) = helper.fetch_lyrics(&song).await? else {
        error!("没有找到 '{}' 的歌词，程序退出。", song.label());
        return Err(KaraokeError::LyricNotFound);
    };
    let blocks = lyrics.blocks();
    info!("从 '{}' 获取到 {} 个歌词块。", lyrics.provider, blocks.len());

    let session = helper.capture_session(blocks, SystemClock::new());
    let stdin = io::stdin();
    let outcome = run_interactive(session, stdin.lock(), io::stdout())?;
    io::stdout().flush()?;

    let now = Local::now();
    match outcome {
        CaptureOutcome::Completed(anchors) => {
            let written = helper.write_session_artifacts(&output_dir, &song, &anchors, &now)?;
            info!("锚点表格: {:?}", written.anchor_csv);
            info!("ASS 字幕: {:?}", written.ass);
        }
        CaptureOutcome::Aborted { partial } if partial.is_empty() => {
            warn!("会话已中止，没有记录任何锚点。");
        }
        CaptureOutcome::Aborted { partial } => {
            let path = output_dir.join(format!(
                "partial_{}",
                song.session_file_name(ArtifactFormat::AnchorCsv, &now)
            ));
            save_anchor_csv(&path, &partial)?;
            warn!("会话已中止，已把 {} 个锚点保存到 {:?}", partial.len(), path);
        }
    }

    Ok(())
}
