use karaoke_time_rs::{
    capture::{CaptureOutcome, CaptureSession, ManualClock, run_interactive},
    converter::{
        parsers::lyrics_text_parser::parse_lyric_blocks,
        processors::{artifact_io::read_text_file, interval_resolver::resolve_cues},
        types::{CaptureOptions, TimingOptions},
    },
};

use std::{
    collections::VecDeque,
    io::{self, BufRead, Read},
    path::Path,
};

/// 模拟操作者：每读取一行输入前，把时钟拨到该次按键发生的时刻。
struct ScriptedOperator {
    clock: ManualClock,
    script: VecDeque<(f64, String)>,
    current: Vec<u8>,
    pos: usize,
}

impl ScriptedOperator {
    fn new(clock: ManualClock, script: &[(f64, &str)]) -> Self {
        Self {
            clock,
            script: script
                .iter()
                .map(|(t, line)| (*t, (*line).to_string()))
                .collect(),
            current: Vec::new(),
            pos: 0,
        }
    }
}

impl Read for ScriptedOperator {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for ScriptedOperator {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.current.len()
            && let Some((at, line)) = self.script.pop_front()
        {
            self.clock.set(at);
            self.current = format!("{line}\n").into_bytes();
            self.pos = 0;
        }
        Ok(&self.current[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos += amt;
    }
}

fn lyric_blocks() -> Vec<karaoke_time_rs::converter::types::LyricBlock> {
    let content = read_text_file(&Path::new("tests/test_data").join("lanterns.txt")).unwrap();
    parse_lyric_blocks(&content)
}

#[test_log::test]
fn test_replay_with_undo_and_count_in() {
    let blocks = lyric_blocks();
    assert_eq!(blocks.len(), 4);

    let clock = ManualClock::new();
    let options = CaptureOptions {
        count_in_seconds: 2.0,
        ..Default::default()
    };
    let session = CaptureSession::new(blocks, options, clock.clone());
    let operator = ScriptedOperator::new(
        clock,
        &[
            (5.0, ""),      // 开始
            (19.4, ""),     // 第 1 块
            (25.0, " "),    // 第 2 块，按得太早
            (25.5, "u"),    // 撤销
            (26.85, "x"),   // 第 2 块，误按的键也算打点
            (34.1, ""),     // 第 3 块
            (41.6, ""),     // 第 4 块
        ],
    );

    let outcome = run_interactive(session, operator, io::sink()).unwrap();

    let CaptureOutcome::Completed(anchors) = outcome else {
        panic!("回放应当完成，实际为 {outcome:?}");
    };
    let times: Vec<f64> = anchors.iter().map(|a| a.timestamp).collect();
    let expected = [12.4, 19.85, 27.1, 34.6];
    for (actual, expected) in times.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
    }
    assert_eq!(anchors[3].text, "We were never far apart");

    let cues = resolve_cues(&anchors, &TimingOptions::default());
    assert_eq!(cues.len(), 4);
    assert!((cues[3].end - (34.6 + 3.0)).abs() < 1e-6);
}

#[test_log::test]
fn test_replay_interrupted_by_end_of_input() {
    let clock = ManualClock::new();
    let options = CaptureOptions {
        require_start_confirmation: false,
        ..Default::default()
    };
    let session = CaptureSession::new(lyric_blocks(), options, clock.clone());
    let operator = ScriptedOperator::new(clock, &[(1.5, ""), (3.0, "")]);

    let outcome = run_interactive(session, operator, io::sink()).unwrap();

    match outcome {
        CaptureOutcome::Aborted { partial } => {
            let times: Vec<f64> = partial.iter().map(|a| a.timestamp).collect();
            assert_eq!(times, [1.5, 3.0]);
        }
        other => panic!("输入结束应当中止会话，实际为 {other:?}"),
    }
}

#[test]
fn test_quit_keeps_partial_anchors() {
    let clock = ManualClock::new();
    let session = CaptureSession::new(lyric_blocks(), CaptureOptions::default(), clock.clone());
    let operator = ScriptedOperator::new(clock, &[(0.0, ""), (1.0, ""), (2.0, "q"), (3.0, "")]);

    let mut transcript = Vec::new();
    let outcome = run_interactive(session, operator, &mut transcript).unwrap();

    assert_eq!(outcome.anchors().len(), 1);
    assert!(matches!(outcome, CaptureOutcome::Aborted { .. }));
    let transcript = String::from_utf8(transcript).unwrap();
    assert!(transcript.contains("[1/4] Lanterns on the water / Drifting where the river bends"));
    assert!(transcript.contains("已中止"));
}
