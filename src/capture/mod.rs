//! # 打点模块
//!
//! 操作者跟随音频逐块"打点"：每次推进时记录当前歌词块相对于开始信号的时间。
//!
//! 会话是一个显式的状态机，所有输入都通过 [`CaptureSession::apply`] 送入，
//! 时间源通过 [`Clock`] 注入，因此同一组指令和时钟读数总能回放出相同的结果。
//!
//! ```text
//! WaitingForStart --start--> AwaitingMark(0)
//! AwaitingMark(i) --advance--> AwaitingMark(i+1) | Done
//! AwaitingMark(i) --undo--> AwaitingMark(i-1)
//! 任意非终止状态 --abort--> Aborted
//! ```

pub mod clock;
pub mod interactive;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::{debug, info};

pub use clock::{Clock, ManualClock, SystemClock};
pub use interactive::run_interactive;

use crate::converter::types::{Anchor, CaptureOptions, ConvertError, LyricBlock};

/// 打点会话的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureState {
    /// 等待开始信号，计时尚未开始。
    WaitingForStart,
    /// 等待为第 `i` 个歌词块打点（从 0 开始）。
    AwaitingMark(usize),
    /// 所有歌词块都已打点。
    Done,
    /// 操作者中止了会话。
    Aborted,
}

impl CaptureState {
    /// 会话是否已经结束。
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, CaptureState::Done | CaptureState::Aborted)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::WaitingForStart => write!(f, "等待开始"),
            CaptureState::AwaitingMark(i) => write!(f, "等待第 {} 块", i + 1),
            CaptureState::Done => write!(f, "已完成"),
            CaptureState::Aborted => write!(f, "已中止"),
        }
    }
}

/// 操作者可以发出的指令。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CaptureCommand {
    /// 开始计时。
    #[strum(serialize = "start")]
    Start,
    /// 为当前块打点并前进到下一块。
    #[strum(serialize = "advance")]
    Advance,
    /// 撤销上一次打点。
    #[strum(serialize = "undo")]
    Undo,
    /// 中止会话。
    #[strum(serialize = "abort")]
    Abort,
}

/// 会话结束后的结果。
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// 所有块都已打点，锚点数量等于块数量。
    Completed(Vec<Anchor>),
    /// 会话被中止，附带已经记录的锚点。
    Aborted {
        /// 中止前记录的锚点
        partial: Vec<Anchor>,
    },
}

impl CaptureOutcome {
    /// 返回结果中的锚点，不区分是否完成。
    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        match self {
            CaptureOutcome::Completed(anchors) | CaptureOutcome::Aborted { partial: anchors } => {
                anchors
            }
        }
    }
}

/// 一次打点会话。
#[derive(Debug)]
pub struct CaptureSession<C: Clock> {
    blocks: Vec<LyricBlock>,
    options: CaptureOptions,
    clock: C,
    state: CaptureState,
    started_at: Option<Duration>,
    anchors: Vec<Anchor>,
}

impl<C: Clock> CaptureSession<C> {
    /// 为一组歌词块创建新的会话。
    pub fn new(blocks: Vec<LyricBlock>, options: CaptureOptions, clock: C) -> Self {
        let capacity = blocks.len();
        Self {
            blocks,
            options,
            clock,
            state: CaptureState::WaitingForStart,
            started_at: None,
            anchors: Vec::with_capacity(capacity),
        }
    }

    /// 当前状态。
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// 会话选项。
    pub fn options(&self) -> &CaptureOptions {
        &self.options
    }

    /// 会话中的所有歌词块。
    pub fn blocks(&self) -> &[LyricBlock] {
        &self.blocks
    }

    /// 已经记录的锚点。
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// 正在等待打点的歌词块。
    pub fn current_block(&self) -> Option<&LyricBlock> {
        match self.state {
            CaptureState::AwaitingMark(i) => self.blocks.get(i),
            _ => None,
        }
    }

    /// 自开始信号起经过的秒数，已扣除预备时长且不小于 0。开始前为 `None`。
    pub fn elapsed_seconds(&self) -> Option<f64> {
        let started_at = self.started_at?;
        let elapsed = self.clock.now().saturating_sub(started_at).as_secs_f64();
        Some((elapsed - self.options.count_in_seconds).max(0.0))
    }

    /// 执行一条指令并返回新的状态。
    ///
    /// # 错误
    /// 指令在当前状态下不允许时返回 `ConvertError::InvalidCaptureTransition`，会话保持不变。
    pub fn apply(&mut self, command: CaptureCommand) -> Result<CaptureState, ConvertError> {
        let next = match (self.state, command) {
            (CaptureState::WaitingForStart, CaptureCommand::Start) => {
                self.started_at = Some(self.clock.now());
                info!("开始打点，共 {} 个歌词块", self.blocks.len());
                if self.blocks.is_empty() {
                    CaptureState::Done
                } else {
                    CaptureState::AwaitingMark(0)
                }
            }
            (CaptureState::AwaitingMark(i), CaptureCommand::Advance) => {
                let timestamp = self.elapsed_seconds().unwrap_or(0.0);
                let text = self.blocks.get(i).map(|b| b.text.clone()).unwrap_or_default();
                debug!(block_index = i, timestamp, "记录锚点");
                self.anchors.push(Anchor::new(i, timestamp, text));
                if i + 1 >= self.blocks.len() {
                    CaptureState::Done
                } else {
                    CaptureState::AwaitingMark(i + 1)
                }
            }
            (CaptureState::AwaitingMark(i), CaptureCommand::Undo) => {
                if i == 0 {
                    debug!("没有可撤销的锚点");
                    CaptureState::AwaitingMark(0)
                } else {
                    self.anchors.pop();
                    debug!(block_index = i - 1, "撤销锚点");
                    CaptureState::AwaitingMark(i - 1)
                }
            }
            (state, CaptureCommand::Abort) if !state.is_terminal() => {
                info!("打点已中止，保留了 {} 个锚点", self.anchors.len());
                CaptureState::Aborted
            }
            (state, command) => {
                return Err(ConvertError::InvalidCaptureTransition {
                    state: state.to_string(),
                    command: command.to_string(),
                });
            }
        };

        self.state = next;
        Ok(next)
    }

    /// 结束会话并取出结果。
    ///
    /// 只有处于 `Done` 状态时才是完整结果；其余状态都按中止处理。
    pub fn into_outcome(self) -> CaptureOutcome {
        match self.state {
            CaptureState::Done => CaptureOutcome::Completed(self.anchors),
            _ => CaptureOutcome::Aborted {
                partial: self.anchors,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn blocks(texts: &[&str]) -> Vec<LyricBlock> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| LyricBlock::new(i, *t))
            .collect()
    }

    fn session(texts: &[&str], count_in: f64) -> (CaptureSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let options = CaptureOptions {
            count_in_seconds: count_in,
            ..Default::default()
        };
        (
            CaptureSession::new(blocks(texts), options, clock.clone()),
            clock,
        )
    }

    #[test]
    fn test_full_capture_records_one_anchor_per_block() {
        let (mut session, clock) = session(&["a", "b", "c"], 0.0);
        clock.set(10.0);
        session.apply(CaptureCommand::Start).unwrap();

        for step in [1.0, 2.5, 4.0] {
            clock.set(10.0 + step);
            session.apply(CaptureCommand::Advance).unwrap();
        }

        assert_eq!(session.state(), CaptureState::Done);
        let CaptureOutcome::Completed(anchors) = session.into_outcome() else {
            panic!("会话应当完成");
        };
        let times: Vec<f64> = anchors.iter().map(|a| a.timestamp).collect();
        assert_eq!(times, [1.0, 2.5, 4.0]);
        assert_eq!(anchors[2].text, "c");
    }

    #[test]
    fn test_undo_discards_last_anchor() {
        let (mut session, clock) = session(&["a", "b"], 0.0);
        session.apply(CaptureCommand::Start).unwrap();

        assert_eq!(
            session.apply(CaptureCommand::Undo).unwrap(),
            CaptureState::AwaitingMark(0),
            "第一个块之前撤销应当无效果"
        );

        clock.set(1.0);
        session.apply(CaptureCommand::Advance).unwrap();
        session.apply(CaptureCommand::Undo).unwrap();
        assert!(session.anchors().is_empty());
        assert_eq!(session.current_block().unwrap().text, "a");

        clock.set(1.25);
        session.apply(CaptureCommand::Advance).unwrap();
        assert_eq!(session.anchors()[0].timestamp, 1.25);
    }

    #[test]
    fn test_count_in_is_subtracted_and_floored() {
        let (mut session, clock) = session(&["a", "b"], 2.0);
        session.apply(CaptureCommand::Start).unwrap();

        clock.set(1.0);
        session.apply(CaptureCommand::Advance).unwrap();
        clock.set(3.5);
        session.apply(CaptureCommand::Advance).unwrap();

        let anchors = session.into_outcome();
        let times: Vec<f64> = anchors.anchors().iter().map(|a| a.timestamp).collect();
        assert_eq!(times, [0.0, 1.5]);
    }

    #[test]
    fn test_abort_keeps_partial_anchors() {
        let (mut session, clock) = session(&["a", "b", "c"], 0.0);
        session.apply(CaptureCommand::Start).unwrap();
        clock.set(0.5);
        session.apply(CaptureCommand::Advance).unwrap();
        session.apply(CaptureCommand::Abort).unwrap();

        assert_eq!(
            session.into_outcome(),
            CaptureOutcome::Aborted {
                partial: vec![Anchor::new(0, 0.5, "a")]
            }
        );
    }

    #[test]
    fn test_invalid_transitions_leave_session_unchanged() {
        let (mut session, _clock) = session(&["a"], 0.0);

        let err = session.apply(CaptureCommand::Advance).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidCaptureTransition { ref command, .. } if command == "advance"
        ));
        assert_eq!(session.state(), CaptureState::WaitingForStart);

        session.apply(CaptureCommand::Start).unwrap();
        assert!(session.apply(CaptureCommand::Start).is_err());
        session.apply(CaptureCommand::Advance).unwrap();
        assert!(session.apply(CaptureCommand::Abort).is_err(), "终止状态不能再中止");
        assert_eq!(session.anchors().len(), 1);
    }

    #[test]
    fn test_empty_block_list_finishes_on_start() {
        let (mut session, _clock) = session(&[], 0.0);
        assert_eq!(
            session.apply(CaptureCommand::Start).unwrap(),
            CaptureState::Done
        );
        assert_eq!(session.into_outcome(), CaptureOutcome::Completed(vec![]));
    }

    #[test]
    fn test_command_names() {
        assert_eq!(CaptureCommand::Undo.to_string(), "undo");
        assert_eq!(
            CaptureCommand::from_str("ABORT").unwrap(),
            CaptureCommand::Abort
        );
    }
}
