//! Test utilities and scripted collaborators for Perch development.
//!
//! Provides deterministic [`InputSource`] and [`Presenter`]
//! implementations for driving a [`Driver`](perch_engine::Driver)
//! without a real input device, plus config [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::VecDeque;

use perch_engine::{Frame, InputBuffer, InputEvent, InputSource, Presenter};

/// Input that replays a fixed per-frame script, then stays silent.
///
/// Frame `n` of the script is returned by the `n`-th poll.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
    polls: u64,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit per-frame batches.
    pub fn from_frames<F>(frames: impl IntoIterator<Item = F>) -> Self
    where
        F: IntoIterator<Item = InputEvent>,
    {
        Self {
            frames: frames.into_iter().map(|f| f.into_iter().collect()).collect(),
            polls: 0,
        }
    }

    /// One flap every `period` frames for `frames` frames, starting at
    /// frame 0.
    pub fn flap_every(period: u64, frames: u64) -> Self {
        let period = period.max(1);
        Self::from_frames((0..frames).map(|i| {
            if i % period == 0 {
                vec![InputEvent::Flap]
            } else {
                Vec::new()
            }
        }))
    }

    /// Append a frame carrying only [`InputEvent::Quit`].
    pub fn then_quit(mut self) -> Self {
        self.frames.push_back(vec![InputEvent::Quit]);
        self
    }

    /// Number of polls so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Whether every scripted frame has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, out: &mut InputBuffer) {
        self.polls += 1;
        if let Some(batch) = self.frames.pop_front() {
            out.extend(batch);
        }
    }
}

/// Presenter that keeps every frame it is shown.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    frames: Vec<Frame>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames presented so far, in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Primary entity `y` per frame.
    pub fn heights(&self) -> Vec<f32> {
        self.frames.iter().map(|f| f.snapshot.primary.y).collect()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// Presenter that discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &Frame) {}
}
