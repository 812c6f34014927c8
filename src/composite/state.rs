use crate::foundation::error::{VersusError, VersusResult};

/// Stage of one compositor run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Nothing started yet.
    Idle,
    /// Rendering and encoding the base clip.
    RenderingFrames,
    /// Base clip written to its intermediate file.
    BaseClipReady,
    /// Planning layers and mixing audio.
    Compositing,
    /// Writing the final container.
    Encoding,
    /// Output file in place.
    Done,
    /// Aborted; intermediates are released.
    Failed,
}

impl RunState {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::RenderingFrames),
            Self::RenderingFrames => Some(Self::BaseClipReady),
            Self::BaseClipReady => Some(Self::Compositing),
            Self::Compositing => Some(Self::Encoding),
            Self::Encoding => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::RenderingFrames => "rendering frames",
            Self::BaseClipReady => "base clip ready",
            Self::Compositing => "compositing",
            Self::Encoding => "encoding",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

/// Enforces the linear run lifecycle; `Failed` is reachable from every non-terminal state.
#[derive(Debug)]
pub struct RunTracker {
    state: RunState,
    visited: Vec<RunState>,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTracker {
    /// Start in [`RunState::Idle`].
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            visited: vec![RunState::Idle],
        }
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every state entered so far, in order.
    pub fn visited(&self) -> &[RunState] {
        &self.visited
    }

    /// Move to `to`, which must be the direct successor of the current state.
    pub fn advance(&mut self, to: RunState) -> VersusResult<()> {
        if self.state.next() != Some(to) {
            return Err(VersusError::validation(format!(
                "invalid run transition: {} -> {}",
                self.state, to
            )));
        }
        tracing::info!(from = %self.state, to = %to, "run state");
        self.enter(to);
        Ok(())
    }

    /// Mark the run failed and wrap `err` with the stage it happened in.
    pub fn fail(&mut self, err: VersusError) -> VersusError {
        let stage = self.state;
        if !stage.is_terminal() {
            tracing::warn!(stage = %stage, error = %err, "run failed");
            self.enter(RunState::Failed);
        }
        err.in_stage(stage)
    }

    fn enter(&mut self, to: RunState) {
        self.state = to;
        self.visited.push(to);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/state.rs"]
mod tests;
