//! The rendering-surface seam.

use std::sync::{Arc, Mutex, PoisonError};

use gazemap_heat_engine::RenderFrame;

/// A heatmap sink. Purely receives frames; never feeds back into the engine.
pub trait RenderSurface: Send {
    /// Replace the displayed density field.
    fn set_data(&mut self, frame: &RenderFrame);

    /// Redraw with the current data.
    fn repaint(&mut self);
}

/// Surface shared between the session and its render loop.
pub type SharedSurface = Arc<Mutex<dyn RenderSurface>>;

/// Wrap a surface for sharing with a session.
pub fn shared<S: RenderSurface + 'static>(surface: S) -> SharedSurface {
    Arc::new(Mutex::new(surface))
}

/// Push one frame to a shared surface.
pub(crate) fn present(surface: &SharedSurface, frame: &RenderFrame) {
    let mut surface = surface.lock().unwrap_or_else(PoisonError::into_inner);
    surface.set_data(frame);
    surface.repaint();
}

/// In-memory surface that keeps the last frame and counts repaints.
///
/// Clones observe the same recording.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    inner: Arc<Mutex<RecorderState>>,
}

#[derive(Debug, Default)]
struct RecorderState {
    last: Option<RenderFrame>,
    frames: u64,
    repaints: u64,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<RenderFrame> {
        self.state().last.clone()
    }

    pub fn frames(&self) -> u64 {
        self.state().frames
    }

    pub fn repaints(&self) -> u64 {
        self.state().repaints
    }

    fn state(&self) -> std::sync::MutexGuard<'_, RecorderState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderSurface for FrameRecorder {
    fn set_data(&mut self, frame: &RenderFrame) {
        let mut state = self.state();
        state.last = Some(frame.clone());
        state.frames += 1;
    }

    fn repaint(&mut self) {
        self.state().repaints += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_clones_share_state() {
        let recorder = FrameRecorder::new();
        let surface = shared(recorder.clone());
        present(&surface, &RenderFrame::default());
        present(&surface, &RenderFrame::default());
        assert_eq!(recorder.frames(), 2);
        assert_eq!(recorder.repaints(), 2);
        assert_eq!(recorder.last_frame(), Some(RenderFrame::default()));
    }
}
