//! Backend that records frames instead of drawing them

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use super::{DebugOverlay, DrawRequest, RenderBackend, SpriteHandle, SpriteLibrary};
use crate::core::EngineError;

/// Everything one `present` call received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentedFrame {
    /// Draw requests in submission order
    pub draws: Vec<DrawRequest>,
    /// Overlay, if debug output was shown
    pub overlay: Option<DebugOverlay>,
}

#[derive(Debug)]
struct LogState {
    frames: VecDeque<PresentedFrame>,
    capacity: usize,
    total: u64,
}

/// Shared view of the frames a [`HeadlessRenderer`] presented.
///
/// Only the most recent frames are kept.
#[derive(Debug, Clone)]
pub struct FrameLog {
    state: Rc<RefCell<LogState>>,
}

impl FrameLog {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(LogState {
                frames: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
                total: 0,
            })),
        }
    }

    fn push(&self, frame: PresentedFrame) {
        let mut state = self.state.borrow_mut();
        if state.frames.len() >= state.capacity {
            state.frames.pop_front();
        }
        state.frames.push_back(frame);
        state.total += 1;
    }

    /// Most recently presented frame
    pub fn last(&self) -> Option<PresentedFrame> {
        self.state.borrow().frames.back().cloned()
    }

    /// Retained frames, oldest first
    pub fn frames(&self) -> Vec<PresentedFrame> {
        self.state.borrow().frames.iter().cloned().collect()
    }

    /// Number of `present` calls so far, including dropped frames
    pub fn presented(&self) -> u64 {
        self.state.borrow().total
    }
}

/// Render backend without a GPU.
///
/// Sprites are validated on disk through their image header; presented
/// frames go to a [`FrameLog`].
#[derive(Debug)]
pub struct HeadlessRenderer {
    sprites: SpriteLibrary,
    pending: Vec<DrawRequest>,
    log: FrameLog,
    size: (u32, u32),
}

impl HeadlessRenderer {
    const DEFAULT_HISTORY: usize = 64;

    pub fn new() -> Self {
        Self::with_history(Self::DEFAULT_HISTORY)
    }

    /// Keep the last `frames` presented frames
    pub fn with_history(frames: usize) -> Self {
        Self {
            sprites: SpriteLibrary::new(),
            pending: Vec::new(),
            log: FrameLog::with_capacity(frames),
            size: (0, 0),
        }
    }

    /// Handle to the presented frames; stays valid after the renderer is
    /// moved into an engine
    pub fn frame_log(&self) -> FrameLog {
        self.log.clone()
    }

    pub fn sprites(&self) -> &SpriteLibrary {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteLibrary {
        &mut self.sprites
    }

    /// Last size passed to `resize`
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn load_sprite(&mut self, path: &Path) -> Result<SpriteHandle, EngineError> {
        self.sprites.load(path)
    }

    fn submit(&mut self, request: DrawRequest) {
        self.pending.push(request);
    }

    fn present(&mut self, overlay: Option<&DebugOverlay>) {
        log::trace!("Presenting {} draws", self.pending.len());
        self.log.push(PresentedFrame {
            draws: std::mem::take(&mut self.pending),
            overlay: overlay.cloned(),
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Color;
    use glam::Vec2;

    fn request(sprite: u64) -> DrawRequest {
        DrawRequest {
            sprite: SpriteHandle(sprite),
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            tint: Color::WHITE,
            depth: 0,
        }
    }

    #[test]
    fn test_present_flushes_pending_draws() {
        let mut renderer = HeadlessRenderer::new();
        let log = renderer.frame_log();

        renderer.submit(request(1));
        renderer.submit(request(2));
        renderer.present(None);
        renderer.present(None);

        let frames = log.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].draws, vec![request(1), request(2)]);
        assert!(frames[1].draws.is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut renderer = HeadlessRenderer::with_history(2);
        let log = renderer.frame_log();
        for sprite in 0..5 {
            renderer.submit(request(sprite));
            renderer.present(None);
        }

        assert_eq!(log.presented(), 5);
        let frames = log.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].draws[0].sprite, SpriteHandle(3));
    }

    #[test]
    fn test_overlay_is_recorded() {
        let mut renderer = HeadlessRenderer::new();
        let overlay = DebugOverlay {
            lines: vec!["FPS: 60".to_string()],
        };
        renderer.present(Some(&overlay));
        assert_eq!(renderer.frame_log().last().unwrap().overlay, Some(overlay));
    }

    #[test]
    fn test_missing_sprite_is_reported() {
        let mut renderer = HeadlessRenderer::new();
        let result = renderer.load_sprite(Path::new("missing.png"));
        assert!(matches!(result, Err(EngineError::AssetNotFound(_))));
    }
}
