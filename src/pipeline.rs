// One painting session: the persistent canvas plus everything that mutates it.
// Frames go through strictly one at a time:
// mirror → landmarks → gesture step (canvas) → feedback → composite → header.
// Each video session owns its own `Session`; only a `ResetHandle` is shared
// with the operator side.
// Visual: this is where the frame you see gets assembled.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::compose::composite_in_place;
use crate::config::Config;
use crate::draw::{draw_line, draw_ring, fill_circle, fill_rect};
use crate::error::Error;
use crate::hand::{CONNECTIONS, Hand};
use crate::overlay::HeaderStrips;
use crate::paint::{Mode, Painter, StepOutcome};
use crate::tracker::LandmarkProvider;
use crate::types::{Color, FrameBuffer};

const CURSOR_RADIUS: i32 = 15;
const SELECT_BAR_PAD: i32 = 25;
const ERASER_RING: u32 = 0x00C8_C8C8;
const LANDMARK_DOT: u32 = 0x00FF_0000;
const BONE: u32 = 0x00FF_FFFF;

/// Clear request that can be raised from anywhere and is applied at the start
/// of the session's next frame.
#[derive(Clone, Debug, Default)]
pub struct ResetHandle(Arc<AtomicBool>);

impl ResetHandle {
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

pub struct Session {
    canvas: Option<FrameBuffer>,
    painter: Painter,
    headers: HeaderStrips,
    ink_threshold: u8,
    show_landmarks: bool,
    reset: ResetHandle,
    mode: Mode,
}

impl Session {
    pub fn new(config: &Config, headers: HeaderStrips) -> Self {
        Self {
            canvas: None,
            painter: Painter::new(config.brush_thickness, config.eraser_thickness, config.header_height),
            headers,
            ink_threshold: config.ink_threshold,
            show_landmarks: config.show_landmarks,
            reset: ResetHandle::default(),
            mode: Mode::Idle,
        }
    }

    pub fn reset_handle(&self) -> ResetHandle {
        self.reset.clone()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn brush_color(&self) -> Color {
        self.painter.brush.color
    }

    #[cfg(test)]
    pub fn canvas(&self) -> Option<&FrameBuffer> {
        self.canvas.as_ref()
    }

    /// Mirror `frame`, run it through the whole pipeline and return it composited.
    pub fn process(
        &mut self,
        mut frame: FrameBuffer,
        tracker: &mut dyn LandmarkProvider,
    ) -> Result<FrameBuffer, Error> {
        frame.flip_horizontal();
        let hands = tracker.detect(&frame)?;
        self.process_mirrored(frame, &hands)
    }

    /// Same as [`Session::process`] for a frame that is already mirrored and
    /// whose hands are already known. Only the first hand drives the brush.
    pub fn process_mirrored(&mut self, mut frame: FrameBuffer, hands: &[Hand]) -> Result<FrameBuffer, Error> {
        if self.reset.take() {
            log::info!("canvas cleared");
            self.canvas = None;
        }
        if let Some(old) = self.canvas.as_ref().filter(|c| !c.same_size(&frame)) {
            log::info!(
                "frame size changed {}x{} -> {}x{}; canvas reset",
                old.width, old.height, frame.width, frame.height
            );
            self.canvas = None;
        }
        let canvas = self
            .canvas
            .get_or_insert_with(|| FrameBuffer::blank(frame.width, frame.height));

        if self.show_landmarks {
            for hand in hands {
                draw_skeleton(&mut frame, hand);
            }
        }

        let outcome = self.painter.step(canvas, hands.first());
        if outcome.mode != self.mode {
            log::debug!("mode {} -> {}", self.mode.label(), outcome.mode.label());
            self.mode = outcome.mode;
        }
        draw_feedback(&mut frame, &outcome, &self.painter);

        composite_in_place(&mut frame, canvas, self.ink_threshold)?;
        self.headers.stamp(&mut frame, self.painter.brush.color);
        Ok(frame)
    }
}

/// Landmark dots and bones on the live image.
fn draw_skeleton(frame: &mut FrameBuffer, hand: &Hand) {
    for (a, b) in CONNECTIONS {
        let (p, q) = (hand.point(a), hand.point(b));
        draw_line(frame, p.x, p.y, q.x, q.y, BONE);
    }
    for p in hand.points() {
        fill_circle(frame, p.x, p.y, 3, LANDMARK_DOT);
    }
}

/// Cursor hints drawn on the live image (under the composited ink).
fn draw_feedback(frame: &mut FrameBuffer, outcome: &StepOutcome, painter: &Painter) {
    let color = painter.brush.color.packed();
    match (outcome.mode, outcome.index_tip, outcome.middle_tip) {
        (Mode::Draw, Some((x, y)), _) if painter.brush.is_eraser() => {
            draw_ring(frame, x, y, painter.brush.eraser_thickness as i32 / 2, 2, ERASER_RING);
        }
        (Mode::Draw, Some((x, y)), _) => fill_circle(frame, x, y, CURSOR_RADIUS, color),
        (Mode::Select, Some((x1, y1)), Some((x2, y2))) => {
            fill_rect(frame, (x1, y1 - SELECT_BAR_PAD), (x2, y2 + SELECT_BAR_PAD), color);
        }
        _ => {}
    }
}
