// Gesture-driven drawing state: brush, stroke cursor and the per-frame step.
// Each frame is one transition of a small Mealy machine:
// • Select (index + middle up): stop the stroke; inside the header band,
//   touching a palette swatch changes the brush color.
// • Draw (index up, middle down): extend the stroke to the index tip.
// • Idle (anything else, or no hand): stop the stroke.
// Visual: ink appears on the canvas only while you point with one finger.

use crate::draw::draw_thick_line;
use crate::gesture::{FingerState, classify};
use crate::hand::Hand;
use crate::types::{Color, FrameBuffer};

pub const PINK: Color = Color::new(255, 0, 255);
pub const ORANGE: Color = Color::new(255, 100, 0);
pub const GREEN: Color = Color::new(0, 255, 0);
/// Painting with the canvas' blank color clears ink: this is the eraser.
pub const ERASER: Color = Color::new(0, 0, 0);

/// Header swatch regions as fractions of frame width (exclusive bounds),
/// left to right, and the color each one selects.
pub const PALETTE_BANDS: [(f32, f32, Color); 4] = [
    (0.20, 0.35, PINK),
    (0.43, 0.58, ORANGE),
    (0.62, 0.74, GREEN),
    (0.82, 0.94, ERASER),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Select,
    Draw,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Idle => "IDLE",
            Mode::Select => "SELECT",
            Mode::Draw => "DRAW",
        }
    }

    pub fn from_fingers(fingers: FingerState) -> Self {
        match (fingers.index(), fingers.middle()) {
            (true, true) => Mode::Select,
            (true, false) => Mode::Draw,
            _ => Mode::Idle,
        }
    }
}

/// Active color plus the two stroke widths it chooses between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrushState {
    pub color: Color,
    pub brush_thickness: u32,
    pub eraser_thickness: u32,
}

impl BrushState {
    pub fn is_eraser(&self) -> bool {
        self.color == ERASER
    }

    pub fn thickness(&self) -> u32 {
        if self.is_eraser() { self.eraser_thickness } else { self.brush_thickness }
    }
}

/// Where the last stroke segment ended. `None` = next Draw frame starts a new stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrokePath {
    cursor: Option<(i32, i32)>,
}

impl StrokePath {
    #[cfg(test)]
    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    pub fn lift(&mut self) {
        self.cursor = None;
    }
}

/// What happened on one frame; the session turns this into on-screen feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub mode: Mode,
    pub index_tip: Option<(i32, i32)>,
    pub middle_tip: Option<(i32, i32)>,
    /// Set when this frame's selection changed the brush color.
    pub selected: Option<Color>,
}

#[derive(Clone, Debug)]
pub struct Painter {
    pub brush: BrushState,
    pub stroke: StrokePath,
    pub header_height: i32,
}

impl Painter {
    pub fn new(brush_thickness: u32, eraser_thickness: u32, header_height: i32) -> Self {
        Self {
            brush: BrushState { color: PINK, brush_thickness, eraser_thickness },
            stroke: StrokePath::default(),
            header_height,
        }
    }

    /// Advance one frame. Only the canvas and this painter are mutated.
    pub fn step(&mut self, canvas: &mut FrameBuffer, hand: Option<&Hand>) -> StepOutcome {
        let mode = Mode::from_fingers(classify(hand));
        let index_tip = hand.map(Hand::index_tip);
        let middle_tip = hand.map(Hand::middle_tip);
        let mut selected = None;

        match (mode, index_tip) {
            (Mode::Select, Some((x1, y1))) => {
                self.stroke.lift();
                if y1 < self.header_height {
                    if let Some(color) = swatch_at(x1, canvas.width) {
                        if color != self.brush.color {
                            log::debug!("brush color -> {:?}", color);
                        }
                        self.brush.color = color;
                        selected = Some(color);
                    }
                }
            }
            (Mode::Draw, Some(tip)) => {
                // First frame of a stroke: anchor here so no segment jumps in from elsewhere.
                let from = self.stroke.cursor.unwrap_or(tip);
                draw_thick_line(canvas, from, tip, self.brush.thickness(), self.brush.color.packed());
                self.stroke.cursor = Some(tip);
            }
            _ => self.stroke.lift(),
        }

        StepOutcome { mode, index_tip, middle_tip, selected }
    }
}

/// Palette color whose band contains `x` on a frame `width` pixels wide.
pub fn swatch_at(x: i32, width: usize) -> Option<Color> {
    let x = x as f32;
    let w = width as f32;
    PALETTE_BANDS
        .iter()
        .find(|(lo, hi, _)| w * lo < x && x < w * hi)
        .map(|(_, _, color)| *color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAW: [bool; 5] = [false, true, false, false, false];
    const SELECT: [bool; 5] = [false, true, true, false, false];
    const FIST: [bool; 5] = [false; 5];

    fn painter() -> Painter {
        Painter::new(15, 100, 125)
    }

    #[test]
    fn index_only_draws() {
        let mut canvas = FrameBuffer::blank(640, 480);
        let mut p = painter();
        let out = p.step(&mut canvas, Some(&Hand::posed(DRAW, (300, 300))));
        assert_eq!(out.mode, Mode::Draw);
        assert_eq!(canvas.get(300, 300), PINK.packed());
        assert_eq!(p.stroke.cursor(), Some((300, 300)));
    }

    #[test]
    fn select_leaves_canvas_alone() {
        let mut canvas = FrameBuffer::blank(640, 480);
        let mut p = painter();
        p.step(&mut canvas, Some(&Hand::posed(DRAW, (300, 300))));
        let before = canvas.clone();
        let out = p.step(&mut canvas, Some(&Hand::posed(SELECT, (320, 300))));
        assert_eq!(out.mode, Mode::Select);
        assert_eq!(canvas, before);
        assert_eq!(p.stroke.cursor(), None);
    }

    #[test]
    fn selecting_green_band_then_drawing_in_green() {
        let mut canvas = FrameBuffer::blank(450, 400);
        let mut p = painter();
        let out = p.step(&mut canvas, Some(&Hand::posed(SELECT, (300, 50))));
        assert_eq!(out.selected, Some(GREEN));
        assert_eq!(p.brush.color, GREEN);

        p.step(&mut canvas, Some(&Hand::posed(DRAW, (200, 300))));
        assert_eq!(canvas.get(200, 300), GREEN.packed());
    }

    #[test]
    fn selection_outside_header_keeps_color() {
        let mut canvas = FrameBuffer::blank(450, 400);
        let mut p = painter();
        p.step(&mut canvas, Some(&Hand::posed(SELECT, (300, 200))));
        assert_eq!(p.brush.color, PINK);
    }

    #[test]
    fn stroke_is_chained_segments_not_one_chord() {
        let mut canvas = FrameBuffer::blank(400, 400);
        let mut p = Painter::new(3, 100, 0);
        // An L-shaped path: a single P0-P2 chord would cross (200, 200).
        for tip in [(100, 300), (300, 300), (300, 100)] {
            p.step(&mut canvas, Some(&Hand::posed(DRAW, tip)));
        }
        assert_eq!(canvas.get(200, 300), PINK.packed());
        assert_eq!(canvas.get(300, 200), PINK.packed());
        assert_eq!(canvas.get(200, 200), 0);
    }

    #[test]
    fn lifting_the_hand_breaks_the_stroke() {
        let mut canvas = FrameBuffer::blank(400, 400);
        let mut p = Painter::new(3, 100, 0);
        p.step(&mut canvas, Some(&Hand::posed(DRAW, (50, 300))));
        p.step(&mut canvas, None);
        assert_eq!(p.stroke.cursor(), None);
        p.step(&mut canvas, Some(&Hand::posed(FIST, (150, 300))));
        p.step(&mut canvas, Some(&Hand::posed(DRAW, (350, 300))));
        assert_eq!(canvas.get(200, 300), 0);
    }

    #[test]
    fn eraser_uses_wide_blank_stroke() {
        let mut canvas = FrameBuffer::blank(400, 400);
        let mut p = Painter::new(15, 100, 125);
        p.step(&mut canvas, Some(&Hand::posed(DRAW, (200, 250))));
        p.step(&mut canvas, Some(&Hand::posed(DRAW, (240, 250))));
        assert_eq!(canvas.get(220, 250), PINK.packed());

        p.brush.color = ERASER;
        p.stroke.lift();
        assert_eq!(p.brush.thickness(), 100);
        p.step(&mut canvas, Some(&Hand::posed(DRAW, (220, 250))));
        assert!(canvas.pixels.iter().all(|px| *px == 0));
    }

    #[test]
    fn bands_are_fractions_of_width() {
        assert_eq!(swatch_at(300, 1280), Some(PINK));
        assert_eq!(swatch_at(600, 1280), Some(ORANGE));
        assert_eq!(swatch_at(900, 1280), Some(GREEN));
        assert_eq!(swatch_at(1100, 1280), Some(ERASER));
        assert_eq!(swatch_at(150, 640), Some(PINK));
        assert_eq!(swatch_at(100, 1280), None);
        assert_eq!(swatch_at(760, 1280), None); // gap between orange and green
    }

    /* ---------- arbitrary hands ---------- */

    use crate::hand::{LANDMARK_COUNT, Landmark, landmarks};
    use proptest::prelude::*;

    const SIDE: i32 = 400;

    /// Put `tip` strictly above (up) or level with / below (down) its PIP joint.
    fn force(pts: &mut [Landmark; LANDMARK_COUNT], tip: usize, up: bool) {
        let pip = tip - 2;
        if up {
            pts[pip].y = pts[pip].y.max(1);
            pts[tip].y %= pts[pip].y;
        } else {
            pts[tip].y = pts[tip].y.max(pts[pip].y);
        }
    }

    /// 21 random in-frame points with the index and middle fingers forced.
    fn arb_hand(index_up: bool, middle_up: bool) -> impl Strategy<Value = Hand> {
        prop::collection::vec((0..SIDE, 0..SIDE), LANDMARK_COUNT).prop_map(move |xy| {
            let mut pts = [Landmark::default(); LANDMARK_COUNT];
            for (p, (x, y)) in pts.iter_mut().zip(xy) {
                *p = Landmark { x, y };
            }
            force(&mut pts, landmarks::INDEX_TIP, index_up);
            force(&mut pts, landmarks::MIDDLE_TIP, middle_up);
            Hand::new(pts)
        })
    }

    proptest! {
        #[test]
        fn index_up_middle_down_always_draws(hand in arb_hand(true, false)) {
            let mut canvas = FrameBuffer::blank(SIDE as usize, SIDE as usize);
            let mut p = painter();
            let out = p.step(&mut canvas, Some(&hand));
            prop_assert_eq!(out.mode, Mode::Draw);
            let (x, y) = hand.index_tip();
            prop_assert_eq!(canvas.get(x as usize, y as usize), PINK.packed());
            prop_assert_eq!(p.stroke.cursor(), Some((x, y)));
        }

        #[test]
        fn index_and_middle_up_never_touch_canvas(hand in arb_hand(true, true)) {
            let mut canvas = FrameBuffer::blank(SIDE as usize, SIDE as usize);
            let mut p = painter();
            p.step(&mut canvas, Some(&Hand::posed(DRAW, (200, 300))));
            let before = canvas.clone();
            let out = p.step(&mut canvas, Some(&hand));
            prop_assert_eq!(out.mode, Mode::Select);
            prop_assert_eq!(canvas, before);
            prop_assert_eq!(p.stroke.cursor(), None);
        }
    }
}
