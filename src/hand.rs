// Hand landmarks as the rest of the app sees them: 21 points in frame pixels.
// Indices follow the usual 21-point hand model (wrist = 0, then four joints
// per finger from thumb to pinky, tips at 4, 8, 12, 16, 20).
// Visual: the dots and bones drawn over your hand come from these points.

/// Number of keypoints reported per hand.
pub const LANDMARK_COUNT: usize = 21;

// Landmarks may sit slightly off-frame; anything further out is noise.
const NORMALIZED_MIN: f32 = -1.0;
const NORMALIZED_MAX: f32 = 2.0;

/// Fingertip landmark ids, ordered thumb, index, middle, ring, pinky.
pub const TIP_IDS: [usize; 5] = [4, 8, 12, 16, 20];

#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;
}

/// Bone list used to draw the hand skeleton.
pub const CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (17, 18), (18, 19), (19, 20),
    (0, 17),
];

/// One keypoint in frame pixel coordinates (origin top-left, y grows down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Landmark {
    pub x: i32,
    pub y: i32,
}

/// One detected hand for one frame. No identity across frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hand {
    points: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from normalized (0..1) coordinates. Returns `None` unless exactly
    /// 21 finite points are given. Values are clamped to -1..2 (a frame's width
    /// of slack on each side) and pixel coordinates truncate toward zero.
    pub fn from_normalized(points: &[(f32, f32)], width: usize, height: usize) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            return None;
        }
        let mut out = [Landmark::default(); LANDMARK_COUNT];
        for (dst, &(x, y)) in out.iter_mut().zip(points) {
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            *dst = Landmark {
                x: (x.clamp(NORMALIZED_MIN, NORMALIZED_MAX) * width as f32) as i32,
                y: (y.clamp(NORMALIZED_MIN, NORMALIZED_MAX) * height as f32) as i32,
            };
        }
        Some(Self { points: out })
    }

    /// A schematic upright hand with the fingers in `up` extended, moved so the
    /// index tip lands on `index_tip`. Curled tips sit just below their PIP
    /// joint; an extended thumb points left of its IP joint.
    pub fn posed(up: [bool; 5], index_tip: (i32, i32)) -> Self {
        let mut pts = [Landmark { x: 0, y: 200 }; LANDMARK_COUNT];
        for (finger, &tip) in TIP_IDS.iter().enumerate() {
            let base_x = finger as i32 * 20;
            for joint in 1..=3 {
                pts[tip - 4 + joint] = Landmark { x: base_x, y: 200 - 20 * joint as i32 };
            }
            pts[tip] = if finger == 0 {
                let ip = pts[tip - 1];
                Landmark { x: if up[0] { ip.x - 15 } else { ip.x + 15 }, y: ip.y }
            } else {
                let pip = pts[tip - 2];
                Landmark { x: base_x, y: if up[finger] { pip.y - 60 } else { pip.y + 20 } }
            };
        }
        let mut hand = Self::new(pts);
        let (ix, iy) = hand.index_tip();
        hand.translate(index_tip.0 - ix, index_tip.1 - iy);
        hand
    }

    #[inline]
    pub fn point(&self, id: usize) -> Landmark {
        self.points[id]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn index_tip(&self) -> (i32, i32) {
        let p = self.points[landmarks::INDEX_TIP];
        (p.x, p.y)
    }

    pub fn middle_tip(&self) -> (i32, i32) {
        let p = self.points[landmarks::MIDDLE_TIP];
        (p.x, p.y)
    }

    /// Shift every landmark by (dx, dy).
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_points_scale_to_pixels() {
        let mut pts = vec![(0.0, 0.0); LANDMARK_COUNT];
        pts[landmarks::INDEX_TIP] = (0.5, 0.25);
        pts[landmarks::MIDDLE_TIP] = (0.999, 0.999);
        let hand = Hand::from_normalized(&pts, 640, 480).unwrap();
        assert_eq!(hand.index_tip(), (320, 120));
        assert_eq!(hand.middle_tip(), (639, 479));
    }

    #[test]
    fn wrong_point_count_is_rejected() {
        assert!(Hand::from_normalized(&[(0.1, 0.1); 20], 10, 10).is_none());
    }

    #[test]
    fn far_off_points_are_clamped_and_nan_rejected() {
        let mut pts = vec![(0.5, 0.5); LANDMARK_COUNT];
        pts[landmarks::INDEX_TIP] = (1e12, -1e12);
        let hand = Hand::from_normalized(&pts, 64, 48).unwrap();
        assert_eq!(hand.index_tip(), (128, -48));

        pts[landmarks::INDEX_TIP] = (f32::NAN, 0.1);
        assert!(Hand::from_normalized(&pts, 64, 48).is_none());
        pts[landmarks::INDEX_TIP] = (0.1, f32::INFINITY);
        assert!(Hand::from_normalized(&pts, 64, 48).is_none());
    }

    #[test]
    fn skeleton_touches_every_landmark() {
        let mut seen = [false; LANDMARK_COUNT];
        for (a, b) in CONNECTIONS {
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
