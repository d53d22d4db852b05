// Finger-up heuristic: which of the five fingers are extended on this frame.

use crate::hand::{Hand, TIP_IDS};

/// [thumb, index, middle, ring, pinky]; true = extended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    pub fn index(self) -> bool { self.0[1] }
    pub fn middle(self) -> bool { self.0[2] }
}

/// Classify a hand. No hand gives all-false.
///
/// Thumb compares tip x against the joint just below it (only correct for one
/// hand orientation). The other fingers compare tip y against the PIP joint two
/// ids below the tip; smaller y is higher on screen, so "up".
pub fn classify(hand: Option<&Hand>) -> FingerState {
    let Some(hand) = hand else {
        return FingerState::default();
    };

    let mut up = [false; 5];
    let thumb = TIP_IDS[0];
    up[0] = hand.point(thumb).x < hand.point(thumb - 1).x;
    for (finger, &tip) in TIP_IDS.iter().enumerate().skip(1) {
        up[finger] = hand.point(tip).y < hand.point(tip - 2).y;
    }
    FingerState(up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{LANDMARK_COUNT, Landmark};

    #[test]
    fn no_hand_means_nothing_up() {
        assert_eq!(classify(None), FingerState([false; 5]));
    }

    #[test]
    fn index_only_pose() {
        let hand = Hand::posed([false, true, false, false, false], (300, 300));
        let fs = classify(Some(&hand));
        assert!(fs.index());
        assert!(!fs.middle());
    }

    #[test]
    fn index_and_middle_pose() {
        let hand = Hand::posed([false, true, true, false, false], (300, 300));
        let fs = classify(Some(&hand));
        assert_eq!(fs, FingerState([false, true, true, false, false]));
    }

    #[test]
    fn thumb_uses_horizontal_order() {
        let hand = Hand::posed([true, false, false, false, true], (300, 300));
        assert_eq!(classify(Some(&hand)), FingerState([true, false, false, false, true]));
    }

    #[test]
    fn tip_level_with_pip_is_down() {
        let mut pts = [Landmark { x: 0, y: 100 }; LANDMARK_COUNT];
        pts[6] = Landmark { x: 0, y: 80 };
        pts[8] = Landmark { x: 0, y: 80 };
        let fs = classify(Some(&Hand::new(pts)));
        assert!(!fs.index());
    }
}
