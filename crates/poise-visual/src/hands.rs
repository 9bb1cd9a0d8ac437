//! Handedness - which tracked hand leads in a frame

use poise_core::{Hand, LandmarkSet};

/// Picks the dominant hand from presence and tracking confidence
pub struct HandednessResolver;

impl HandednessResolver {
    /// Resolve the dominant hand from the detected hand sets
    ///
    /// With both hands present the one with the higher mean visibility
    /// wins; the right hand must be strictly better, so ties go left.
    pub fn resolve(left: Option<&LandmarkSet>, right: Option<&LandmarkSet>) -> Hand {
        match (left, right) {
            (Some(left), Some(right)) => {
                if right.mean_visibility() > left.mean_visibility() {
                    Hand::Right
                } else {
                    Hand::Left
                }
            }
            (Some(_), None) => Hand::Left,
            (None, Some(_)) => Hand::Right,
            (None, None) => Hand::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise_core::Landmark;

    fn hand(visibility: f32) -> LandmarkSet {
        LandmarkSet::from_points(
            (0..poise_core::HAND_LANDMARK_COUNT)
                .map(|i| Landmark::new(i as f32 / 21.0, 0.5).with_visibility(visibility)),
        )
    }

    #[test]
    fn test_single_hand_is_dominant() {
        assert_eq!(HandednessResolver::resolve(Some(&hand(0.2)), None), Hand::Left);
        assert_eq!(HandednessResolver::resolve(None, Some(&hand(0.2))), Hand::Right);
        assert_eq!(HandednessResolver::resolve(None, None), Hand::None);
    }

    #[test]
    fn test_better_tracked_hand_wins() {
        assert_eq!(
            HandednessResolver::resolve(Some(&hand(0.4)), Some(&hand(0.9))),
            Hand::Right
        );
        assert_eq!(
            HandednessResolver::resolve(Some(&hand(0.9)), Some(&hand(0.4))),
            Hand::Left
        );
    }

    #[test]
    fn test_tie_goes_left() {
        assert_eq!(
            HandednessResolver::resolve(Some(&hand(0.7)), Some(&hand(0.7))),
            Hand::Left
        );
        // No visibility reported at all
        let bare = LandmarkSet::from_points([Landmark::new(0.5, 0.5)]);
        assert_eq!(HandednessResolver::resolve(Some(&bare), Some(&bare)), Hand::Left);
    }
}
