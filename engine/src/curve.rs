//! Piecewise-linear anchor curves.
//!
//! A curve is an ascending list of `(x, y)` anchors with unique `x`. Lookups
//! clamp to the first/last `y` outside the anchor range and interpolate
//! linearly between neighbours.

/// Anchor set behind one of the game's lookups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub anchors: &'static [(f64, f64)],
}

impl Curve {
    pub fn at(&self, x: f64) -> f64 {
        interpolate(self.anchors, x)
    }
}

/// d20 roll → accuracy multiplier.
pub const HIT_ROLL: Curve = Curve {
    anchors: &[(1.0, 0.05), (2.0, 0.20), (10.0, 1.00), (19.0, 2.00), (20.0, 5.00)],
};

/// `effective_accuracy / evasion` → fraction of damage that lands.
pub const EVASION: Curve = Curve {
    anchors: &[(0.90, 0.0), (0.95, 0.25), (1.00, 0.50), (1.05, 0.75), (1.10, 1.0)],
};

/// Die size → maximum additive bonus factor (d4 0.5, d10 1.0, d20 ~2.11).
pub const MAX_BONUS_FACTOR: Curve = Curve {
    anchors: &[(4.0, 0.50), (10.0, 1.00), (20.0, 2.1111111111)],
};

/// Evaluate an anchor list at `x`.
///
/// An empty anchor list, or an `x` that compares false against every anchor
/// (NaN), yields the neutral `1.0`.
pub fn interpolate(anchors: &[(f64, f64)], x: f64) -> f64 {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (anchors.first(), anchors.last())
    else {
        return 1.0;
    };
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }
    anchors
        .windows(2)
        .find(|w| w[0].0 <= x && x <= w[1].0)
        .map(|w| {
            let ((x0, y0), (x1, y1)) = (w[0], w[1]);
            y0 + (x - x0) / (x1 - x0) * (y1 - y0)
        })
        .unwrap_or(1.0)
}

/// Accuracy multiplier for a d20 roll; the roll is clamped to `1..=20`.
pub fn hit_roll_multiplier(d20: i32) -> f64 {
    HIT_ROLL.at(f64::from(d20.clamp(1, 20)))
}

/// Glancing multiplier in `[0, 1]`. Non-positive evasion never glances.
pub fn evasion_multiplier(effective_accuracy: f64, evasion: f64) -> f64 {
    if evasion <= 0.0 {
        return 1.0;
    }
    EVASION.at(effective_accuracy / evasion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_between_anchors() {
        let anchors = [(0.0, 0.0), (10.0, 100.0)];
        assert!((interpolate(&anchors, 2.5) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn empty_and_nan_are_neutral() {
        assert_eq!(interpolate(&[], 3.0), 1.0);
        assert_eq!(HIT_ROLL.at(f64::NAN), 1.0);
    }

    #[test]
    fn single_anchor_is_constant() {
        assert_eq!(interpolate(&[(5.0, 0.7)], -1.0), 0.7);
        assert_eq!(interpolate(&[(5.0, 0.7)], 99.0), 0.7);
    }
}
