use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Tuning for radial child placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance from a parent to its children, per depth level.
    pub level_distance: f32,
    /// Arc (radians) that children of a non-root node are spread across.
    pub branch_arc: f32,
    /// Upper bound a crowded non-root arc may widen to before the radius grows.
    pub max_branch_arc: f32,
    /// Minimum chord between adjacent sibling centres.
    pub min_sibling_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_distance: 160.0,
            branch_arc: TAU / 3.0,
            max_branch_arc: PI,
            min_sibling_gap: 90.0,
        }
    }
}

impl LayoutConfig {
    /// Replace out-of-range values with defaults so placement stays total.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };

        let branch_arc = positive(self.branch_arc, defaults.branch_arc).min(TAU);
        let max_branch_arc = positive(self.max_branch_arc, defaults.max_branch_arc)
            .min(PI)
            .max(branch_arc.min(PI));

        Self {
            level_distance: positive(self.level_distance, defaults.level_distance),
            branch_arc,
            max_branch_arc,
            min_sibling_gap: if self.min_sibling_gap.is_finite() {
                self.min_sibling_gap.max(0.0)
            } else {
                defaults.min_sibling_gap
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"level_distance": 200}"#).unwrap();
        assert_eq!(config.level_distance, 200.0);
        assert_eq!(config.min_sibling_gap, LayoutConfig::default().min_sibling_gap);
    }

    #[test]
    fn sanitized_rejects_nonsense() {
        let config = LayoutConfig {
            level_distance: -5.0,
            branch_arc: f32::NAN,
            max_branch_arc: 100.0,
            min_sibling_gap: f32::INFINITY,
        }
        .sanitized();
        let defaults = LayoutConfig::default();
        assert_eq!(config.level_distance, defaults.level_distance);
        assert_eq!(config.branch_arc, defaults.branch_arc);
        assert_eq!(config.max_branch_arc, PI);
        assert_eq!(config.min_sibling_gap, defaults.min_sibling_gap);
    }
}
