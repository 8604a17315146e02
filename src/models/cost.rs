//! Cost arithmetic.
//!
//! A cost packs a hard part and a soft part into one 64-bit integer so that
//! any amount of hard violation outweighs any amount of soft violation while
//! costs still add and compare as plain integers.

/// Weighted violation, hard part in the high 32 bits.
pub type Cost = i64;

/// Multiplier separating the hard part of a cost from the soft part.
pub const HARD_COST_WEIGHT: Cost = 1 << 32;

/// Largest representable cost.
pub const MAX_COST: Cost = Cost::MAX;

/// Combines a hard and a soft violation amount into one cost.
pub fn cost(hard: i32, soft: i32) -> Cost {
    hard as Cost * HARD_COST_WEIGHT + soft as Cost
}

/// Hard part of a cost.
pub fn hard_cost(c: Cost) -> i32 {
    (c / HARD_COST_WEIGHT) as i32
}

/// Soft part of a cost.
pub fn soft_cost(c: Cost) -> i32 {
    (c % HARD_COST_WEIGHT) as i32
}

/// Display form: the hard part before the point, the soft part (capped at
/// 99999) after it.
pub fn cost_show(c: Cost) -> f64 {
    let soft = soft_cost(c).min(99_999);
    hard_cost(c) as f64 + soft as f64 / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_parts() {
        let c = cost(3, 17);
        assert_eq!(hard_cost(c), 3);
        assert_eq!(soft_cost(c), 17);
        assert!(cost(1, 0) > cost(0, i32::MAX));
    }

    #[test]
    fn test_cost_show() {
        assert!((cost_show(cost(2, 5)) - 2.00005).abs() < 1e-9);
        // soft part saturates in the display form
        assert!((cost_show(cost(0, 250_000)) - 0.99999).abs() < 1e-9);
    }
}
