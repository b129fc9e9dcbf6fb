use crate::game::Mods;

/// Scale from standard deviation of hit errors (ms) to unstable rate
pub const UNSTABLE_RATE_SCALE: f64 = 10.0;

/// Unstable rate before any timescale correction: the population standard
/// deviation of `hit_errors`, times 10. Empty input gives 0.
pub fn base_unstable_rate(hit_errors: &[i32]) -> f64 {
    if hit_errors.is_empty() {
        return 0.0;
    }

    let count = hit_errors.len() as f64;
    let mean = hit_errors.iter().map(|&e| e as f64).sum::<f64>() / count;
    let variance = hit_errors
        .iter()
        .map(|&e| {
            let delta = e as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / count;

    variance.sqrt() * UNSTABLE_RATE_SCALE
}

/// Unstable rate in the client's displayed timescale
pub fn unstable_rate(hit_errors: &[i32], mods: Mods) -> f64 {
    let base = base_unstable_rate(hit_errors);
    if mods.is_speed_up() {
        base / 1.5
    } else if mods.is_slow_down() {
        base * 1.33
    } else {
        base
    }
}
