use rand::Rng;

/// Spins a roulette wheel over `scores` in their given order and returns the
/// index of the chosen slot. When the scores carry no usable mass (all zero,
/// or overflowed to infinity) the pick is uniform instead.
pub fn spin<R: Rng + ?Sized>(scores: &[f64], rng: &mut R) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }
    let total: f64 = scores.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Some(rng.gen_range(0..scores.len()));
    }
    let draw: f64 = rng.gen_range(0.0..1.0);
    let mut accumulation = 0.0;
    for (i, &score) in scores.iter().enumerate() {
        accumulation += score / total;
        if accumulation > draw {
            return Some(i);
        }
    }
    // rounding left the last cumulative probability below the draw
    Some(scores.len() - 1)
}
