use rand::Rng;

/// Uniform integer in `[min, max)`. `None` when the range is empty.
pub fn random_number<R: Rng + ?Sized>(rng: &mut R, max: usize, min: usize) -> Option<usize> {
    if max <= min {
        return None;
    }
    Some(rng.gen_range(min..max))
}

/// Uniformly chosen element of `items`.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    random_number(rng, items.len(), 0).map(|i| &items[i])
}

/// Fisher–Yates: walk from the last index down to 1, swapping each slot with
/// a uniformly chosen index at or before it. Every permutation is equally
/// likely.
pub fn shuffle<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
