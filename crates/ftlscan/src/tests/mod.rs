

/// QuickCheck iterations: more on CI, very few under Miri.
fn test_count() -> u64 {
    if cfg!(miri) {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}
