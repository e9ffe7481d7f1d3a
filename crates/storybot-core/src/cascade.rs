//! Ordered-cascade evaluation
//!
//! The same "try this, then that, first hit wins" shape recurs across the
//! codebase: locator resolution, login-form discovery, click fallbacks.
//! It is modeled once here instead of re-writing the loop at each site.

/// Evaluate `probe` against each candidate in order, returning the first
/// `Some` result. Candidates after the first hit are never probed.
pub fn cascade<C, T, I, F>(candidates: I, mut probe: F) -> Option<T>
where
    I: IntoIterator<Item = C>,
    F: FnMut(C) -> Option<T>,
{
    candidates.into_iter().find_map(|c| probe(c))
}
