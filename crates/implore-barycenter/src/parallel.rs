//! Sequential or parallel iteration, chosen by the `parallel` feature.
//!
//! With `parallel` enabled, slices are walked with rayon's `par_iter()`;
//! otherwise with plain `iter()`. Barycenter groups share nothing, so callers
//! can swap one for the other without changing results or their order.

/// Iterate a slice by reference, in parallel when the `parallel` feature is on.
///
/// ```ignore
/// use crate::slice_maybe_parallel;
///
/// let lengths: Vec<usize> = slice_maybe_parallel!(groups).map(|g| g.len()).collect();
/// ```
#[macro_export]
macro_rules! slice_maybe_parallel {
    ($expr:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            $expr.par_iter()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $expr.iter()
        }
    }};
}

pub use slice_maybe_parallel;
