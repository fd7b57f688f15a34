pub(crate) mod synth;

use synth::Filter;

/// The four filters of one scaling context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSet {
    /// Horizontal luma filter.
    pub h_luma: Filter,
    /// Horizontal chroma filter.
    pub h_chroma: Filter,
    /// Vertical luma filter.
    pub v_luma: Filter,
    /// Vertical chroma filter.
    pub v_chroma: Filter,
}
