pub(crate) mod chroma;
pub(crate) mod horizontal;
pub(crate) mod vertical;
