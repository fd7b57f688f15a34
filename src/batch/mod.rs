pub(crate) mod parallel;
