pub(crate) mod plane;
pub(crate) mod view;
pub(crate) mod window;
