pub(crate) mod yuv;
