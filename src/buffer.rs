pub(crate) mod padding;
pub(crate) mod pixel;
