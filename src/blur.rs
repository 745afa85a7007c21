pub(crate) mod gaussian;
pub(crate) mod stack;
pub(crate) mod strategy;
