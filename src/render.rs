pub(crate) mod band;
pub(crate) mod blend;
pub(crate) mod pipeline;
pub(crate) mod stack;
