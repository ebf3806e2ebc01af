//! CLI command implementations

pub(crate) mod apply;
pub(crate) mod mark;
pub(crate) mod status;
