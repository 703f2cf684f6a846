//! CLI command implementations

pub(crate) mod ask;
pub(crate) mod catalog;
pub(crate) mod classify;
pub(crate) mod common;
pub(crate) mod validate;
