//! CLI command implementations.

pub(crate) mod nav;

pub(crate) use nav::NavCommand;
