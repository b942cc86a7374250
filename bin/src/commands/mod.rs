//! CLI command implementations.

pub(crate) mod backfill;
pub(crate) mod fetch;
pub(crate) mod last;
pub(crate) mod symbols;
pub(crate) mod watch;
