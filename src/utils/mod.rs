//! Internal utility helpers.

pub(crate) mod store;
