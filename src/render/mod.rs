//! Output renderers: the console report and pretty JSON for saved records.

pub(crate) mod json;
pub(crate) mod report;
