//! Entity models and the lookup and save workflows used by the CLI.

pub(crate) mod pokemon;
