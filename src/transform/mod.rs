//! Transform adapters from upstream API shapes into CLI-facing entity models.

pub(crate) mod pokemon;
