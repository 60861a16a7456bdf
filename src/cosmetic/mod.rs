pub(crate) mod handler;
pub(crate) mod opts;
pub(crate) mod skin;
