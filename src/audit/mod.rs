pub(crate) mod transparency;
