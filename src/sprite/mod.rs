pub(crate) mod dsl;
pub(crate) mod frame;
pub(crate) mod timeline;
