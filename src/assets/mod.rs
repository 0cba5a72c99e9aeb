pub(crate) mod decode;
pub(crate) mod events;
pub(crate) mod fetch;
pub(crate) mod locale;
pub(crate) mod manager;
pub(crate) mod resource;
