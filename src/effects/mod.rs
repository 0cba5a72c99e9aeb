pub(crate) mod composite;
pub(crate) mod registry;
pub(crate) mod transitions;
