pub(crate) mod one_shot;
pub(crate) mod sprite_renderer;
pub(crate) mod surface;
