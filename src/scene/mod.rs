pub(crate) mod entity;
pub(crate) mod state;
pub(crate) mod transition;
