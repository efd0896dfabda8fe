pub mod location;
pub mod state;
#[allow(clippy::module_inception)]
pub mod viewport;
