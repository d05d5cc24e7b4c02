pub mod components;
pub mod store;
pub mod systems;
