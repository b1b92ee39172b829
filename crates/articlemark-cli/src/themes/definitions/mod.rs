pub mod dark;
pub mod light;
pub mod terminal;
