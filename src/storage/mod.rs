pub mod engine;
pub mod local;
pub mod paths;
pub mod text;

pub use engine::*;
pub use local::LocalStorage;
