pub mod adjust;
pub mod background;
pub mod loader;
pub mod resize;
