pub mod animation;
pub mod gradient;
pub mod grid;
pub mod mapping;
pub mod markup;
pub mod sampler;
pub mod series;
