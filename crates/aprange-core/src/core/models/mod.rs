pub mod collection;
pub mod color;
pub mod element;
pub mod ion;
pub mod range;
