pub mod product;
pub mod root;
