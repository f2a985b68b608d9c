pub mod product;
pub mod udts;
