pub mod product_api;
pub mod request;
pub mod types;
