pub mod errors;
pub mod export;
pub mod order_form;
pub mod ports;
pub mod pricing;
pub mod product;
pub mod summary;
