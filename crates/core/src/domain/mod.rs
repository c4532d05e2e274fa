pub mod customer;
pub mod pricing;
pub mod quote;
