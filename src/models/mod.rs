//! Data models

mod audit;
mod bulk;
mod case_folder;
mod custom_field;
mod customer;
mod template;

pub use audit::*;
pub use bulk::*;
pub use case_folder::*;
pub use custom_field::*;
pub use customer::*;
pub use template::*;
