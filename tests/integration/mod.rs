//! Integration tests

mod case_folder_tests;
mod custom_field_tests;
mod customer_tests;
mod directories_tests;
