#[path = "../test_utils.rs"]
mod test_utils;

mod admin_test;
mod appointment_test;
mod availability_test;
mod middleware_test;
