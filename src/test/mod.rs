// Test support code, compiled only for tests
pub mod utils;
