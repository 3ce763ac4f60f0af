/// Field validator tests
pub mod validation_tests;
