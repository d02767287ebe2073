//! Integration test suite entry point

mod audit_tests;
mod pipeline_tests;
