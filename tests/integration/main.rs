//! Integration tests over the in-memory store

mod api_tests;
mod common;
mod workflow_tests;
