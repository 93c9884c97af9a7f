mod api_tests;
mod common;
mod upstream_tests;
