pub(crate) mod app;
pub(crate) mod commands;
pub(crate) mod surface;
pub(crate) mod util;

#[cfg(test)]
#[path = "util_tests.rs"]
mod util_tests;
