//! Error bodies returned by the susu HTTP API.

mod problem;

pub use problem::{APPLICATION_PROBLEM_JSON, Problem, Violation};
