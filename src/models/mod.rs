//! DTOs describing data fetched from the problem catalog.

pub mod problem;

pub use problem::{Problem, ProblemTestCase};
