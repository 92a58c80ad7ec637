pub mod pipelines;
pub mod presentation;
