//! Integration tests for the lookup pipeline.

mod documents;
mod pipeline;
