//! Streamed Response Aggregation
//!
//! LLM backends deliver a response as an ordered, finite sequence of
//! [`Fragment`]s. This module folds such a sequence into a single value:
//!
//! ```text
//! Text("Hello") ─┐
//! Text(" wor")  ─┼──▶ aggregate ──▶ Ok("Hello wor…")
//! Text("ld")    ─┘
//!
//! Text("Hello") ─┐
//! Error(E)      ─┴──▶ aggregate ──▶ Err(Stream(E))   (text discarded)
//! ```
//!
//! The reduction is fail-fast: the first error wins, whatever text came
//! before it is dropped, and nothing after it is consumed.

mod aggregator;

pub use aggregator::{aggregate, aggregate_stream, Fragment, GenerationError, StreamError};
