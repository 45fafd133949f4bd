//! Render pipelines of the viewer.
//!
//! Both pipelines share the vertex layout of the packed scene buffer and the
//! per-draw instance layout; they only differ in primitive topology.

pub mod basic;
