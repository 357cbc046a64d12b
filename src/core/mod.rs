//! Core coordinate and geometry primitives.
//!
//! Floor plans live in floor-local pixel space ([`Point`]); the walkable
//! grid indexes cells with [`GridCoord`]. The [`geometry`] module holds the
//! polygon/polyline math everything else is built on.

pub mod geometry;
mod point;

pub use point::{GridCoord, Point};
