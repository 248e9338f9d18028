//! Geometric utilities shared by the validity checks.

pub mod geometry;
