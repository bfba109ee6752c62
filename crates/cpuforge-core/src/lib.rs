//! Cpuforge Core Types and Definitions
//!
//! This crate provides the foundational types shared by every part of the
//! cpuforge processor design tool. It includes:
//!
//! - **Identifiers**: String-interned identifiers for placed components and
//!   connections ([`identifier::Id`])
//! - **Geometry**: Canvas-space points, sizes and bounding boxes
//!   ([`geometry`] module)
//! - **Catalog**: The closed set of processor component types and the pins
//!   each of them exposes ([`catalog`] module)

pub mod catalog;
pub mod geometry;
pub mod identifier;
