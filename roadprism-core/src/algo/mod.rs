//! Prism algorithms built on top of the routing primitives

pub mod prism;
