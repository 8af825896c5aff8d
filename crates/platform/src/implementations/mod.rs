//! Concrete filesystem backends

pub mod local;
