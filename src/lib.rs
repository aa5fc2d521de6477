pub mod config;
pub mod geometry;
pub mod io;
pub mod map;
pub mod mapping;
