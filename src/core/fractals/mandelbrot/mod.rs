pub mod algorithm;
pub mod colour_map;
pub mod precision;
