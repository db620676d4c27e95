pub mod attributes;
pub mod constants;
pub mod enums;
pub mod error;
pub mod primitives;
