// Thu Oct 15 2026 - Alex

pub mod info;

pub use info::{BinaryInfo, TargetType};
