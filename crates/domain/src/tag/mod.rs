mod code;
mod entity;
mod repository;

pub use code::TagCode;
pub use entity::{DEFAULT_BATTERY_LEVEL, Tag};
pub use repository::TagRepository;

#[cfg(test)]
pub use repository::MockTagRepository;
