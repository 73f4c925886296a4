pub mod vision_config;

pub use self::vision_config::*;
