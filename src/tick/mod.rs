pub mod vision_tick;

pub use self::{
    vision_tick::*,
};
