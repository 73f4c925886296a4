pub mod phys;
pub mod field_of_view;

pub use self::{
    phys::*,
    field_of_view::*,
};
