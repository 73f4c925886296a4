/// 視野系統模組
///
/// 包含射線投射、視野多邊形建構、網格組裝與可見目標偵測
pub mod geometry_utils;
pub mod raycast;
pub mod polygon_builder;
pub mod mesh;
pub mod quadtree;
pub mod targets;
pub mod mathematical_tests;

pub use self::{
    geometry_utils::GeometryUtils,
    raycast::*,
    polygon_builder::*,
    mesh::*,
    quadtree::{Bounds, QuadTree},
    targets::*,
};
