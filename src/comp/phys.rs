use serde::{Deserialize, Serialize};
use vek::*;

use crate::vision::geometry_utils::GeometryUtils;

/// Position
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pos(pub Vec3<f32>);

/// 繞 Y 軸的朝向角（度）
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Yaw(pub f32);

impl Yaw {
    pub fn x(&self) -> f32 {
        self.0.to_radians().sin()
    }
    pub fn z(&self) -> f32 {
        self.0.to_radians().cos()
    }
    /// 朝向的單位向量（XZ 平面）
    pub fn forward(&self) -> Vec3<f32> {
        GeometryUtils::dir_from_angle(self.0)
    }
}

/// 觀察者姿態
///
/// 每個 tick 由外部移動組件更新，視野核心只讀取
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverPose {
    /// 世界座標位置（Y 為上）
    pub position: Vec3<f32>,
    /// 朝向角（度）
    pub yaw: f32,
}

impl ObserverPose {
    pub fn new(position: Vec3<f32>, yaw: f32) -> Self {
        Self { position, yaw }
    }

    pub fn from_parts(pos: Pos, yaw: Yaw) -> Self {
        Self {
            position: pos.0,
            yaw: yaw.0,
        }
    }

    /// 朝向的單位向量（XZ 平面）
    pub fn forward(&self) -> Vec3<f32> {
        GeometryUtils::dir_from_angle(self.yaw)
    }
}
