/// 射線投射
///
/// RayCaster 是視野核心對碰撞子系統的唯一依賴；
/// ObstacleScene 提供靜態遮擋物版本的實作
use serde::{Deserialize, Serialize};
use vek::{Vec2, Vec3};

use crate::vision::geometry_utils::GeometryUtils;

/// 圖層遮罩，用來劃分哪些場景幾何對視野是不透明的
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub fn overlaps(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

/// 射線命中結果
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// 命中點（世界座標）
    pub point: Vec3<f32>,
    /// 與射線起點的距離
    pub dist: f32,
}

/// 射線投射能力
///
/// 對靜態場景必須是決定性的、無副作用；未命中是正常結果而非錯誤
pub trait RayCaster {
    fn cast(
        &self,
        origin: Vec3<f32>,
        dir: Vec3<f32>,
        max_dist: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

/// 遮擋物底面形狀（幾何都在 XZ 平面上）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Footprint {
    /// 圓形遮擋物（樹木、柱子）
    Circular { radius: f32 },
    /// 矩形遮擋物（牆壁、建築），rotation 為繞 Y 軸角度（度）
    Rectangle { width: f32, depth: f32, rotation: f32 },
}

/// 遮擋物信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleInfo {
    /// 位置
    pub position: Vec3<f32>,
    /// 底面形狀
    pub footprint: Footprint,
    /// 所屬圖層
    pub layer: LayerMask,
}

/// 靜態遮擋物場景
pub struct ObstacleScene {
    obstacles: Vec<ObstacleInfo>,
}

impl ObstacleScene {
    pub fn new(obstacles: Vec<ObstacleInfo>) -> Self {
        Self { obstacles }
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// 射線與圓相交檢測，回傳最近交點距離
    ///
    /// 觀察者在圓內時回傳 0，讓可見射線優雅退化成近零長度
    pub fn ray_circle_intersection(
        ray_origin: Vec2<f32>,
        ray_direction: Vec2<f32>,
        center: Vec2<f32>,
        radius: f32,
    ) -> Option<f32> {
        let to_center = center - ray_origin;
        if to_center.magnitude() <= radius {
            return Some(0.0);
        }

        let proj_length = to_center.dot(ray_direction);

        // 射線背向圓心
        if proj_length < 0.0 {
            return None;
        }

        let closest_point = ray_origin + ray_direction * proj_length;
        let distance_to_center = center.distance(closest_point);

        // 射線與圓不相交
        if distance_to_center > radius {
            return None;
        }

        let half_chord = (radius * radius - distance_to_center * distance_to_center).sqrt();
        let intersection_distance = proj_length - half_chord;

        if intersection_distance < 0.0 {
            return None;
        }

        Some(intersection_distance)
    }

    /// 射線與線段相交檢測
    pub fn ray_line_intersection(
        ray_origin: Vec2<f32>,
        ray_direction: Vec2<f32>,
        line_start: Vec2<f32>,
        line_end: Vec2<f32>,
    ) -> Option<f32> {
        let line_direction = line_end - line_start;
        let cross = ray_direction.x * line_direction.y - ray_direction.y * line_direction.x;

        if cross.abs() < 1e-6 {
            return None;
        }

        let to_line_start = line_start - ray_origin;
        let t = (to_line_start.x * line_direction.y - to_line_start.y * line_direction.x) / cross;
        let u = (to_line_start.x * ray_direction.y - to_line_start.y * ray_direction.x) / cross;

        if t >= 0.0 && u >= 0.0 && u <= 1.0 {
            Some(t)
        } else {
            None
        }
    }

    /// 計算旋轉後的矩形四個頂點（XZ 平面）
    pub fn rectangle_corners(
        center: Vec2<f32>,
        width: f32,
        depth: f32,
        rotation_deg: f32,
    ) -> [Vec2<f32>; 4] {
        let rad = rotation_deg.to_radians();
        let cos_r = rad.cos();
        let sin_r = rad.sin();
        let half_w = width * 0.5;
        let half_d = depth * 0.5;

        let corners = [
            Vec2::new(-half_w, -half_d),
            Vec2::new(half_w, -half_d),
            Vec2::new(half_w, half_d),
            Vec2::new(-half_w, half_d),
        ];

        corners.map(|corner| {
            let x = corner.x * cos_r - corner.y * sin_r;
            let y = corner.x * sin_r + corner.y * cos_r;
            center + Vec2::new(x, y)
        })
    }

    /// 射線與單個遮擋物的最近交點距離
    fn intersect_obstacle(
        origin: Vec2<f32>,
        direction: Vec2<f32>,
        obstacle: &ObstacleInfo,
    ) -> Option<f32> {
        let center = GeometryUtils::flat(obstacle.position);
        match obstacle.footprint {
            Footprint::Circular { radius } => {
                Self::ray_circle_intersection(origin, direction, center, radius)
            }
            Footprint::Rectangle {
                width,
                depth,
                rotation,
            } => {
                let corners = Self::rectangle_corners(center, width, depth, rotation);
                let mut closest: Option<f32> = None;
                for i in 0..4 {
                    let a = corners[i];
                    let b = corners[(i + 1) % 4];
                    if let Some(t) = Self::ray_line_intersection(origin, direction, a, b) {
                        if closest.map_or(true, |c| t < c) {
                            closest = Some(t);
                        }
                    }
                }
                closest
            }
        }
    }
}

impl RayCaster for ObstacleScene {
    fn cast(
        &self,
        origin: Vec3<f32>,
        dir: Vec3<f32>,
        max_dist: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let flat_origin = GeometryUtils::flat(origin);
        let flat_dir = GeometryUtils::flat(dir);
        let len = flat_dir.magnitude();
        if len <= f32::EPSILON || max_dist <= 0.0 {
            return None;
        }
        let direction = flat_dir / len;

        let mut closest = max_dist;
        let mut found = false;
        for obstacle in &self.obstacles {
            if !obstacle.layer.overlaps(mask) {
                continue;
            }
            if let Some(t) = Self::intersect_obstacle(flat_origin, direction, obstacle) {
                if t < closest {
                    closest = t;
                    found = true;
                }
            }
        }

        if found {
            Some(RayHit {
                point: origin + (dir / len) * closest,
                dist: closest,
            })
        } else {
            None
        }
    }
}
