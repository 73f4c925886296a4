/// 視野多邊形建構器
///
/// 在觀察者的扇形視野內取樣射線，偵測相鄰取樣間的輪廓不連續，
/// 以固定次數的二分法精煉邊緣角度，輸出依角度排序的邊界點序列。
/// 每個 tick 的射線花費有上界：取樣數 + 不連續數 * 精煉次數
use serde::{Deserialize, Serialize};
use vek::Vec3;

use crate::comp::{FieldOfView, ObserverPose};
use crate::vision::geometry_utils::GeometryUtils;
use crate::vision::raycast::{LayerMask, RayCaster};

/// 單次射線取樣結果（短暫存在，僅與前一個取樣比較）
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewCastInfo {
    /// 是否命中遮擋物
    pub hit: bool,
    /// 解析出的點：命中點，或射線在視野半徑處的端點
    pub point: Vec3<f32>,
    /// 與觀察者的距離
    pub dist: f32,
    /// 投射時的全域角度（度）
    pub angle: f32,
}

/// 二分精煉出的輪廓邊緣點對
///
/// 某一側從未移動時該欄位為 None，插入邊界序列時跳過
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EdgeInfo {
    /// 近側（與 min 取樣同狀態）最後記錄的點
    pub point_a: Option<Vec3<f32>>,
    /// 遠側最後記錄的點
    pub point_b: Option<Vec3<f32>>,
}

/// 視野多邊形
///
/// 邊界點依角度嚴格非遞減排序，從 yaw - view_angle/2 到 yaw + view_angle/2，
/// 所有點都在視野半徑內
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolygon {
    /// 建構時的觀察者位置
    pub origin: Vec3<f32>,
    /// 建構時的朝向角（度）
    pub yaw: f32,
    /// 視野半徑
    pub view_radius: f32,
    /// 邊界點（世界座標）
    pub points: Vec<Vec3<f32>>,
}

pub struct PolygonBuilder;

impl PolygonBuilder {
    /// 建構視野多邊形
    ///
    /// 對靜態場景與固定參數，輸出是決定性的
    pub fn build(
        pose: &ObserverPose,
        fov: &FieldOfView,
        caster: &dyn RayCaster,
        obstacle_mask: LayerMask,
    ) -> VisibilityPolygon {
        let fov = fov.sanitized();
        let step_count = fov.step_count();
        let step_angle = fov.view_angle / step_count as f32;

        let mut points = Vec::with_capacity(step_count as usize + 1);
        let mut old_vc: Option<ViewCastInfo> = None;

        for i in 0..=step_count {
            let angle = pose.yaw - fov.view_angle / 2.0 + step_angle * i as f32;
            let new_vc = Self::view_cast(pose, &fov, caster, obstacle_mask, angle);

            if let Some(old) = old_vc {
                let dist_threshold_exceeded =
                    (old.dist - new_vc.dist).abs() > fov.edge_dist_threshold;
                if old.hit != new_vc.hit || (old.hit && new_vc.hit && dist_threshold_exceeded) {
                    // 精煉出的邊緣點在角度上介於前後取樣之間，必須先插入
                    let edge = Self::find_edge(pose, &old, &new_vc, &fov, caster, obstacle_mask);
                    if let Some(point) = edge.point_a {
                        points.push(point);
                    }
                    if let Some(point) = edge.point_b {
                        points.push(point);
                    }
                }
            }

            points.push(new_vc.point);
            old_vc = Some(new_vc);
        }

        VisibilityPolygon {
            origin: pose.position,
            yaw: pose.yaw,
            view_radius: fov.view_radius,
            points,
        }
    }

    /// 朝指定全域角度投射一條視野射線
    ///
    /// 未命中時解析為射線在視野半徑處的端點
    pub fn view_cast(
        pose: &ObserverPose,
        fov: &FieldOfView,
        caster: &dyn RayCaster,
        obstacle_mask: LayerMask,
        global_angle: f32,
    ) -> ViewCastInfo {
        let dir = GeometryUtils::dir_from_angle(global_angle);
        match caster.cast(pose.position, dir, fov.view_radius, obstacle_mask) {
            Some(hit) => ViewCastInfo {
                hit: true,
                point: hit.point,
                dist: hit.dist,
                angle: global_angle,
            },
            None => ViewCastInfo {
                hit: false,
                point: pose.position + dir * fov.view_radius,
                dist: fov.view_radius,
                angle: global_angle,
            },
        }
    }

    /// 在兩個不連續取樣間以二分法定位輪廓邊緣
    ///
    /// 固定執行 edge_resolve_iterations 次，以精度換取每個 tick 的成本上界；
    /// 中點取樣與 min 取樣同狀態且距離差不超過閾值時收斂下界，否則收斂上界
    pub fn find_edge(
        pose: &ObserverPose,
        min_vc: &ViewCastInfo,
        max_vc: &ViewCastInfo,
        fov: &FieldOfView,
        caster: &dyn RayCaster,
        obstacle_mask: LayerMask,
    ) -> EdgeInfo {
        let mut min_angle = min_vc.angle;
        let mut max_angle = max_vc.angle;
        let mut point_a = None;
        let mut point_b = None;

        for _ in 0..fov.edge_resolve_iterations {
            let angle = (min_angle + max_angle) / 2.0;
            let mid_vc = Self::view_cast(pose, fov, caster, obstacle_mask, angle);

            let dist_threshold_exceeded =
                (min_vc.dist - mid_vc.dist).abs() > fov.edge_dist_threshold;
            if mid_vc.hit == min_vc.hit && !dist_threshold_exceeded {
                min_angle = angle;
                point_a = Some(mid_vc.point);
            } else {
                max_angle = angle;
                point_b = Some(mid_vc.point);
            }
        }

        EdgeInfo { point_a, point_b }
    }
}
