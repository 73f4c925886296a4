/// 視野網格組裝
///
/// 把邊界點轉成觀察者區域座標的三角形扇；
/// 緩衝就地清空重填，跨 tick 重用而不重新配置
use serde::{Deserialize, Serialize};
use vek::Vec3;

use crate::comp::{FieldOfView, ObserverPose};
use crate::vision::geometry_utils::GeometryUtils;
use crate::vision::polygon_builder::{PolygonBuilder, VisibilityPolygon};
use crate::vision::raycast::{LayerMask, RayCaster};

/// 可見性網格（頂點 + 三角形索引），每個 tick 從頭重建
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityMesh {
    /// 頂點 0 是觀察者區域原點（加上前向偏移），其餘是邊界點
    pub vertices: Vec<Vec3<f32>>,
    /// 三角形扇索引，每個三角形都引用頂點 0
    pub triangles: Vec<u32>,
}

impl VisibilityMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從視野多邊形重建網格
    ///
    /// 扇形三角化不自交的前提是邊界點依角度排序，
    /// 這由多邊形建構器保證；所有頂點都加上 mask_cutoff 的前向偏移
    pub fn rebuild(&mut self, polygon: &VisibilityPolygon, mask_cutoff: f32) {
        self.vertices.clear();
        self.triangles.clear();

        let forward_bias = Vec3::unit_z() * mask_cutoff;
        self.vertices.push(forward_bias);
        for &point in &polygon.points {
            let local = GeometryUtils::world_to_local(point, polygon.origin, polygon.yaw);
            self.vertices.push(local + forward_bias);
        }

        let vertex_count = self.vertices.len() as u32;
        for i in 1..vertex_count.saturating_sub(1) {
            self.triangles.extend_from_slice(&[0, i, i + 1]);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// 單次呼叫完成取樣、精煉與組網的入口
///
/// 由外部排程迴圈每個模擬 tick 呼叫一次，沒有隱式的生命週期註冊
pub fn build_visibility(
    pose: &ObserverPose,
    fov: &FieldOfView,
    caster: &dyn RayCaster,
    obstacle_mask: LayerMask,
) -> (VisibilityPolygon, VisibilityMesh) {
    let polygon = PolygonBuilder::build(pose, fov, caster, obstacle_mask);
    let mut mesh = VisibilityMesh::new();
    mesh.rebuild(&polygon, fov.mask_cutoff);
    (polygon, mesh)
}
