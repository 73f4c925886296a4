/// 可見目標偵測
///
/// 與多邊形建構器共用 RayCaster 能力，但彼此獨立運作：
/// 先由四叉樹取得半徑內候選，再過濾視角，最後以視線投射確認未被遮擋
use serde::{Deserialize, Serialize};
use vek::Vec3;

use crate::comp::{FieldOfView, ObserverPose};
use crate::vision::geometry_utils::GeometryUtils;
use crate::vision::quadtree::{Bounds, QuadTree};
use crate::vision::raycast::{LayerMask, RayCaster};

/// 目標點資訊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub id: u64,
    pub position: Vec3<f32>,
    pub layer: LayerMask,
}

/// 目標偵測器
pub struct TargetDetector {
    index: QuadTree,
}

impl TargetDetector {
    /// 以預設樹參數建立偵測器
    pub fn new(world_bounds: Bounds, targets: Vec<TargetInfo>) -> Self {
        Self::with_config(world_bounds, targets, 8, 10)
    }

    /// 配置樹深度與節點容量
    pub fn with_config(
        world_bounds: Bounds,
        targets: Vec<TargetInfo>,
        max_tree_depth: usize,
        max_targets_per_node: usize,
    ) -> Self {
        let mut index = QuadTree::new(max_tree_depth, max_targets_per_node);
        index.initialize(world_bounds, targets);
        Self { index }
    }

    /// 目標移動或增減後重建索引
    pub fn rebuild_index(&mut self, world_bounds: Bounds, targets: Vec<TargetInfo>) {
        self.index.initialize(world_bounds, targets);
    }

    /// 回傳視野內且視線未被遮擋的目標 id
    ///
    /// 結果以回傳值交付，不透過共享可變容器
    pub fn find_visible_targets(
        &self,
        pose: &ObserverPose,
        fov: &FieldOfView,
        caster: &dyn RayCaster,
        target_mask: LayerMask,
        obstacle_mask: LayerMask,
    ) -> Vec<u64> {
        let fov = fov.sanitized();
        let forward = pose.forward();
        let mut visible = Vec::new();

        let candidates = self
            .index
            .query_targets_in_range(GeometryUtils::flat(pose.position), fov.view_radius);

        for target in candidates {
            if !target.layer.overlaps(target_mask) {
                continue;
            }

            let to_target = target.position - pose.position;
            let dist = GeometryUtils::flat_distance(pose.position, target.position);
            if dist > fov.view_radius {
                continue;
            }

            if GeometryUtils::flat_angle_between(forward, to_target) < fov.view_angle / 2.0 {
                let dir = if dist > f32::EPSILON {
                    Vec3::new(to_target.x, 0.0, to_target.z) / dist
                } else {
                    forward
                };
                if caster.cast(pose.position, dir, dist, obstacle_mask).is_none() {
                    visible.push(target.id);
                }
            }
        }

        visible
    }
}
