/// 視野更新系統
///
/// 由外部排程迴圈每個模擬 tick 呼叫一次：
/// 每個觀察者的多邊形與網格每次都從頭重建，
/// 目標重新掃描可依間隔節流（間隔 0 表示每個 tick 都掃描）
use hashbrown::HashMap;
use log::debug;

use crate::comp::{FieldOfView, ObserverPose};
use crate::vision::mesh::VisibilityMesh;
use crate::vision::polygon_builder::{PolygonBuilder, VisibilityPolygon};
use crate::vision::raycast::{LayerMask, RayCaster};
use crate::vision::targets::TargetDetector;

pub type ObserverId = u64;

pub struct VisionTickSystem {
    /// 目標重新掃描間隔（秒）
    rescan_interval: f64,
    /// 自上次掃描累積的時間；初始為無窮大，讓第一個 tick 一定掃描
    since_rescan: f64,
    /// 每個觀察者重用的網格緩衝
    meshes: HashMap<ObserverId, VisibilityMesh>,
    /// 最近一次掃描的可見目標
    visible_targets: HashMap<ObserverId, Vec<u64>>,
}

impl VisionTickSystem {
    pub fn new() -> Self {
        Self {
            rescan_interval: 0.0,
            since_rescan: f64::INFINITY,
            meshes: HashMap::new(),
            visible_targets: HashMap::new(),
        }
    }

    /// 設置目標重新掃描間隔
    pub fn with_rescan_interval(mut self, interval: f64) -> Self {
        self.rescan_interval = interval.max(0.0);
        self
    }

    /// 執行一個模擬 tick
    ///
    /// 回傳每個觀察者的視野多邊形；網格在內部緩衝就地重建，
    /// 以 mesh() 取得
    pub fn tick(
        &mut self,
        dt: f64,
        observers: &[(ObserverId, ObserverPose, FieldOfView)],
        caster: &dyn RayCaster,
        detector: &TargetDetector,
        obstacle_mask: LayerMask,
        target_mask: LayerMask,
    ) -> HashMap<ObserverId, VisibilityPolygon> {
        self.since_rescan += dt;
        let rescan = self.since_rescan >= self.rescan_interval;
        if rescan {
            self.since_rescan = 0.0;
        }

        let mut polygons = HashMap::new();
        for (id, pose, fov) in observers {
            let polygon = PolygonBuilder::build(pose, fov, caster, obstacle_mask);
            let mesh = self.meshes.entry(*id).or_default();
            mesh.rebuild(&polygon, fov.mask_cutoff);

            if rescan {
                let targets =
                    detector.find_visible_targets(pose, fov, caster, target_mask, obstacle_mask);
                self.visible_targets.insert(*id, targets);
            }

            polygons.insert(*id, polygon);
        }

        debug!(
            "視野 tick: {} 個觀察者, 目標掃描 = {}",
            observers.len(),
            rescan
        );
        polygons
    }

    /// 取得觀察者最近一次重建的網格
    pub fn mesh(&self, observer: ObserverId) -> Option<&VisibilityMesh> {
        self.meshes.get(&observer)
    }

    /// 取得觀察者最近一次掃描的可見目標
    pub fn visible_targets(&self, observer: ObserverId) -> Option<&[u64]> {
        self.visible_targets.get(&observer).map(|v| v.as_slice())
    }

    /// 清理指定觀察者的緩衝
    pub fn clear_observer(&mut self, observer: ObserverId) {
        self.meshes.remove(&observer);
        self.visible_targets.remove(&observer);
    }

    /// 清理所有緩衝
    pub fn clear_all(&mut self) {
        self.meshes.clear();
        self.visible_targets.clear();
    }
}

impl Default for VisionTickSystem {
    fn default() -> Self {
        Self::new()
    }
}
