/// 視野參數組件
///
/// 每個觀察者一份，設定一次、每個 tick 讀取
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    /// 視野半徑
    pub view_radius: f32,
    /// 視野全角（度）
    pub view_angle: f32,
    /// 取樣密度（每度取樣數）
    pub mesh_resolution: f32,
    /// 輪廓邊緣二分精煉次數（固定次數，不是收斂容差）
    pub edge_resolve_iterations: u32,
    /// 距離不連續判定閾值
    pub edge_dist_threshold: f32,
    /// 渲染用前向偏移（避免自遮擋，純呈現細節）
    pub mask_cutoff: f32,
}

impl FieldOfView {
    /// 創建新的視野參數
    pub fn new(view_radius: f32, view_angle: f32) -> Self {
        Self {
            view_radius,
            view_angle,
            mesh_resolution: 1.0, // 每度一條射線
            edge_resolve_iterations: 6,
            edge_dist_threshold: 0.5,
            mask_cutoff: 0.75,
        }
    }

    /// 設置取樣密度
    pub fn with_resolution(mut self, samples_per_degree: f32) -> Self {
        self.mesh_resolution = samples_per_degree;
        self
    }

    /// 設置邊緣精煉參數
    pub fn with_edge_resolve(mut self, iterations: u32, dist_threshold: f32) -> Self {
        self.edge_resolve_iterations = iterations;
        self.edge_dist_threshold = dist_threshold;
        self
    }

    /// 設置前向偏移
    pub fn with_mask_cutoff(mut self, cutoff: f32) -> Self {
        self.mask_cutoff = cutoff;
        self
    }

    /// 取樣步數，至少為 1（防止步進角除以零）
    pub fn step_count(&self) -> u32 {
        let steps = (self.view_angle * self.mesh_resolution).round() as i64;
        steps.max(1) as u32
    }

    /// 夾制退化參數
    ///
    /// 視野計算每個 tick 都會執行，退化設定夾制到安全最小值而不是回報錯誤
    pub fn sanitized(&self) -> Self {
        let mut fov = *self;
        fov.view_radius = fov.view_radius.max(0.0);
        fov.view_angle = fov.view_angle.max(0.0);
        fov.mesh_resolution = fov.mesh_resolution.max(0.0);
        fov.edge_dist_threshold = fov.edge_dist_threshold.max(0.0);
        fov
    }
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self::new(10.0, 90.0)
    }
}
