use lazy_static::lazy_static;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::comp::FieldOfView;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VisionSetting {
    pub view_radius: f32,
    pub view_angle: f32,
    pub mesh_resolution: f32,
    pub edge_resolve_iterations: u32,
    pub edge_dist_threshold: f32,
    pub mask_cutoff: f32,
    pub target_rescan_interval: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct Setting {
    vision: VisionSetting,
}

impl Default for VisionSetting {
    fn default() -> Self {
        Self {
            view_radius: 10.0,
            view_angle: 90.0,
            mesh_resolution: 1.0,
            edge_resolve_iterations: 6,
            edge_dist_threshold: 0.5,
            mask_cutoff: 0.75,
            target_rescan_interval: 0.0,
        }
    }
}

impl VisionSetting {
    /// 讀取設定檔，失敗時退回預設值
    ///
    /// 視野計算每個 tick 都在跑，設定問題記 log 而不中斷
    pub fn load(path: &str) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("無法讀取設定檔 {}: {}，使用預設值", path, e);
                return Self::default();
            }
        };
        match toml::from_str::<Setting>(&text) {
            Ok(setting) => setting.vision,
            Err(e) => {
                warn!("設定檔 {} 解析失敗: {}，使用預設值", path, e);
                Self::default()
            }
        }
    }

    /// 轉成視野參數組件
    pub fn to_field_of_view(&self) -> FieldOfView {
        FieldOfView::new(self.view_radius, self.view_angle)
            .with_resolution(self.mesh_resolution)
            .with_edge_resolve(self.edge_resolve_iterations, self.edge_dist_threshold)
            .with_mask_cutoff(self.mask_cutoff)
    }
}

lazy_static! {
    pub static ref CONFIG: VisionSetting = VisionSetting::load("vision.toml");
}
