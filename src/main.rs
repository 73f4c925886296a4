#![allow(unused)]

use failure::Error;
use log::{debug, info};
use vek::{Vec2, Vec3};

use fovmesh::comp::{FieldOfView, ObserverPose, Pos, Yaw};
use fovmesh::config::CONFIG;
use fovmesh::tick::VisionTickSystem;
use fovmesh::vision::{
    Bounds, Footprint, LayerMask, ObstacleInfo, ObstacleScene, TargetDetector, TargetInfo,
};

const TPS: u64 = 10;
const OBSTACLE_LAYER: LayerMask = LayerMask(1);
const TARGET_LAYER: LayerMask = LayerMask(2);

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn main() -> std::result::Result<(), Error> {
    setup_logger()?;

    // 示範場景：一面牆、一根柱子
    let scene = ObstacleScene::new(vec![
        ObstacleInfo {
            position: Vec3::new(0.0, 0.0, 6.0),
            footprint: Footprint::Rectangle {
                width: 4.0,
                depth: 1.0,
                rotation: 0.0,
            },
            layer: OBSTACLE_LAYER,
        },
        ObstacleInfo {
            position: Vec3::new(-4.0, 0.0, 4.0),
            footprint: Footprint::Circular { radius: 0.8 },
            layer: OBSTACLE_LAYER,
        },
    ]);

    let world_bounds = Bounds::new(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0));
    let detector = TargetDetector::new(
        world_bounds,
        vec![
            TargetInfo {
                id: 10,
                position: Vec3::new(2.0, 0.0, 4.0),
                layer: TARGET_LAYER,
            },
            TargetInfo {
                id: 11,
                position: Vec3::new(0.0, 0.0, 8.0), // 牆後
                layer: TARGET_LAYER,
            },
            TargetInfo {
                id: 12,
                position: Vec3::new(0.0, 0.0, -5.0), // 背後
                layer: TARGET_LAYER,
            },
        ],
    );

    let fov = CONFIG.to_field_of_view();
    let mut system =
        VisionTickSystem::new().with_rescan_interval(CONFIG.target_rescan_interval);

    let dt = 1.0 / TPS as f64;
    let mut pose = ObserverPose::from_parts(Pos(Vec3::zero()), Yaw(0.0));
    for tick_no in 0..10u32 {
        // 觀察者由外部移動組件驅動，這裡簡單轉一圈
        pose.yaw = tick_no as f32 * 3.0;
        let polygons = system.tick(
            dt,
            &[(1, pose, fov)],
            &scene,
            &detector,
            OBSTACLE_LAYER,
            TARGET_LAYER,
        );
        let polygon = &polygons[&1];
        info!(
            "tick {}: yaw {:.1} 度, 邊界點 {} 個, 可見目標 {:?}",
            tick_no,
            pose.yaw,
            polygon.points.len(),
            system.visible_targets(1).unwrap_or(&[])
        );
    }

    if let Some(mesh) = system.mesh(1) {
        debug!(
            "最終網格: {} 頂點, {} 三角形",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        println!("{}", serde_json::to_string_pretty(mesh)?);
    }

    Ok(())
}
