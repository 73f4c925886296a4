/// 數學正確性驗證測試
///
/// 驗證幾何換算、邊緣精煉收斂性與輸出不變量
#[cfg(test)]
mod tests {
    use rand::Rng;
    use vek::{Vec2, Vec3};

    use crate::comp::{FieldOfView, ObserverPose};
    use crate::vision::{
        build_visibility, Bounds, Footprint, GeometryUtils, LayerMask, ObstacleInfo,
        ObstacleScene, PolygonBuilder, QuadTree, TargetInfo,
    };

    const EPSILON: f32 = 1e-3;
    const OBSTACLE_LAYER: LayerMask = LayerMask(1);

    /// 測試角度與方向向量的換算
    #[test]
    fn test_dir_from_angle_mathematics() {
        assert!(GeometryUtils::dir_from_angle(0.0).distance(Vec3::new(0.0, 0.0, 1.0)) < EPSILON);
        assert!(GeometryUtils::dir_from_angle(90.0).distance(Vec3::new(1.0, 0.0, 0.0)) < EPSILON);
        assert!(
            GeometryUtils::dir_from_angle(180.0).distance(Vec3::new(0.0, 0.0, -1.0)) < EPSILON
        );
        assert!(
            GeometryUtils::dir_from_angle(-90.0).distance(Vec3::new(-1.0, 0.0, 0.0)) < EPSILON
        );

        // 角度 -> 方向 -> 角度 應為恆等
        let angle = 37.0;
        let recovered = GeometryUtils::angle_from_dir(GeometryUtils::dir_from_angle(angle));
        assert!((recovered - angle).abs() < EPSILON, "角度往返誤差 {}", recovered - angle);
    }

    /// 測試世界座標到觀察者區域座標的轉換
    #[test]
    fn test_world_to_local_mathematics() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let yaw = 30.0;

        // 朝向正前方 5 單位的點，區域座標應為 (0, 0, 5)
        let ahead = origin + GeometryUtils::dir_from_angle(yaw) * 5.0;
        let local = GeometryUtils::world_to_local(ahead, origin, yaw);
        assert!(local.distance(Vec3::new(0.0, 0.0, 5.0)) < EPSILON, "實際 {:?}", local);

        // 觀察者自身位置轉換後是原點
        let self_local = GeometryUtils::world_to_local(origin, origin, yaw);
        assert!(self_local.magnitude() < EPSILON);

        // Y 分量只平移不旋轉
        let above = origin + Vec3::new(0.0, 4.0, 0.0);
        let above_local = GeometryUtils::world_to_local(above, origin, yaw);
        assert!(above_local.distance(Vec3::new(0.0, 4.0, 0.0)) < EPSILON);
    }

    /// 測試射線與線段相交的數學正確性
    #[test]
    fn test_ray_line_intersection_mathematics() {
        let origin = Vec2::new(-150.0, 0.0);
        let direction = Vec2::new(1.0, 0.0);

        // 正交線段，交點距離 150
        let t = ObstacleScene::ray_line_intersection(
            origin,
            direction,
            Vec2::new(0.0, -10.0),
            Vec2::new(0.0, 10.0),
        );
        assert_eq!(t, Some(150.0));

        // 平行線段
        assert!(ObstacleScene::ray_line_intersection(
            origin,
            direction,
            Vec2::new(0.0, 5.0),
            Vec2::new(10.0, 5.0),
        )
        .is_none());

        // 線段在射線後方
        assert!(ObstacleScene::ray_line_intersection(
            origin,
            direction,
            Vec2::new(-200.0, -10.0),
            Vec2::new(-200.0, 10.0),
        )
        .is_none());

        // 射線越過線段端點之外
        assert!(ObstacleScene::ray_line_intersection(
            origin,
            direction,
            Vec2::new(0.0, 5.0),
            Vec2::new(0.0, 10.0),
        )
        .is_none());
    }

    /// 遮擋物與觀察者重合時優雅退化成近零長度射線，不報錯
    #[test]
    fn test_observer_inside_obstacle() {
        assert_eq!(
            ObstacleScene::ray_circle_intersection(
                Vec2::zero(),
                Vec2::new(0.0, 1.0),
                Vec2::zero(),
                1.0
            ),
            Some(0.0)
        );

        let scene = ObstacleScene::new(vec![ObstacleInfo {
            position: Vec3::zero(),
            footprint: Footprint::Circular { radius: 1.0 },
            layer: OBSTACLE_LAYER,
        }]);
        let pose = ObserverPose::new(Vec3::zero(), 0.0);
        let fov = FieldOfView::new(10.0, 90.0);

        let (polygon, _mesh) = build_visibility(&pose, &fov, &scene, OBSTACLE_LAYER);
        assert!(!polygon.points.is_empty());
        for point in &polygon.points {
            assert!(point.magnitude() < EPSILON, "射線應退化為零長度，實際 {:?}", point);
        }
    }

    /// 不變量：任意遮擋佈局下，邊界點都不超出視野半徑
    #[test]
    fn test_points_within_radius() {
        let mut rng = rand::rng();
        let mut obstacles = Vec::new();
        for _ in 0..30 {
            obstacles.push(ObstacleInfo {
                position: Vec3::new(
                    rng.random_range(-8.0f32..8.0),
                    0.0,
                    rng.random_range(-8.0f32..8.0),
                ),
                footprint: Footprint::Circular {
                    radius: rng.random_range(0.3f32..1.5),
                },
                layer: OBSTACLE_LAYER,
            });
        }
        let scene = ObstacleScene::new(obstacles);

        let pose = ObserverPose::new(Vec3::zero(), 25.0);
        let fov = FieldOfView::new(10.0, 140.0).with_resolution(2.0);
        let polygon = PolygonBuilder::build(&pose, &fov, &scene, OBSTACLE_LAYER);

        for point in &polygon.points {
            let dist = GeometryUtils::flat_distance(*point, pose.position);
            assert!(
                dist <= fov.view_radius + EPSILON,
                "邊界點超出半徑: {}",
                dist
            );
            assert!(point.y.abs() < 1e-6);
        }
    }

    /// 不變量：邊界點（含精煉插入的邊緣點）依角度非遞減排序
    #[test]
    fn test_polygon_angular_order() {
        let scene = ObstacleScene::new(vec![
            ObstacleInfo {
                position: Vec3::new(4.0, 0.0, 10.0),
                footprint: Footprint::Rectangle {
                    width: 4.0,
                    depth: 1.0,
                    rotation: 0.0,
                },
                layer: OBSTACLE_LAYER,
            },
            ObstacleInfo {
                position: Vec3::new(-5.0, 0.0, 8.0),
                footprint: Footprint::Circular { radius: 1.2 },
                layer: OBSTACLE_LAYER,
            },
        ]);
        let pose = ObserverPose::new(Vec3::zero(), 0.0);
        let fov = FieldOfView::new(20.0, 120.0).with_edge_resolve(6, 0.5);

        let polygon = PolygonBuilder::build(&pose, &fov, &scene, OBSTACLE_LAYER);
        assert!(polygon.points.len() > fov.step_count() as usize + 1, "牆緣應插入精煉點");

        let mut last_angle = f32::NEG_INFINITY;
        for point in &polygon.points {
            let offset = *point - pose.position;
            if GeometryUtils::flat(offset).magnitude() < 1e-4 {
                continue; // 零長度射線沒有定義角度
            }
            let angle = GeometryUtils::angle_from_dir(offset);
            assert!(
                angle >= last_angle - EPSILON,
                "角度順序違反: {} 在 {} 之後",
                angle,
                last_angle
            );
            last_angle = angle;
        }
    }

    /// 不變量：靜態場景與固定參數下輸出是決定性的
    #[test]
    fn test_determinism() {
        let scene = ObstacleScene::new(vec![ObstacleInfo {
            position: Vec3::new(2.0, 0.0, 6.0),
            footprint: Footprint::Rectangle {
                width: 3.0,
                depth: 1.0,
                rotation: 25.0,
            },
            layer: OBSTACLE_LAYER,
        }]);
        let pose = ObserverPose::new(Vec3::new(0.5, 0.0, -0.5), 10.0);
        let fov = FieldOfView::new(15.0, 100.0).with_resolution(1.5);

        let (polygon1, mesh1) = build_visibility(&pose, &fov, &scene, OBSTACLE_LAYER);
        let (polygon2, mesh2) = build_visibility(&pose, &fov, &scene, OBSTACLE_LAYER);
        assert_eq!(polygon1, polygon2);
        assert_eq!(mesh1, mesh2);
    }

    /// 收斂性：二分次數增加時，輪廓邊緣的角度誤差單調下降
    ///
    /// 牆的左緣真實輪廓角 = atan2(2.0, 10.5)，
    /// 下界從下方單調逼近，誤差不超過 括號寬度 / 2^k
    #[test]
    fn test_edge_refinement_convergence() {
        let scene = ObstacleScene::new(vec![ObstacleInfo {
            position: Vec3::new(5.0, 0.0, 10.0),
            footprint: Footprint::Rectangle {
                width: 6.0,
                depth: 1.0,
                rotation: 0.0,
            },
            layer: OBSTACLE_LAYER,
        }]);
        let pose = ObserverPose::new(Vec3::zero(), 0.0);
        let true_angle = (2.0f32).atan2(10.5).to_degrees();
        let bracket_width = 10.0f32;

        let base_fov = FieldOfView::new(20.0, 60.0);
        let min_vc = PolygonBuilder::view_cast(&pose, &base_fov, &scene, OBSTACLE_LAYER, 5.0);
        let max_vc = PolygonBuilder::view_cast(&pose, &base_fov, &scene, OBSTACLE_LAYER, 15.0);
        assert!(!min_vc.hit, "5 度的射線應該越過牆緣");
        assert!(max_vc.hit, "15 度的射線應該打中牆面");

        // 零次精煉：兩側都沒有移動
        let fov0 = base_fov.with_edge_resolve(0, 0.5);
        let edge0 =
            PolygonBuilder::find_edge(&pose, &min_vc, &max_vc, &fov0, &scene, OBSTACLE_LAYER);
        assert!(edge0.point_a.is_none());
        assert!(edge0.point_b.is_none());

        let mut last_error = f32::INFINITY;
        for iterations in [1u32, 2, 3, 4, 6, 8] {
            let fov = base_fov.with_edge_resolve(iterations, 0.5);
            let edge =
                PolygonBuilder::find_edge(&pose, &min_vc, &max_vc, &fov, &scene, OBSTACLE_LAYER);
            let near = edge.point_a.expect("下界至少移動一次");
            let near_angle = GeometryUtils::angle_from_dir(near - pose.position);

            // 下界永遠不越過真實邊緣
            let error = true_angle - near_angle;
            assert!(error >= -1e-3, "下界越過真實輪廓角: {}", error);
            assert!(
                error <= bracket_width / 2f32.powi(iterations as i32) + 0.05,
                "{} 次精煉的誤差 {} 超出括號上界",
                iterations,
                error
            );
            assert!(
                error <= last_error + 1e-4,
                "誤差未單調下降: {} 次後為 {}，前次 {}",
                iterations,
                error,
                last_error
            );
            last_error = error;
        }
        assert!(last_error < 0.1, "8 次精煉後誤差應小於 0.1 度，實際 {}", last_error);
    }

    /// 三角化有效性：N 個邊界點產生 N+1 個頂點、N-1 個全部引用頂點 0 的三角形
    #[test]
    fn test_triangulation_validity() {
        let scene = ObstacleScene::new(vec![ObstacleInfo {
            position: Vec3::new(0.0, 0.0, 6.0),
            footprint: Footprint::Rectangle {
                width: 4.0,
                depth: 1.0,
                rotation: 0.0,
            },
            layer: OBSTACLE_LAYER,
        }]);
        let pose = ObserverPose::new(Vec3::zero(), 0.0);
        let fov = FieldOfView::new(12.0, 90.0);

        let (polygon, mesh) = build_visibility(&pose, &fov, &scene, OBSTACLE_LAYER);
        let n = polygon.points.len();

        assert_eq!(mesh.vertex_count(), n + 1);
        assert_eq!(mesh.triangle_count(), n - 1);
        for (k, triangle) in mesh.triangles.chunks(3).enumerate() {
            assert_eq!(triangle[0], 0, "每個三角形都必須引用頂點 0");
            assert_eq!(triangle[1], k as u32 + 1);
            assert_eq!(triangle[2], k as u32 + 2);
        }
    }

    /// 測試四叉樹邊界與範圍查詢
    #[test]
    fn test_quadtree_query() {
        let bounds = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 100.0);
        assert!(bounds.contains_point(Vec2::new(50.0, 50.0)));
        assert!(bounds.contains_point(Vec2::new(0.0, 0.0)));
        assert!(!bounds.contains_point(Vec2::new(150.0, 50.0)));

        // 10x10 網格目標
        let mut targets = Vec::new();
        for i in 0..10u64 {
            for j in 0..10u64 {
                targets.push(TargetInfo {
                    id: i * 10 + j,
                    position: Vec3::new(i as f32 * 10.0 + 5.0, 0.0, j as f32 * 10.0 + 5.0),
                    layer: LayerMask(2),
                });
            }
        }

        let mut tree = QuadTree::new(4, 5);
        tree.initialize(bounds, targets);
        assert!(tree.count_nodes() > 1, "100 個目標應觸發細分");

        // 查詢結果與暴力掃描一致
        let center = Vec2::new(35.0, 35.0);
        let range = 20.0;
        let mut found: Vec<u64> = tree
            .query_targets_in_range(center, range)
            .iter()
            .map(|t| t.id)
            .collect();
        found.sort();

        let mut expected = Vec::new();
        for i in 0..10u64 {
            for j in 0..10u64 {
                let pos = Vec2::new(i as f32 * 10.0 + 5.0, j as f32 * 10.0 + 5.0);
                if pos.distance(center) <= range {
                    expected.push(i * 10 + j);
                }
            }
        }
        assert_eq!(found, expected);

        // 空樹查詢不當機
        let empty = QuadTree::new(4, 5);
        assert!(empty.query_targets_in_range(center, range).is_empty());
        assert_eq!(empty.count_nodes(), 0);
    }
}
