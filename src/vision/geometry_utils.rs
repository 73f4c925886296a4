use vek::{Vec2, Vec3};

pub struct GeometryUtils;

impl GeometryUtils {
    /// 由全域角度（度）計算 XZ 平面上的方向向量
    ///
    /// 角度從 +Z 軸順時針量測（俯視），0 度朝 +Z、90 度朝 +X
    pub fn dir_from_angle(angle_deg: f32) -> Vec3<f32> {
        let rad = angle_deg.to_radians();
        Vec3::new(rad.sin(), 0.0, rad.cos())
    }

    /// 由方向向量反推全域角度（度）
    pub fn angle_from_dir(dir: Vec3<f32>) -> f32 {
        dir.x.atan2(dir.z).to_degrees()
    }

    /// 取 XZ 平面分量
    pub fn flat(v: Vec3<f32>) -> Vec2<f32> {
        Vec2::new(v.x, v.z)
    }

    /// XZ 平面上兩點距離
    pub fn flat_distance(a: Vec3<f32>, b: Vec3<f32>) -> f32 {
        Self::flat(a).distance(Self::flat(b))
    }

    /// XZ 平面上兩向量的夾角（度，永遠非負）
    pub fn flat_angle_between(a: Vec3<f32>, b: Vec3<f32>) -> f32 {
        let fa = Self::flat(a);
        let fb = Self::flat(b);
        let denom = fa.magnitude() * fb.magnitude();
        if denom <= f32::EPSILON {
            return 0.0;
        }
        (fa.dot(fb) / denom).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// 世界座標轉觀察者區域座標
    ///
    /// 先平移到觀察者原點，再反向旋轉 yaw；Y 分量不變
    pub fn world_to_local(point: Vec3<f32>, origin: Vec3<f32>, yaw_deg: f32) -> Vec3<f32> {
        let rel = point - origin;
        let rad = yaw_deg.to_radians();
        let (s, c) = (rad.sin(), rad.cos());
        Vec3::new(c * rel.x - s * rel.z, rel.y, s * rel.x + c * rel.z)
    }
}
