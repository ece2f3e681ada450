//! 坐标系转换
//!
//! 场景源是右手坐标系，运行时使用左手坐标系（行向量约定）。
//! 通过镜像 X 轴完成转换：平移取反 x，四元数取反 y 和 z，缩放不变。
//! 节点变换和动画关键帧必须使用同一条规则，否则关节会被错误镜像。

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::Transform;

/// 导入时应用的坐标系转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateConversion {
    /// 右手 -> 左手（镜像 X 轴）
    #[default]
    MirrorX,
    /// 不做转换
    None,
}

impl CoordinateConversion {
    pub fn translation(self, v: Vec3) -> Vec3 {
        match self {
            Self::MirrorX => Vec3::new(-v.x, v.y, v.z),
            Self::None => v,
        }
    }

    pub fn rotation(self, q: Quat) -> Quat {
        match self {
            // 镜像后旋转方向相反，因此 y、z 轴取反
            Self::MirrorX => Quat::from_xyzw(q.x, -q.y, -q.z, q.w),
            Self::None => q,
        }
    }

    pub fn scale(self, v: Vec3) -> Vec3 {
        v
    }

    pub fn transform(self, t: Transform) -> Transform {
        Transform::new(
            self.scale(t.scale),
            self.rotation(t.rotation),
            self.translation(t.translation),
        )
    }
}
