//! ECS 资源与组件
//!
//! 骨骼、蒙皮簇和播放器本身是组件（定义在 `animation` 模块），
//! 这里提供帧时间资源和物体世界变换组件。

use bevy_ecs::prelude::*;
use glam::Mat4;

use crate::animation::Skeleton;

#[derive(Resource, Debug, Clone)]
pub struct Time {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
    pub fixed_time_step: f64,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            delta_seconds: 0.0,
            elapsed_seconds: 0.0,
            fixed_time_step: 1.0 / 60.0,
        }
    }
}

impl Time {
    pub fn with_fixed_step(step: f32) -> Self {
        Self {
            fixed_time_step: f64::from(step),
            ..Self::default()
        }
    }

    /// 推进一个固定步长
    pub fn tick_fixed(&mut self) {
        self.delta_seconds = self.fixed_time_step as f32;
        self.elapsed_seconds += self.fixed_time_step;
    }
}

/// 物体世界变换
#[derive(Component, Clone, Copy, Debug)]
pub struct WorldTransform {
    pub matrix: Mat4,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }
}

/// 渲染用的物体世界矩阵
///
/// 资源根节点带有烘焙偏移时，行向量约定下为 `rootLocal · world`。
pub fn object_world_matrix(world: &WorldTransform, skeleton: &Skeleton) -> Mat4 {
    world.matrix * skeleton.root_local_matrix()
}
