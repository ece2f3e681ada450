use std::sync::Arc;

use super::clip::AnimationClip;
use crate::config::AnimationConfig;
use bevy_ecs::prelude::*;

/// 动画播放器组件 (贫血模型 - 纯数据结构)
///
/// 遵循DDD贫血模型设计原则：
/// - AnimationPlayer (Component): 纯数据结构 ← 本文件
/// - AnimationService (Service): 业务逻辑封装 → service.rs
/// - skeletal_animation_system (System): 系统调度编排
///
/// 动画片段通过 `Arc` 共享，多个骨骼实例可以同时播放同一个片段。
#[derive(Component, Debug, Clone)]
pub struct AnimationPlayer {
    /// 当前播放的动画片段
    pub clip: Option<Arc<AnimationClip>>,
    /// 当前播放时间 (秒)
    pub current_time: f32,
    /// 播放速度 (1.0 = 正常速度)
    pub speed: f32,
    /// 是否正在播放
    pub playing: bool,
    /// 是否循环
    pub looping: bool,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self {
            clip: None,
            current_time: 0.0,
            speed: 1.0,
            playing: false,
            looping: true,
        }
    }
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用配置中的速度与循环设置
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            speed: config.playback_speed,
            looping: config.looping,
            ..Self::default()
        }
    }
}

use super::service::AnimationService;
use super::skeleton::Skeleton;
use super::skin::SkinCluster;
use crate::ecs::Time;

/// 骨骼动画系统 - 每帧推进时间、采样、传播并更新蒙皮调色板
///
/// 使用 AnimationService 执行业务逻辑
pub fn skeletal_animation_system(
    time: Res<Time>,
    mut query: Query<(
        Entity,
        &mut AnimationPlayer,
        &mut Skeleton,
        Option<&mut SkinCluster>,
    )>,
) {
    for (entity, mut player, mut skeleton, skin) in query.iter_mut() {
        AnimationService::advance(&mut player, time.delta_seconds);

        let result = AnimationService::evaluate(
            &player,
            &mut skeleton,
            skin.map(|skin| skin.into_inner()),
        );
        if let Err(e) = result {
            tracing::error!(target: "animation", ?entity, "Pose evaluation failed: {}", e);
        }
    }
}
