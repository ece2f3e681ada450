//! 动画服务层
//!
//! 遵循DDD贫血模型，将动画业务逻辑封装在Service中

use std::sync::Arc;

use super::clip::AnimationClip;
use super::player::AnimationPlayer;
use super::skeleton::Skeleton;
use super::skin::SkinCluster;
use crate::core::AnimationResult;

/// 动画服务 - 封装动画业务逻辑
///
/// 遵循贫血模型设计原则：
/// - AnimationPlayer (Component): 纯数据结构
/// - AnimationService (Service): 封装业务逻辑
/// - skeletal_animation_system (System): 调度编排
pub struct AnimationService;

impl AnimationService {
    /// 播放动画片段
    pub fn play(player: &mut AnimationPlayer, clip: Arc<AnimationClip>) {
        if clip.duration <= 0.0 {
            tracing::warn!(
                target: "animation",
                clip = %clip.name,
                "Clip has a non-positive duration, time will not advance"
            );
        }
        player.clip = Some(clip);
        player.current_time = 0.0;
        player.playing = true;
    }

    /// 暂停播放
    pub fn pause(player: &mut AnimationPlayer) {
        player.playing = false;
    }

    /// 恢复播放
    pub fn resume(player: &mut AnimationPlayer) {
        player.playing = true;
    }

    /// 停止播放并重置
    pub fn stop(player: &mut AnimationPlayer) {
        player.playing = false;
        player.current_time = 0.0;
    }

    /// 设置播放速度
    pub fn set_speed(player: &mut AnimationPlayer, speed: f32) {
        player.speed = speed.max(0.0);
    }

    /// 跳转到指定时间
    pub fn seek(player: &mut AnimationPlayer, time: f32) {
        player.current_time = time.max(0.0);
        if let Some(clip) = &player.clip {
            if player.current_time > clip.duration {
                player.current_time = clip.duration.max(0.0);
            }
        }
    }

    /// 推进播放时间
    ///
    /// 循环播放时按持续时间取模回绕；否则停在结尾并停止播放。
    pub fn advance(player: &mut AnimationPlayer, delta_time: f32) {
        if !player.playing {
            return;
        }

        let Some(clip) = &player.clip else {
            return;
        };
        if clip.duration <= 0.0 {
            return;
        }

        player.current_time += delta_time * player.speed;

        if player.current_time >= clip.duration {
            if player.looping {
                player.current_time = clip.wrap_time(player.current_time);
            } else {
                player.current_time = clip.duration;
                player.playing = false;
            }
        }
    }

    /// 获取当前播放进度 (0.0 - 1.0)
    pub fn progress(player: &AnimationPlayer) -> f32 {
        if let Some(clip) = &player.clip {
            if clip.duration > 0.0 {
                return player.current_time / clip.duration;
            }
        }
        0.0
    }

    /// 检查动画是否播放完成
    pub fn is_finished(player: &AnimationPlayer) -> bool {
        if let Some(clip) = &player.clip {
            if !player.looping && player.current_time >= clip.duration {
                return true;
            }
        }
        false
    }

    /// 把动画片段在指定时间的采样写入骨骼关节
    ///
    /// 没有对应节点动画的关节保持原变换。不做层级传播，调用方需要随后调用
    /// [`Skeleton::propagate`]，这样可以叠加多个动画层后只传播一次。
    pub fn apply_animation(
        skeleton: &mut Skeleton,
        clip: &AnimationClip,
        time: f32,
    ) -> AnimationResult<()> {
        for joint in skeleton.joints_mut() {
            if let Some(animation) = clip.node_animation(&joint.name) {
                joint.transform = animation.sample(time)?;
            }
        }
        Ok(())
    }

    /// 一帧完整求值：采样 -> 传播 -> 蒙皮调色板
    pub fn evaluate(
        player: &AnimationPlayer,
        skeleton: &mut Skeleton,
        skin: Option<&mut SkinCluster>,
    ) -> AnimationResult<()> {
        if let Some(clip) = &player.clip {
            Self::apply_animation(skeleton, clip, player.current_time)?;
        }
        skeleton.propagate();
        if let Some(skin) = skin {
            skin.update(skeleton)?;
        }
        Ok(())
    }
}
