use super::keyframe::{Keyframe, KeyframeTrack};
use super::transform::Transform;
use crate::core::{AnimationResult, ImportError, ImportResult};
use crate::scene::{CoordinateConversion, SceneAnimationDesc, SceneDescription};
use glam::{Quat, Vec3};
use std::collections::HashMap;

/// 单个节点的动画（平移、旋转、缩放三条轨道）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAnimation {
    pub translation: KeyframeTrack<Vec3>,
    pub rotation: KeyframeTrack<Quat>,
    pub scale: KeyframeTrack<Vec3>,
}

impl NodeAnimation {
    pub fn new(
        translation: KeyframeTrack<Vec3>,
        rotation: KeyframeTrack<Quat>,
        scale: KeyframeTrack<Vec3>,
    ) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// 三条轨道各自独立采样
    pub fn sample(&self, time: f32) -> AnimationResult<Transform> {
        Ok(Transform {
            translation: self.translation.sample(time)?,
            rotation: self.rotation.sample(time)?,
            scale: self.scale.sample(time)?,
        })
    }
}

/// 动画片段
///
/// 导入后只读，可通过 `Arc` 在多个骨骼实例之间共享。
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// 动画名称
    pub name: String,
    /// 持续时间 (秒)
    pub duration: f32,
    /// 节点名称 -> 节点动画
    pub node_animations: HashMap<String, NodeAnimation>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            node_animations: HashMap::new(),
        }
    }

    pub fn add_node_animation(&mut self, node_name: impl Into<String>, animation: NodeAnimation) {
        self.node_animations.insert(node_name.into(), animation);
    }

    pub fn node_animation(&self, node_name: &str) -> Option<&NodeAnimation> {
        self.node_animations.get(node_name)
    }

    /// 采样指定节点在指定时间的变换，节点没有动画时返回 `None`
    pub fn sample_node(&self, node_name: &str, time: f32) -> AnimationResult<Option<Transform>> {
        self.node_animations
            .get(node_name)
            .map(|animation| animation.sample(time))
            .transpose()
    }

    /// 按持续时间取模回绕
    ///
    /// 与 C 的 `fmod` 同号：负时间保持为负，采样时被夹到第一帧。
    /// 持续时间不为正时回绕没有意义，返回 0。
    pub fn wrap_time(&self, time: f32) -> f32 {
        if self.duration > 0.0 {
            time % self.duration
        } else {
            0.0
        }
    }

    /// 从场景描述导入第一个动画序列
    ///
    /// 文件中的其余动画序列会被忽略；没有动画序列时导入失败。
    pub fn import_first(
        scene: &SceneDescription,
        conversion: CoordinateConversion,
    ) -> ImportResult<Self> {
        let first = scene.animations.first().ok_or(ImportError::NoAnimations)?;
        if scene.animations.len() > 1 {
            tracing::debug!(
                target: "import",
                skipped = scene.animations.len() - 1,
                "Only the first animation sequence is imported"
            );
        }
        Self::from_desc(first, conversion)
    }

    /// 转换单个动画序列：tick 转秒，并应用与节点导入相同的坐标系转换
    pub fn from_desc(
        desc: &SceneAnimationDesc,
        conversion: CoordinateConversion,
    ) -> ImportResult<Self> {
        let ticks_per_second = if desc.ticks_per_second > 0.0 {
            desc.ticks_per_second
        } else {
            1.0
        };
        let seconds = |ticks: f64| (ticks / ticks_per_second) as f32;

        let mut clip = Self::new(desc.name.clone(), seconds(desc.duration_ticks));

        for channel in &desc.channels {
            // 同名通道的关键帧追加到同一个节点动画
            let animation = clip
                .node_animations
                .entry(channel.node_name.clone())
                .or_default();

            // 插值模式取自最后一个带该属性关键帧的通道
            if !channel.position_keys.is_empty() {
                animation.translation.interpolation = channel.position_interpolation;
            }
            if !channel.rotation_keys.is_empty() {
                animation.rotation.interpolation = channel.rotation_interpolation;
            }
            if !channel.scaling_keys.is_empty() {
                animation.scale.interpolation = channel.scaling_interpolation;
            }

            animation
                .translation
                .keyframes
                .extend(channel.position_keys.iter().map(|key| {
                    Keyframe::new(
                        seconds(key.time),
                        conversion.translation(Vec3::from_array(key.value)),
                    )
                }));
            animation
                .rotation
                .keyframes
                .extend(channel.rotation_keys.iter().map(|key| {
                    Keyframe::new(
                        seconds(key.time),
                        conversion.rotation(Quat::from_array(key.value)),
                    )
                }));
            animation
                .scale
                .keyframes
                .extend(channel.scaling_keys.iter().map(|key| {
                    Keyframe::new(
                        seconds(key.time),
                        conversion.scale(Vec3::from_array(key.value)),
                    )
                }));
        }

        for (node, animation) in &clip.node_animations {
            let missing = if animation.translation.is_empty() {
                Some("translation")
            } else if animation.rotation.is_empty() {
                Some("rotation")
            } else if animation.scale.is_empty() {
                Some("scale")
            } else {
                None
            };
            if let Some(property) = missing {
                return Err(ImportError::EmptyChannel {
                    node: node.clone(),
                    property,
                });
            }
        }

        tracing::info!(
            target: "import",
            clip = %clip.name,
            duration = clip.duration,
            channels = clip.node_animations.len(),
            "Imported animation clip"
        );
        Ok(clip)
    }
}
