use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::{AnimationError, AnimationResult};

/// 插值模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// 线性插值（向量 lerp，四元数 slerp）
    #[default]
    Linear,
    /// 阶梯插值 (无插值)
    Step,
}

/// 可在两个关键帧之间插值的值
pub trait Interpolate: Copy {
    fn interpolate(from: Self, to: Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

impl Interpolate for Quat {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from.slerp(to, t)
    }
}

/// 关键帧
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    /// 时间 (秒)
    pub time: f32,
    /// 值
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// 关键帧轨道
///
/// 关键帧时间应单调不减，但不做强制检查。采样空轨道是前置条件违例。
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T> {
    /// 关键帧列表
    pub keyframes: Vec<Keyframe<T>>,
    /// 插值模式
    pub interpolation: InterpolationMode,
}

impl<T> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self::new(InterpolationMode::Linear)
    }
}

impl<T> KeyframeTrack<T> {
    pub fn new(interpolation: InterpolationMode) -> Self {
        Self {
            keyframes: Vec::new(),
            interpolation,
        }
    }

    /// 由现有关键帧构建，保持给定顺序
    pub fn from_keyframes(keyframes: Vec<Keyframe<T>>) -> AnimationResult<Self> {
        if keyframes.is_empty() {
            return Err(AnimationError::EmptyTrack);
        }
        Ok(Self {
            keyframes,
            interpolation: InterpolationMode::Linear,
        })
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// 添加关键帧（按时间排序插入，同一时间的关键帧排在已有关键帧之后）
    pub fn add_keyframe(&mut self, time: f32, value: T) {
        let index = self.keyframes.partition_point(|k| k.time <= time);
        self.keyframes.insert(index, Keyframe { time, value });
    }

    /// 在末尾追加关键帧，不排序
    pub fn push(&mut self, time: f32, value: T) {
        self.keyframes.push(Keyframe { time, value });
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// 最后一个关键帧的时间
    pub fn end_time(&self) -> Option<f32> {
        self.keyframes.last().map(|k| k.time)
    }
}

impl<T: Interpolate> KeyframeTrack<T> {
    /// 获取指定时间的值
    ///
    /// - 只有一个关键帧，或时间不晚于第一个关键帧：返回第一个值
    /// - 线性扫描，找到第一对满足 `k0.time <= time <= k1.time` 的关键帧并插值
    /// - 时间晚于最后一个关键帧：返回最后一个值
    pub fn sample(&self, time: f32) -> AnimationResult<T> {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AnimationError::EmptyTrack),
        };

        if self.keyframes.len() == 1 || time <= first.time {
            return Ok(first.value);
        }

        for pair in self.keyframes.windows(2) {
            let (k0, k1) = (&pair[0], &pair[1]);

            if k0.time <= time && time <= k1.time {
                // 端点精确返回，避免浮点误差
                if time == k0.time {
                    return Ok(k0.value);
                }
                if time == k1.time {
                    return Ok(k1.value);
                }
                return Ok(match self.interpolation {
                    InterpolationMode::Step => k0.value,
                    InterpolationMode::Linear => {
                        let t = (time - k0.time) / (k1.time - k0.time);
                        T::interpolate(k0.value, k1.value, t)
                    }
                });
            }
        }

        Ok(last.value)
    }
}
