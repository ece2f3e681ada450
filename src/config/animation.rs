use super::{ConfigError, ConfigResult};
use crate::impl_default;
use crate::scene::CoordinateConversion;
use serde::{Deserialize, Serialize};

/// 动画配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// 播放速度 (1.0 = 正常速度)
    pub playback_speed: f32,

    /// 是否循环播放
    pub looping: bool,

    /// 固定时间步长 (秒)
    pub fixed_time_step: f32,

    /// 导入时的坐标系转换
    pub coordinate_conversion: CoordinateConversion,

    /// 关节重名时是否拒绝构建骨骼
    pub strict_joint_names: bool,
}

impl_default!(AnimationConfig {
    playback_speed: 1.0,
    looping: true,
    fixed_time_step: 1.0 / 60.0,
    coordinate_conversion: CoordinateConversion::MirrorX,
    strict_joint_names: false,
});

impl AnimationConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.playback_speed.is_finite() || self.playback_speed <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Playback speed must be positive".to_string(),
            ));
        }
        if self.fixed_time_step.is_nan() || self.fixed_time_step <= 0.0 || self.fixed_time_step > 1.0 {
            return Err(ConfigError::ValidationError(
                "Invalid fixed time step".to_string(),
            ));
        }
        Ok(())
    }
}
