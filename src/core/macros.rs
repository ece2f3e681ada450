//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例（`config/animation.rs`）:
/// ```ignore
/// impl_default!(AnimationConfig {
///     playback_speed: 1.0,
///     looping: true,
///     fixed_time_step: 1.0 / 60.0,
///     coordinate_conversion: CoordinateConversion::MirrorX,
///     strict_joint_names: false,
/// });
///
/// assert!(AnimationConfig::default().looping);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

/// 同时实现Default和new()的宏
///
/// 使用示例（`config/mod.rs`）:
/// ```ignore
/// impl_default_and_new!(LoggingConfig {
///     level: LogLevel::Info,
///     ansi: true,
/// });
///
/// assert_eq!(LoggingConfig::new().level, LogLevel::Info);
/// ```
#[macro_export]
macro_rules! impl_default_and_new {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }

        impl $struct_name {
            pub fn new() -> Self {
                Self::default()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::config::{AnimationConfig, LogLevel, LoggingConfig};
    use crate::scene::CoordinateConversion;

    #[test]
    fn test_impl_default_and_new() {
        let s1 = LoggingConfig::default();
        let s2 = LoggingConfig::new();

        assert_eq!(s1.level, LogLevel::Info);
        assert!(s1.ansi);
        assert_eq!(s2.level, s1.level);
        assert_eq!(s2.ansi, s1.ansi);
    }

    #[test]
    fn test_impl_default() {
        let config = AnimationConfig::default();
        assert_eq!(config.playback_speed, 1.0);
        assert!(config.looping);
        assert_eq!(config.coordinate_conversion, CoordinateConversion::MirrorX);
        assert!(!config.strict_joint_names);
    }
}
