//! 统一错误处理模块
//!
//! 提供动画管线范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **导入错误** (`ImportError`): 场景描述缺失根节点、没有动画、通道为空等，整个加载失败
//! - **动画错误** (`AnimationError`): 运行时前置条件违例（空轨道、关节数不匹配等）
//!
//! `EngineError` 可以同时承载以上两类错误以及配置错误。

use thiserror::Error;

use crate::config::ConfigError;

/// 引擎核心错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 场景导入错误
///
/// 导入是全有或全无的：任何一个错误都会中止整个资源的加载。
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Scene has no root node")]
    MissingRoot,

    #[error("Scene has no animation sequences")]
    NoAnimations,

    #[error("Animation channel for node '{node}' has no {property} keys")]
    EmptyChannel { node: String, property: &'static str },

    #[error("Scene description parse error: {0}")]
    Parse(String),

    #[cfg(feature = "gltf")]
    #[error("glTF import error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 动画运行时错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("Cannot sample an empty keyframe track")]
    EmptyTrack,

    #[error("Duplicate joint name '{name}' (joints {first} and {duplicate})")]
    DuplicateJointName {
        name: String,
        first: usize,
        duplicate: usize,
    },

    #[error("Joint count mismatch: expected {expected}, got {actual}")]
    JointCountMismatch { expected: usize, actual: usize },

    #[error("Vertex {vertex} references joint {joint}, skeleton has {joint_count} joints")]
    InvalidInfluence {
        vertex: usize,
        joint: u32,
        joint_count: usize,
    },

    #[error("Vertex count mismatch: skin has {expected} influences, got {actual} vertices")]
    VertexCountMismatch { expected: usize, actual: usize },

    #[error("Unknown animation clip: {0}")]
    UnknownClip(String),

    #[error("Unknown node hierarchy: {0}")]
    UnknownHierarchy(String),
}

/// 引擎结果类型别名
pub type EngineResult<T> = Result<T, EngineError>;
pub type ImportResult<T> = Result<T, ImportError>;
pub type AnimationResult<T> = Result<T, AnimationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let import_err = ImportError::NoAnimations;
        let engine_err: EngineError = import_err.into();
        assert!(matches!(engine_err, EngineError::Import(_)));

        let anim_err = AnimationError::EmptyTrack;
        let engine_err: EngineError = anim_err.into();
        assert!(matches!(engine_err, EngineError::Animation(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ImportError::EmptyChannel {
            node: "hip".to_string(),
            property: "rotation",
        };
        assert_eq!(
            err.to_string(),
            "Animation channel for node 'hip' has no rotation keys"
        );

        let err = AnimationError::JointCountMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Joint count mismatch: expected 3, got 2");
    }
}
