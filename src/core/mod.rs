//! 核心模块
//!
//! 包含引擎的核心功能：
//! - `context` - 显式构造的动画上下文（资源持有者）
//! - `error` - 错误类型定义
//! - `logging` - 日志初始化

pub mod context;
pub mod error;
pub mod logging;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{
    AnimationError, AnimationResult, EngineError, EngineResult, ImportError, ImportResult,
};

pub use context::AnimationContext;
pub use logging::init_logging;
