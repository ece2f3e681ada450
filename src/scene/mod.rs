//! 场景导入
//!
//! 外部导入器产出 [`SceneDescription`]，本模块把它转换为只读的 [`NodeHierarchy`]。

pub mod convert;
pub mod description;
#[cfg(feature = "gltf")]
pub mod gltf;
pub mod node;

pub use convert::CoordinateConversion;
pub use description::{
    ChannelDesc, LocalTransformDesc, QuatKeyDesc, SceneAnimationDesc, SceneDescription,
    SceneNodeDesc, VectorKeyDesc,
};
pub use node::{Node, NodeHierarchy};
