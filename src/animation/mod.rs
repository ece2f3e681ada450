//! 骨骼动画模块
//!
//! 提供关键帧采样、骨骼层级传播和蒙皮矩阵调色板。
//!
//! ## 每帧流程
//!
//! 采样 -> 写入关节局部变换 -> 骨骼自顶向下传播 -> 更新蒙皮调色板 -> 交给渲染器
//!
//! ## 使用示例
//!
//! ```rust
//! use skeletal_anim::animation::{AnimationService, Skeleton, SkinCluster, Transform};
//! use skeletal_anim::scene::{Node, NodeHierarchy};
//! use glam::Vec3;
//!
//! let up = |name: &str| Node::new(name, Transform::from_translation(Vec3::Y));
//! let hierarchy = NodeHierarchy::new(up("root").with_child(up("mid").with_child(up("tip"))));
//!
//! let mut skeleton = Skeleton::build(&hierarchy);
//! let mut skin = SkinCluster::build(&skeleton, Vec::new()).unwrap();
//!
//! skeleton.propagate();
//! skin.update(&skeleton).unwrap();
//! assert_eq!(skeleton.joint_positions()[2], Vec3::new(0.0, 3.0, 0.0));
//! ```

pub mod clip;
pub mod keyframe;
pub mod player;
pub mod service;
pub mod skeleton;
pub mod skin;
pub mod transform;

pub use clip::{AnimationClip, NodeAnimation};
pub use keyframe::{Interpolate, InterpolationMode, Keyframe, KeyframeTrack};
pub use player::{skeletal_animation_system, AnimationPlayer};
pub use service::AnimationService;
pub use skeleton::{Joint, Skeleton};
pub use skin::{SkinCluster, VertexInfluence};
pub use transform::Transform;
