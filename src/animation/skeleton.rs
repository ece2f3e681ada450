//! 骨骼数据结构
//!
//! 由节点层级展平得到的关节数组。父子关系用索引表示，不是所有权。
//!
//! ## 矩阵约定
//!
//! glam 使用列向量，行向量约定下的 `local · parent` 在代码中写作
//! `parent * local`，两者表示同一个几何变换。

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};
use std::collections::HashMap;

use super::transform::Transform;
use crate::core::{AnimationError, AnimationResult};
use crate::scene::{Node, NodeHierarchy};

// ============================================================================
// 关节
// ============================================================================

/// 关节
#[derive(Clone, Debug)]
pub struct Joint {
    /// 关节名称
    pub name: String,
    /// 当前局部变换（动画写入）
    pub transform: Transform,
    /// 局部矩阵
    pub local_matrix: Mat4,
    /// 骨骼空间矩阵
    pub skeleton_space_matrix: Mat4,
    index: usize,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Joint {
    /// 在骨骼中的索引（深度优先先序）
    pub fn index(&self) -> usize {
        self.index
    }

    /// 父关节索引（None 表示根关节）
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// 子关节索引
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// 骨骼空间中的位置
    pub fn skeleton_space_position(&self) -> Vec3 {
        self.skeleton_space_matrix.w_axis.truncate()
    }
}

// ============================================================================
// 骨骼
// ============================================================================

/// 骨骼组件
///
/// 关节按深度优先先序排列，保证父关节索引总是小于子关节索引，
/// 因此一次正向遍历即可完成层级传播。关节不会被重新挂接父节点。
#[derive(Component, Clone, Debug)]
pub struct Skeleton {
    root: usize,
    joints: Vec<Joint>,
    joint_map: HashMap<String, usize>,
}

impl Skeleton {
    /// 从节点层级构建骨骼
    ///
    /// 关节重名时名称查找返回索引最小的关节，并输出警告。
    pub fn build(hierarchy: &NodeHierarchy) -> Self {
        let mut joints = Vec::with_capacity(hierarchy.node_count());
        let root = create_joint(&hierarchy.root, None, &mut joints);

        let mut joint_map: HashMap<String, usize> = HashMap::with_capacity(joints.len());
        for joint in &joints {
            if let Some(&first) = joint_map.get(&joint.name) {
                tracing::warn!(
                    target: "animation",
                    name = %joint.name,
                    first,
                    duplicate = joint.index,
                    "Duplicate joint name, lookup keeps the first joint"
                );
                continue;
            }
            joint_map.insert(joint.name.clone(), joint.index);
        }

        let mut skeleton = Self {
            root,
            joints,
            joint_map,
        };
        // 构建后立即更新一次，保证骨骼空间矩阵有效
        skeleton.propagate();

        tracing::debug!(
            target: "animation",
            joints = skeleton.joints.len(),
            "Skeleton created"
        );
        skeleton
    }

    /// 从节点层级构建骨骼，关节重名时返回错误
    pub fn build_strict(hierarchy: &NodeHierarchy) -> AnimationResult<Self> {
        let skeleton = Self::build(hierarchy);
        for joint in &skeleton.joints {
            let first = skeleton.joint_map[&joint.name];
            if first != joint.index {
                return Err(AnimationError::DuplicateJointName {
                    name: joint.name.clone(),
                    first,
                    duplicate: joint.index,
                });
            }
        }
        Ok(skeleton)
    }

    /// 按配置选择构建方式
    pub fn build_with(hierarchy: &NodeHierarchy, strict_joint_names: bool) -> AnimationResult<Self> {
        if strict_joint_names {
            Self::build_strict(hierarchy)
        } else {
            Ok(Self::build(hierarchy))
        }
    }

    /// 根关节索引（构建保证为 0）
    pub fn root(&self) -> usize {
        self.root
    }

    /// 获取关节数量
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    /// 可变访问关节（只能修改变换与矩阵，层级关系不可变）
    pub fn joint_mut(&mut self, index: usize) -> Option<&mut Joint> {
        self.joints.get_mut(index)
    }

    pub(crate) fn joints_mut(&mut self) -> impl Iterator<Item = &mut Joint> {
        self.joints.iter_mut()
    }

    /// 通过名称获取关节索引
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joint_map.get(name).copied()
    }

    /// 设置关节局部变换
    pub fn set_joint_transform(&mut self, index: usize, transform: Transform) {
        if let Some(joint) = self.joints.get_mut(index) {
            joint.transform = transform;
        }
    }

    /// 计算所有关节的骨骼空间矩阵
    ///
    /// 按索引顺序遍历：先由变换重算局部矩阵，有父关节时再乘上父关节的骨骼空间矩阵。
    pub fn propagate(&mut self) {
        for i in 0..self.joints.len() {
            let local_matrix = self.joints[i].transform.to_matrix();

            let skeleton_space_matrix = match self.joints[i].parent {
                Some(parent) => {
                    debug_assert!(parent < i);
                    self.joints[parent].skeleton_space_matrix * local_matrix
                }
                None => local_matrix,
            };

            let joint = &mut self.joints[i];
            joint.local_matrix = local_matrix;
            joint.skeleton_space_matrix = skeleton_space_matrix;
        }
    }

    /// 根关节的局部矩阵（资源根节点带有烘焙偏移时用于物体世界矩阵）
    pub fn root_local_matrix(&self) -> Mat4 {
        self.joints
            .get(self.root)
            .map(|joint| joint.local_matrix)
            .unwrap_or(Mat4::IDENTITY)
    }

    /// 每个关节的骨骼空间矩阵
    pub fn skeleton_space_matrices(&self) -> Vec<Mat4> {
        self.joints
            .iter()
            .map(|joint| joint.skeleton_space_matrix)
            .collect()
    }

    /// 每个关节在骨骼空间中的位置（调试绘制关节标记）
    pub fn joint_positions(&self) -> Vec<Vec3> {
        self.joints
            .iter()
            .map(Joint::skeleton_space_position)
            .collect()
    }
}

/// 深度优先先序创建关节，返回自身索引
fn create_joint(node: &Node, parent: Option<usize>, joints: &mut Vec<Joint>) -> usize {
    let index = joints.len();
    joints.push(Joint {
        name: node.name.clone(),
        transform: node.transform,
        local_matrix: node.local_matrix,
        skeleton_space_matrix: Mat4::IDENTITY,
        index,
        parent,
        children: Vec::with_capacity(node.children.len()),
    });

    for child in &node.children {
        let child_index = create_joint(child, Some(index), joints);
        joints[index].children.push(child_index);
    }

    index
}

// ============================================================================
// 测试
// ============================================================================
