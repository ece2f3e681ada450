//! 蒙皮绑定数据
//!
//! 定义蒙皮与骨骼的绑定关系以及每帧的矩阵调色板。

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};

use super::skeleton::Skeleton;
use crate::core::{AnimationError, AnimationResult};

/// 顶点骨骼影响（最多 4 个关节）
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexInfluence {
    /// 关节索引
    pub joints: [u32; 4],
    /// 权重（总和为 1.0）
    pub weights: [f32; 4],
}

impl VertexInfluence {
    pub fn new(joints: [u32; 4], weights: [f32; 4]) -> Self {
        Self { joints, weights }
    }

    /// 完全绑定到单个关节
    pub fn single(joint: u32) -> Self {
        Self {
            joints: [joint, 0, 0, 0],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// 归一化权重，权重全为 0 时保持不变
    pub fn normalized(mut self) -> Self {
        let total: f32 = self.weights.iter().sum();
        if total > 0.0 {
            for weight in &mut self.weights {
                *weight /= total;
            }
        }
        self
    }
}

/// 蒙皮簇组件
///
/// 每个 (骨骼, 模型) 对创建一次。逆绑定矩阵在创建时捕获一次，
/// 调色板必须在同一帧的骨骼传播之后更新。
#[derive(Component, Clone, Debug)]
pub struct SkinCluster {
    inverse_bind_poses: Vec<Mat4>,
    palette: Vec<Mat4>,
    influences: Vec<VertexInfluence>,
}

impl SkinCluster {
    /// 以骨骼当前姿态作为绑定姿态创建蒙皮簇
    pub fn build(skeleton: &Skeleton, influences: Vec<VertexInfluence>) -> AnimationResult<Self> {
        let joint_count = skeleton.joint_count();
        for (vertex, influence) in influences.iter().enumerate() {
            for (&joint, &weight) in influence.joints.iter().zip(&influence.weights) {
                if weight != 0.0 && joint as usize >= joint_count {
                    return Err(AnimationError::InvalidInfluence {
                        vertex,
                        joint,
                        joint_count,
                    });
                }
            }
        }

        let inverse_bind_poses = skeleton
            .joints()
            .iter()
            .map(|joint| joint.skeleton_space_matrix.inverse())
            .collect();

        let mut cluster = Self {
            inverse_bind_poses,
            palette: vec![Mat4::IDENTITY; joint_count],
            influences,
        };
        cluster.update(skeleton)?;
        Ok(cluster)
    }

    /// 更新矩阵调色板
    ///
    /// 行向量约定下 `palette[i] = inverseBindPose[i] · skeletonSpace[i]`。
    pub fn update(&mut self, skeleton: &Skeleton) -> AnimationResult<()> {
        if skeleton.joint_count() != self.inverse_bind_poses.len() {
            return Err(AnimationError::JointCountMismatch {
                expected: self.inverse_bind_poses.len(),
                actual: skeleton.joint_count(),
            });
        }

        for ((entry, inverse_bind), joint) in self
            .palette
            .iter_mut()
            .zip(&self.inverse_bind_poses)
            .zip(skeleton.joints())
        {
            *entry = joint.skeleton_space_matrix * *inverse_bind;
        }
        Ok(())
    }

    pub fn joint_count(&self) -> usize {
        self.palette.len()
    }

    pub fn palette(&self) -> &[Mat4] {
        &self.palette
    }

    pub fn inverse_bind_poses(&self) -> &[Mat4] {
        &self.inverse_bind_poses
    }

    pub fn influences(&self) -> &[VertexInfluence] {
        &self.influences
    }

    /// 调色板原始字节（每个关节 16 个列主序 f32），供渲染器上传常量缓冲区
    pub fn palette_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.palette)
    }

    /// 影响数据原始字节（顶点属性缓冲区）
    pub fn influence_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.influences)
    }

    /// CPU 线性混合蒙皮
    pub fn skin_positions(&self, positions: &[Vec3]) -> AnimationResult<Vec<Vec3>> {
        if positions.len() != self.influences.len() {
            return Err(AnimationError::VertexCountMismatch {
                expected: self.influences.len(),
                actual: positions.len(),
            });
        }

        Ok(positions
            .iter()
            .zip(&self.influences)
            .map(|(&position, influence)| {
                influence
                    .joints
                    .iter()
                    .zip(&influence.weights)
                    .filter(|(_, weight)| **weight != 0.0)
                    .map(|(&joint, &weight)| {
                        self.palette[joint as usize].transform_point3(position) * weight
                    })
                    .sum()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Transform;
    use crate::scene::{Node, NodeHierarchy};
    use glam::Quat;

    fn arm() -> Skeleton {
        let hierarchy = NodeHierarchy::new(
            Node::new("shoulder", Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)))
                .with_child(Node::new(
                    "elbow",
                    Transform::new(
                        Vec3::ONE,
                        Quat::from_rotation_z(0.4),
                        Vec3::new(1.0, 0.0, 0.0),
                    ),
                )),
        );
        Skeleton::build(&hierarchy)
    }

    #[test]
    fn test_palette_is_identity_in_bind_pose() {
        let skeleton = arm();
        let mut cluster = SkinCluster::build(&skeleton, Vec::new()).unwrap();
        cluster.update(&skeleton).unwrap();
        for matrix in cluster.palette() {
            assert!(matrix.abs_diff_eq(Mat4::IDENTITY, 1e-5));
        }
    }

    #[test]
    fn test_palette_follows_pose() {
        let mut skeleton = arm();
        let mut cluster = SkinCluster::build(&skeleton, vec![VertexInfluence::single(1)]).unwrap();

        skeleton.set_joint_transform(0, Transform::from_translation(Vec3::new(0.0, 3.0, 0.0)));
        skeleton.propagate();
        cluster.update(&skeleton).unwrap();

        // 整条手臂上移 2
        let vertex = Vec3::new(1.5, 1.2, 0.0);
        let skinned = cluster.skin_positions(&[vertex]).unwrap();
        assert!((skinned[0] - (vertex + Vec3::new(0.0, 2.0, 0.0))).length() < 1e-5);
    }

    #[test]
    fn test_stale_palette_without_propagate() {
        let mut skeleton = arm();
        let mut cluster = SkinCluster::build(&skeleton, Vec::new()).unwrap();

        skeleton.set_joint_transform(0, Transform::from_translation(Vec3::new(0.0, 3.0, 0.0)));
        cluster.update(&skeleton).unwrap();
        // 没有传播，骨骼空间矩阵未变，调色板仍为单位矩阵
        assert!(cluster.palette()[0].abs_diff_eq(Mat4::IDENTITY, 1e-5));

        skeleton.propagate();
        cluster.update(&skeleton).unwrap();
        assert!(!cluster.palette()[0].abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_blended_influence() {
        let mut skeleton = arm();
        let influence = VertexInfluence::new([0, 1, 0, 0], [1.0, 1.0, 0.0, 0.0]).normalized();
        assert_eq!(influence.weights, [0.5, 0.5, 0.0, 0.0]);
        let mut cluster = SkinCluster::build(&skeleton, vec![influence]).unwrap();

        // 只移动肘部（在肩部空间内平移）
        let elbow = skeleton.joint(1).unwrap().transform;
        skeleton.set_joint_transform(
            1,
            Transform {
                translation: elbow.translation + Vec3::new(0.0, 0.0, 2.0),
                ..elbow
            },
        );
        skeleton.propagate();
        cluster.update(&skeleton).unwrap();

        let skinned = cluster.skin_positions(&[Vec3::ZERO]).unwrap();
        assert!((skinned[0] - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_invalid_influence_rejected() {
        let skeleton = arm();
        let err = SkinCluster::build(&skeleton, vec![VertexInfluence::single(5)]).unwrap_err();
        assert_eq!(
            err,
            AnimationError::InvalidInfluence {
                vertex: 0,
                joint: 5,
                joint_count: 2,
            }
        );

        // 权重为 0 的槽位不检查
        let padded = VertexInfluence::new([0, 9, 9, 9], [1.0, 0.0, 0.0, 0.0]);
        assert!(SkinCluster::build(&skeleton, vec![padded]).is_ok());
    }

    #[test]
    fn test_joint_count_mismatch() {
        let skeleton = arm();
        let mut cluster = SkinCluster::build(&skeleton, Vec::new()).unwrap();
        let other = Skeleton::build(&NodeHierarchy::new(Node::new("solo", Transform::IDENTITY)));
        assert!(matches!(
            cluster.update(&other),
            Err(AnimationError::JointCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_palette_bytes_layout() {
        let skeleton = arm();
        let cluster = SkinCluster::build(&skeleton, vec![VertexInfluence::single(0)]).unwrap();
        assert_eq!(cluster.palette_bytes().len(), 2 * 64);
        assert_eq!(cluster.influence_bytes().len(), 32);
    }
}
