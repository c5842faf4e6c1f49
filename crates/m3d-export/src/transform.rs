//! Parent-relative transforms and rotation conversion

use glam::{DAffine3, DQuat, DVec3, EulerRot};
use m3d_core::{Error, Euler, Quat, Result, Transform, Vec3};
use m3d_scene::{ObjectId, SceneHost};

use crate::options::TransformMode;

/// Transform of an object relative to its parents, ready to be written
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTransform {
    /// Location, still in host axes
    pub location: Vec3,
    pub rotation: Euler,
    pub scale: Vec3,
    /// `rotation` converted with the Y angle negated
    pub quaternion: Quat,
}

impl ResolvedTransform {
    fn new(location: Vec3, rotation: Euler, scale: Vec3) -> Self {
        Self {
            location,
            rotation,
            scale,
            quaternion: to_quaternion(rotation.x, -rotation.y, rotation.z),
        }
    }
}

/// Convert roll/yaw/pitch Euler angles (radians) to a quaternion.
///
/// The result is not normalized.
pub fn to_quaternion(roll: f64, yaw: f64, pitch: f64) -> Quat {
    let (sin_pitch, cos_pitch) = (pitch * 0.5).sin_cos();
    let (sin_yaw, cos_yaw) = (yaw * 0.5).sin_cos();
    let (sin_roll, cos_roll) = (roll * 0.5).sin_cos();

    let cos_pitch_cos_yaw = cos_pitch * cos_yaw;
    let sin_pitch_sin_yaw = sin_pitch * sin_yaw;

    Quat {
        w: cos_roll * cos_pitch_cos_yaw + sin_roll * sin_pitch_sin_yaw,
        x: sin_roll * cos_pitch_cos_yaw - cos_roll * sin_pitch_sin_yaw,
        y: cos_roll * sin_pitch * cos_yaw + sin_roll * cos_pitch * sin_yaw,
        z: cos_roll * cos_pitch * sin_yaw - sin_roll * sin_pitch * cos_yaw,
    }
}

/// Resolve the transform of `id` relative to its parent chain.
///
/// Objects without a parent get their own transform back unchanged. A zero
/// ancestor scale component is not guarded against and yields inf/NaN.
pub fn resolve_transform<H: SceneHost + ?Sized>(
    host: &H,
    id: ObjectId,
    mode: TransformMode,
) -> Result<ResolvedTransform> {
    let object = host.object(id).ok_or_else(|| Error::UnknownObject { name: id.to_string() })?;
    let own = object.transform;

    let Some(parent) = object.parent else {
        return Ok(ResolvedTransform::new(own.location, own.rotation, own.scale));
    };

    match mode {
        TransformMode::Legacy => {
            let mut location = own.location;
            let mut rotation = own.rotation;
            let mut scale = own.scale;

            for ancestor in host.ancestors(id) {
                let Some(ancestor) = host.object(ancestor) else { break };
                let t = ancestor.transform;
                location = location - t.location;
                rotation = rotation - t.rotation;
                scale = scale / t.scale;
            }

            Ok(ResolvedTransform::new(location, rotation, scale))
        }
        TransformMode::Hierarchical => {
            let parent = host
                .object(parent)
                .ok_or_else(|| Error::UnknownObject { name: parent.to_string() })?;
            let relative = affine(&parent.transform).inverse() * affine(&own);
            let (scale, rotation, translation) = relative.to_scale_rotation_translation();
            let (z, y, x) = rotation.to_euler(EulerRot::ZYX);

            Ok(ResolvedTransform::new(
                Vec3::new(translation.x, translation.y, translation.z),
                Euler::new(x, y, z),
                Vec3::new(scale.x, scale.y, scale.z),
            ))
        }
    }
}

/// Host Euler order: X applied first, then Y, then Z
fn rotation_of(euler: Euler) -> DQuat {
    DQuat::from_rotation_z(euler.z) * DQuat::from_rotation_y(euler.y) * DQuat::from_rotation_x(euler.x)
}

fn affine(t: &Transform) -> DAffine3 {
    DAffine3::from_scale_rotation_translation(
        DVec3::from_array(t.scale.to_array()),
        rotation_of(t.rotation),
        DVec3::from_array(t.location.to_array()),
    )
}
