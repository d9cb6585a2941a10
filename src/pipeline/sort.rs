//! Transparent draw ordering

use super::RenderCommand;
use glam::Vec3;

/// Order commands back-to-front along the camera's view direction.
///
/// The key is the world-space center projected onto `forward`, so the
/// object farthest ahead of the camera is drawn first. The sort is stable:
/// commands with equal keys keep their collection order. Keys compare with
/// `f32::total_cmp`, so a NaN center still yields a consistent order.
pub fn sort_back_to_front(commands: &mut [RenderCommand], forward: Vec3) {
    commands.sort_by(|a, b| b.view_depth(forward).total_cmp(&a.view_depth(forward)));
}
