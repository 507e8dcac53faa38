//! Local transform state and the cached world transform
//!
//! Every local mutation takes the current [`Frame`] explicitly. The frame is
//! stamped into `last_changed_frame` and the cached world matrix is dropped,
//! so several mutations within one frame coalesce into one recompute the next
//! time the world transform is resolved.
//!
//! The cache is also keyed on the parent: each recompute bumps the node's
//! `world_revision`, and a child's cache is only valid while the parent
//! revision it was computed against is still current. Resolution is driven
//! top-down by [`SceneGraph`](super::SceneGraph).

use crate::foundation::math::{affine, Affine2, Vec2};
use crate::foundation::time::Frame;

/// Position, scale, rotation and skew of a display object, plus its cached
/// world matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec2,
    scale: Vec2,
    rotation: f32,
    skew: Vec2,

    world: Affine2,
    last_changed_frame: Frame,
    cached_frame: Option<Frame>,
    world_revision: u64,
    parent_revision: u64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            skew: Vec2::zeros(),
            world: Affine2::identity(),
            last_changed_frame: 0,
            cached_frame: None,
            world_revision: 0,
            parent_revision: 0,
        }
    }
}

impl Transform {
    /// Create an identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform at a position
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    /// Local position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Local x coordinate
    pub fn x(&self) -> f32 {
        self.position.x
    }

    /// Local y coordinate
    pub fn y(&self) -> f32 {
        self.position.y
    }

    /// Local scale factors
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Local rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Local skew angles in radians
    pub fn skew(&self) -> Vec2 {
        self.skew
    }

    /// Set the local position
    pub fn set_position(&mut self, x: f32, y: f32, frame: Frame) {
        self.position = Vec2::new(x, y);
        self.touch(frame);
    }

    /// Set the local x coordinate
    pub fn set_x(&mut self, x: f32, frame: Frame) {
        self.position.x = x;
        self.touch(frame);
    }

    /// Set the local y coordinate
    pub fn set_y(&mut self, y: f32, frame: Frame) {
        self.position.y = y;
        self.touch(frame);
    }

    /// Move by an offset
    pub fn translate(&mut self, dx: f32, dy: f32, frame: Frame) {
        self.position += Vec2::new(dx, dy);
        self.touch(frame);
    }

    /// Set the local scale
    pub fn set_scale(&mut self, sx: f32, sy: f32, frame: Frame) {
        self.scale = Vec2::new(sx, sy);
        self.touch(frame);
    }

    /// Set the local rotation in radians
    pub fn set_rotation(&mut self, rotation: f32, frame: Frame) {
        self.rotation = rotation;
        self.touch(frame);
    }

    /// Set the local skew angles in radians
    pub fn set_skew(&mut self, kx: f32, ky: f32, frame: Frame) {
        self.skew = Vec2::new(kx, ky);
        self.touch(frame);
    }

    /// Local matrix built from position, rotation, skew and scale
    pub fn local_matrix(&self) -> Affine2 {
        affine::from_parts(self.position, self.rotation, self.scale, self.skew)
    }

    /// World matrix as of the last resolve.
    ///
    /// Use [`SceneGraph::world_transform`](super::SceneGraph::world_transform)
    /// to get an up-to-date value.
    pub fn world(&self) -> &Affine2 {
        &self.world
    }

    /// Frame of the most recent local mutation
    pub fn last_changed_frame(&self) -> Frame {
        self.last_changed_frame
    }

    /// Frame at which the world matrix was last recomputed, if it is cached
    pub fn cached_frame(&self) -> Option<Frame> {
        self.cached_frame
    }

    fn touch(&mut self, frame: Frame) {
        self.last_changed_frame = frame;
        self.cached_frame = None;
    }

    pub(crate) fn world_revision(&self) -> u64 {
        self.world_revision
    }

    /// Whether the cached world matrix can be reused under a parent whose
    /// current revision is `parent_revision` (0 for roots).
    pub(crate) fn is_cache_valid(&self, parent_revision: u64) -> bool {
        matches!(self.cached_frame, Some(cached) if cached >= self.last_changed_frame)
            && self.parent_revision == parent_revision
    }

    /// Recompute the world matrix from the parent's world matrix and revision.
    pub(crate) fn recompute(&mut self, parent: Option<(&Affine2, u64)>, frame: Frame) {
        let local = self.local_matrix();
        match parent {
            Some((parent_world, parent_revision)) => {
                self.world = parent_world * local;
                self.parent_revision = parent_revision;
            }
            None => {
                self.world = local;
                self.parent_revision = 0;
            }
        }
        self.cached_frame = Some(frame);
        self.world_revision += 1;
    }

    /// Drop the cached world matrix (after reparenting).
    pub(crate) fn invalidate(&mut self) {
        self.cached_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let t = Transform::new();
        assert_eq!(t.position(), Vec2::zeros());
        assert_eq!(t.scale(), Vec2::new(1.0, 1.0));
        assert_eq!(t.rotation(), 0.0);
        assert_eq!(t.skew(), Vec2::zeros());
        assert_eq!(t.cached_frame(), None);
    }

    #[test]
    fn test_mutation_stamps_frame_and_drops_cache() {
        let mut t = Transform::at(1.0, 2.0);
        t.recompute(None, 3);
        assert!(t.is_cache_valid(0));

        t.set_rotation(0.5, 4);
        assert_eq!(t.last_changed_frame(), 4);
        assert!(!t.is_cache_valid(0));
    }

    #[test]
    fn test_recompute_composes_parent_first() {
        let parent = Transform::at(100.0, 100.0).local_matrix();
        let mut child = Transform::at(10.0, 0.0);
        child.recompute(Some((&parent, 7)), 1);

        assert_relative_eq!(affine::translation(child.world()), Vec2::new(110.0, 100.0));
        assert!(child.is_cache_valid(7));
        assert!(!child.is_cache_valid(8));
    }

    #[test]
    fn test_multiple_mutations_coalesce() {
        let mut t = Transform::new();
        t.set_x(1.0, 2);
        t.set_y(2.0, 2);
        t.translate(1.0, 1.0, 2);
        assert_eq!(t.position(), Vec2::new(2.0, 3.0));

        let before = t.world_revision();
        t.recompute(None, 2);
        assert_eq!(t.world_revision(), before + 1);
        assert!(t.is_cache_valid(0));
    }
}
