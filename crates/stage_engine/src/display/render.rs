//! Draw command stream handed to the render backend
//!
//! The backend itself is external. A [`DisplayList`](super::DisplayList)
//! resolves world transforms and textures, then pushes one
//! [`DrawCommand`] per drawable object into a [`RenderSink`] in traversal
//! order.

use crate::assets::FrameRect;
use crate::foundation::collections::ObjectId;
use crate::foundation::math::Affine2;

/// One textured quad to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Object being drawn
    pub object: ObjectId,

    /// Texture key
    pub texture: String,

    /// Region of the texture to sample
    pub source: FrameRect,

    /// World matrix
    pub world: Affine2,

    /// Effective alpha (own alpha times ancestors')
    pub alpha: f32,

    /// Packed 0xRRGGBB tint
    pub tint: u32,
}

/// Receiver of draw commands
pub trait RenderSink {
    /// Draw one command
    fn draw(&mut self, command: &DrawCommand);
}

/// Sink that records every command, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Vec<DrawCommand>,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in draw order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands, keeping capacity
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSink for RecordingSink {
    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}
