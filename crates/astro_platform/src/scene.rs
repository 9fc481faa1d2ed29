//! Scene graph mutation surface
//!
//! The figure's geometry, materials, and hierarchy are built by the host. The
//! frame loop only ever writes transforms on a handful of named nodes.

use astro_core::math::Axis;

/// Nodes of the figure the frame loop animates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FigureNode {
    /// Figure root; carries the hover bob
    Root,
    Head,
    LeftEye,
    RightEye,
}

impl FigureNode {
    pub const ALL: [FigureNode; 4] = [
        FigureNode::Root,
        FigureNode::Head,
        FigureNode::LeftEye,
        FigureNode::RightEye,
    ];

    pub const EYES: [FigureNode; 2] = [FigureNode::LeftEye, FigureNode::RightEye];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Head => "head",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
        }
    }
}

/// Write-only transform access to the host's scene
pub trait SceneGraph {
    /// Set a node's local position along one axis
    fn set_translation(&mut self, node: FigureNode, axis: Axis, value: f32);

    /// Set a node's local rotation (radians) around one axis
    fn set_rotation(&mut self, node: FigureNode, axis: Axis, radians: f32);

    /// Set a node's local scale along one axis
    fn set_scale(&mut self, node: FigureNode, axis: Axis, value: f32);
}
