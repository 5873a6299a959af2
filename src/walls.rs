//! Reflection off the four walls of the region `[0, W] × [0, H]`.
//!
//! Wall bounces are perfectly elastic: the velocity component normal to the
//! wall is inverted and never scaled by the particle's restitution.

use bounce_common::SimParams;
use log::debug;

use crate::particle::State;

/// Which walls a particle touched during one reflection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallHits {
    pub floor: bool,
    pub ceiling: bool,
    pub left: bool,
    pub right: bool,
}

impl WallHits {
    pub fn any(&self) -> bool {
        self.floor || self.ceiling || self.left || self.right
    }
}

/// Pushes `state` back inside the region and reflects its velocity.
///
/// The four checks run independently in the order floor, ceiling, left, right
/// and all read the position as it stands, so a corner hit triggers two of
/// them in the same call. `position` is the top-left corner of a square of
/// side `diameter`.
pub fn reflect(state: &mut State, diameter: f64, params: &SimParams) -> WallHits {
    let mut hits = WallHits::default();
    let width = params.world_width;
    let height = params.world_height;
    let margin = params.wall_margin;

    if state.position.y > height - diameter {
        state.position.y = height - diameter - margin;
        state.velocity.y = -state.velocity.y;
        hits.floor = true;
    }
    if state.position.y < 0.0 {
        state.position.y = margin;
        state.velocity.y = -state.velocity.y;
        hits.ceiling = true;
    }
    // left.x == position.x
    if state.position.x < 0.0 {
        state.position.x = margin;
        state.velocity.x = -state.velocity.x;
        hits.left = true;
    }
    // right.x == position.x + diameter
    if state.position.x + diameter > width {
        state.position.x = (width - margin) - diameter;
        state.velocity.x = -state.velocity.x;
        hits.right = true;
    }

    if hits.any() {
        debug!("Wall contact {:?} (diameter {})", hits, diameter);
    }
    hits
}
