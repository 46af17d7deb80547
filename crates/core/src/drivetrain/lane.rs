//! Lane keeping: lane registers, obstacle avoidance and steering offset

/// Lateral lane position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    /// Ordinal position, left to right
    pub const fn index(self) -> i32 {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    /// Lane selected by a three-position aux switch
    pub fn from_aux(value: f32) -> Self {
        if value < -0.5 {
            Lane::Left
        } else if value > 0.5 {
            Lane::Right
        } else {
            Lane::Center
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Lane::Left => "left",
            Lane::Center => "center",
            Lane::Right => "right",
        }
    }
}

/// Current (annotated) lane and the lane the vehicle should drive on
///
/// Written by aux-channel annotation and by obstacle avoidance; within a
/// tick the last writer wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneRequest {
    pub current: Lane,
    pub requested: Lane,
}

impl LaneRequest {
    /// Signed lane offset, positive when the requested lane is to the left
    pub fn adjustment(&self) -> i32 {
        self.current.index() - self.requested.index()
    }
}

/// Obstacle indicators from the detector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObstacleIndicators {
    pub left: bool,
    pub right: bool,
}

/// Lane to request given obstacles, `requested` when no one-sided obstacle
pub fn avoid_obstacles(requested: Lane, obstacles: ObstacleIndicators) -> Lane {
    match (obstacles.left, obstacles.right) {
        (true, false) => Lane::Right,
        (false, true) => Lane::Left,
        _ => requested,
    }
}

/// Steering offset for a lane adjustment
///
/// `table[n]` is the magnitude for an offset of `n` lanes (index clamped to
/// the table). No offset means no correction.
pub fn steering_adjustment(adjustment: i32, table: &[f32]) -> f32 {
    if adjustment == 0 || table.is_empty() {
        return 0.0;
    }
    let index = (adjustment.unsigned_abs() as usize).min(table.len() - 1);
    let magnitude = table[index];
    if adjustment > 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Apply the lane offset to a steering command, clamped to [-1, 1]
pub fn correct_steering(steering: f32, lanes: &LaneRequest, table: &[f32]) -> f32 {
    (steering + steering_adjustment(lanes.adjustment(), table)).clamp(-1.0, 1.0)
}
