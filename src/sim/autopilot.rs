//! Demo-mode player
//!
//! Drives the session from its snapshot alone: steer under the nearest alive
//! unit, sidestep bombs falling onto the cannon and keep firing.

use super::entity::SpriteKind;
use super::snapshot::Snapshot;
use super::state::SessionStatus;
use super::tick::TickInput;

/// How far above the cannon a bomb is considered a threat
const DANGER_ZONE: f32 = 80.0;
/// Horizontal slack before the autopilot bothers to move
const AIM_TOLERANCE: f32 = 4.0;

/// Choose this tick's input for the demo player
pub fn autopilot_input(snapshot: &Snapshot) -> TickInput {
    let mut input = TickInput::default();
    match snapshot.status {
        SessionStatus::Paused | SessionStatus::NewWave => {
            input.resume = true;
            return input;
        }
        SessionStatus::Over => return input,
        SessionStatus::Active => {}
    }

    let player = snapshot.player.bounds;
    let center = player.center_x();

    // Bombs about to land on the cannon take priority over aiming
    let threat = snapshot
        .projectiles
        .iter()
        .filter(|p| matches!(p.kind, SpriteKind::Bomb | SpriteKind::ShipBomb))
        .filter(|p| {
            p.bounds.bottom() <= player.top() && player.top() - p.bounds.bottom() < DANGER_ZONE
        })
        .find(|p| p.bounds.right() > player.left() && p.bounds.left() < player.right());

    if let Some(bomb) = threat {
        if bomb.bounds.center_x() >= center {
            input.move_left = true;
        } else {
            input.move_right = true;
        }
    } else {
        let target = snapshot
            .units
            .iter()
            .filter(|u| u.alive)
            .map(|u| u.bounds.center_x())
            .min_by(|a, b| (a - center).abs().total_cmp(&(b - center).abs()));
        if let Some(target) = target {
            if target > center + AIM_TOLERANCE {
                input.move_right = true;
            } else if target < center - AIM_TOLERANCE {
                input.move_left = true;
            }
        }
    }

    input.fire = true;
    input
}
