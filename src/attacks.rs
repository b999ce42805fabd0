use macroquad::prelude::*;

use crate::player::Facing;

pub const SWING_FRAMES: u32 = 5;

// Per-frame melee hitboxes, positioned off the player's center. The rects
// track the sword silhouette across the swing animation, one table per facing.
pub fn swing_hitbox(facing: Facing, frame: u32, center: Vec2) -> Option<Rect> {
    match facing {
        Facing::Down => attack_down(frame, center),
        Facing::Up => attack_up(frame, center),
        Facing::Left => attack_left(frame, center),
        Facing::Right => attack_right(frame, center),
    }
}

fn attack_down(frame: u32, center: Vec2) -> Option<Rect> {
    match frame {
        0 => Some(Rect::new(center.x - 8.0, center.y - 30.0, 48.0, 40.0)),
        1 => Some(Rect::new(center.x + 10.0, center.y + 8.0, 48.0, 20.0)),
        2 => Some(Rect::new(center.x - 4.0, center.y, 46.0, 52.0)),
        3 => Some(Rect::new(center.x - 12.0, center.y, 24.0, 70.0)),
        4 => Some(Rect::new(center.x - 36.0, center.y, 40.0, 60.0)),
        _ => None,
    }
}

fn attack_up(frame: u32, center: Vec2) -> Option<Rect> {
    match frame {
        0 => Some(Rect::new(center.x - 40.0, center.y - 40.0, 48.0, 40.0)),
        1 => Some(Rect::new(center.x - 10.0, center.y - 55.0, 20.0, 48.0)),
        2 => Some(Rect::new(center.x - 4.0, center.y - 38.0, 42.0, 52.0)),
        3 => Some(Rect::new(center.x - 12.0, center.y, 70.0, 24.0)),
        4 => Some(Rect::new(center.x, center.y, 48.0, 48.0)),
        _ => None,
    }
}

fn attack_left(frame: u32, center: Vec2) -> Option<Rect> {
    match frame {
        0 => Some(Rect::new(center.x, center.y - 40.0, 42.0, 40.0)),
        1 => Some(Rect::new(center.x - 5.0, center.y - 50.0, 20.0, 45.0)),
        2 => Some(Rect::new(center.x - 42.0, center.y - 36.0, 42.0, 52.0)),
        3 => Some(Rect::new(center.x - 60.0, center.y - 2.0, 70.0, 24.0)),
        4 => Some(Rect::new(center.x - 48.0, center.y, 48.0, 48.0)),
        _ => None,
    }
}

fn attack_right(frame: u32, center: Vec2) -> Option<Rect> {
    match frame {
        0 => Some(Rect::new(center.x - 40.0, center.y - 40.0, 48.0, 40.0)),
        1 => Some(Rect::new(center.x - 10.0, center.y - 53.0, 20.0, 48.0)),
        2 => Some(Rect::new(center.x - 4.0, center.y - 38.0, 42.0, 52.0)),
        3 => Some(Rect::new(center.x - 12.0, center.y, 70.0, 24.0)),
        4 => Some(Rect::new(center.x, center.y, 48.0, 48.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_facing_has_five_frames() {
        let center = vec2(100.0, 100.0);
        for facing in [Facing::Down, Facing::Up, Facing::Left, Facing::Right] {
            for frame in 0..SWING_FRAMES {
                let rect = swing_hitbox(facing, frame, center);
                assert!(rect.is_some(), "{facing:?} frame {frame} missing");
                let rect = rect.unwrap();
                assert!(rect.w > 0.0 && rect.h > 0.0);
            }
            assert!(swing_hitbox(facing, SWING_FRAMES, center).is_none());
            assert!(swing_hitbox(facing, 99, center).is_none());
        }
    }

    #[test]
    fn hitboxes_are_relative_to_center() {
        let a = swing_hitbox(Facing::Down, 2, vec2(0.0, 0.0)).unwrap();
        let b = swing_hitbox(Facing::Down, 2, vec2(50.0, -20.0)).unwrap();
        assert_eq!(b.x - a.x, 50.0);
        assert_eq!(b.y - a.y, -20.0);
        assert_eq!((a.w, a.h), (b.w, b.h));
    }

    #[test]
    fn left_swing_reaches_left_of_center() {
        let rect = swing_hitbox(Facing::Left, 3, vec2(0.0, 0.0)).unwrap();
        assert!(rect.x < 0.0);
    }
}
