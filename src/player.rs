use macroquad::prelude::*;

use crate::attacks::{SWING_FRAMES, swing_hitbox};
use crate::camera::Camera;
use crate::collision::aabb_collision;
use crate::entity::{DamageEvent, GameObject, ObjectView, Target, UpdateContext};

pub const FAR_EDGE_FACTOR: f32 = 0.75;
pub const NEAR_EDGE_FACTOR: f32 = 0.25;
pub const SWING_KNOCKBACK: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Down,
    Up,
    Left,
    Right,
}

pub fn update_player(player: &mut GameObject, views: &[ObjectView], ctx: &mut UpdateContext) {
    player.taking_damage = false;

    player.dir_x = ctx.intent.dir_x;
    player.dir_y = ctx.intent.dir_y;
    update_facing(player);

    // One trigger per tick; a click during an active swing is dropped.
    if ctx.intent.attack && player.swing.is_none() {
        player.swing = Some(0);
    }

    let (speed_x, speed_y) = adjusted_speed(player, ctx.camera);
    player.step_move(ctx.maps, speed_x, speed_y);

    let swing_rect = attack_rect(player);

    for other in views {
        if other.id == player.id {
            continue;
        }
        if aabb_collision(&player.rect, &other.rect) {
            // The player is never shoved; the other object backs out along its
            // own negated displacement.
            player.rect.x = player.prev.x;
            player.rect.y = player.prev.y;
            ctx.events.push(DamageEvent {
                target: Target::Object(other.id.clone()),
                amount: 0.0,
                knockback: -other.vector,
            });
        }
        if let Some(rect) = swing_rect {
            if aabb_collision(&rect, &other.rect) {
                ctx.events.push(DamageEvent {
                    target: Target::Object(other.id.clone()),
                    amount: player.stats.attack_power,
                    knockback: -other.vector * SWING_KNOCKBACK,
                });
            }
        }
    }

    advance_swing(player);
    follow_camera(player, ctx.camera);
    clamp_to_viewport(player, ctx.camera);
}

pub fn attack_rect(player: &GameObject) -> Option<Rect> {
    player
        .swing
        .and_then(|frame| swing_hitbox(player.facing, frame, player.center()))
}

fn update_facing(player: &mut GameObject) {
    if player.dir_x > 0.0 {
        player.facing = Facing::Right;
    } else if player.dir_x < 0.0 {
        player.facing = Facing::Left;
    } else if player.dir_y > 0.0 {
        player.facing = Facing::Down;
    } else if player.dir_y < 0.0 {
        player.facing = Facing::Up;
    }
}

fn advance_swing(player: &mut GameObject) {
    if let Some(frame) = player.swing {
        let next = frame + 1;
        player.swing = if next >= SWING_FRAMES { None } else { Some(next) };
    }
}

// While the camera is pinned against the world edge the player is walking
// toward, it can no longer scroll, so the player takes over the camera's
// speed; otherwise the player would visibly crawl against a frozen
// background near world edges.
fn adjusted_speed(player: &GameObject, camera: &Camera) -> (f32, f32) {
    let base = player.stats.speed;
    let boosted = base.max(camera.speed);
    let speed_x = if (player.dir_x < 0.0 && camera.pinned_left())
        || (player.dir_x > 0.0 && camera.pinned_right())
    {
        boosted
    } else {
        base
    };
    let speed_y = if (player.dir_y < 0.0 && camera.pinned_top())
        || (player.dir_y > 0.0 && camera.pinned_bottom())
    {
        boosted
    } else {
        base
    };
    (speed_x, speed_y)
}

// Dead zone: the middle 50% of the viewport. Crossing the far 75% line nudges
// the camera forward, dipping under the near 25% line nudges it back.
fn follow_camera(player: &GameObject, camera: &mut Camera) {
    if player.rect.x + player.rect.w > camera.x + camera.width * FAR_EDGE_FACTOR {
        camera.update(1.0, 0.0);
    }
    if player.rect.x - camera.x < camera.width * NEAR_EDGE_FACTOR {
        camera.update(-1.0, 0.0);
    }
    if player.rect.y + player.rect.h > camera.y + camera.height * FAR_EDGE_FACTOR {
        camera.update(0.0, 1.0);
    }
    if player.rect.y - camera.y < camera.height * NEAR_EDGE_FACTOR {
        camera.update(0.0, -1.0);
    }
}

fn clamp_to_viewport(player: &mut GameObject, camera: &Camera) {
    let max_x = camera.x + camera.width - player.rect.w;
    let max_y = camera.y + camera.height - player.rect.h;
    player.rect.x = player.rect.x.clamp(camera.x, max_x);
    player.rect.y = player.rect.y.clamp(camera.y, max_y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{GameObjects, ObjectKind, TickOutcome};
    use crate::input::TickIntent;
    use crate::layers::LayerRegistry;
    use crate::map::{TileData, TileMap, TileMaps};

    fn open_world() -> TileMaps {
        let mut maps = TileMaps::new();
        maps.set(TileMap::new(
            "background-0",
            24,
            18,
            vec![TileData::new(1, 1); 24 * 18],
        ));
        maps
    }

    fn camera_for(maps: &TileMaps) -> Camera {
        Camera::new(512.0, 512.0, maps.world_width(), maps.world_height(), 3.0)
    }

    fn run_tick(
        objects: &mut GameObjects,
        layers: &mut LayerRegistry,
        maps: &TileMaps,
        camera: &mut Camera,
        tick: u64,
        intent: TickIntent,
    ) -> TickOutcome {
        let mut ctx = UpdateContext {
            tick,
            intent,
            maps,
            camera,
            events: Vec::new(),
        };
        objects.update(&mut ctx, layers)
    }

    fn world_with_player(pos: Vec2) -> (TileMaps, Camera, LayerRegistry, GameObjects) {
        let maps = open_world();
        let camera = camera_for(&maps);
        let mut layers = LayerRegistry::new();
        let mut objects = GameObjects::new();
        objects
            .spawn(ObjectKind::Player, pos, None, &mut layers)
            .unwrap();
        (maps, camera, layers, objects)
    }

    #[test]
    fn camera_unchanged_inside_dead_zone() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(200.0, 200.0));
        run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            1,
            TickIntent::default(),
        );
        assert_eq!((camera.x, camera.y), (0.0, 0.0));
    }

    #[test]
    fn crossing_far_edge_scrolls_camera() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(360.0, 200.0));
        // 360 + 34 > 512 * 0.75
        run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            1,
            TickIntent::default(),
        );
        assert_eq!(camera.x, camera.speed);
        assert_eq!(camera.y, 0.0);
    }

    #[test]
    fn near_edge_scrolls_camera_back() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(600.0, 200.0));
        camera.x = 500.0;
        // 600 - 500 = 100 < 128
        run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            1,
            TickIntent::default(),
        );
        assert_eq!(camera.x, 500.0 - camera.speed);
    }

    #[test]
    fn viewport_clamp_is_idempotent() {
        let (maps, camera, _layers, mut objects) = world_with_player(vec2(0.0, 0.0));
        let player = objects.player_mut().unwrap();
        player.rect.x = -40.0;
        player.rect.y = 1000.0;
        clamp_to_viewport(player, &camera);
        let once = (player.rect.x, player.rect.y);
        clamp_to_viewport(player, &camera);
        assert_eq!(once, (player.rect.x, player.rect.y));
        assert_eq!(once, (0.0, camera.height - 46.0));
        let _ = maps;
    }

    #[test]
    fn facing_horizontal_wins_on_diagonals() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(200.0, 200.0));
        let intent = TickIntent {
            dir_x: 1.0,
            dir_y: 1.0,
            attack: false,
        };
        run_tick(&mut objects, &mut layers, &maps, &mut camera, 1, intent);
        assert_eq!(objects.player().unwrap().facing, Facing::Right);

        let intent = TickIntent {
            dir_x: 0.0,
            dir_y: -1.0,
            attack: false,
        };
        run_tick(&mut objects, &mut layers, &maps, &mut camera, 2, intent);
        assert_eq!(objects.player().unwrap().facing, Facing::Up);

        // Facing persists while idle.
        run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            3,
            TickIntent::default(),
        );
        assert_eq!(objects.player().unwrap().facing, Facing::Up);
    }

    #[test]
    fn swing_runs_five_frames_and_clears() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(200.0, 200.0));
        let attack = TickIntent {
            dir_x: 0.0,
            dir_y: 0.0,
            attack: true,
        };
        run_tick(&mut objects, &mut layers, &maps, &mut camera, 1, attack);
        assert_eq!(objects.player().unwrap().swing, Some(1));

        // A click mid-swing is dropped, not queued.
        run_tick(&mut objects, &mut layers, &maps, &mut camera, 2, attack);
        assert_eq!(objects.player().unwrap().swing, Some(2));

        for tick in 3..=5 {
            run_tick(
                &mut objects,
                &mut layers,
                &maps,
                &mut camera,
                tick,
                TickIntent::default(),
            );
        }
        assert_eq!(objects.player().unwrap().swing, None);

        // No queued swing starts on its own afterwards.
        run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            6,
            TickIntent::default(),
        );
        assert_eq!(objects.player().unwrap().swing, None);
    }

    #[test]
    fn killing_blow_removes_monster_from_both_registries() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(100.0, 100.0));
        let id = objects
            .spawn(
                ObjectKind::BlobMonster,
                vec2(140.0, 100.0),
                Some(vec2(20.0, 20.0)),
                &mut layers,
            )
            .unwrap();
        objects.get_mut(&id).unwrap().stats.health = 0.5;

        let outcome = run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            1,
            TickIntent {
                dir_x: 0.0,
                dir_y: 0.0,
                attack: true,
            },
        );

        assert_eq!(outcome.removed, vec![id.clone()]);
        assert!(!objects.contains(&id));
        assert!(!layers.contains(&id));

        // The next tick iterates cleanly without the dead id.
        let outcome = run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            2,
            TickIntent::default(),
        );
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn swing_damage_applies_every_overlapping_tick_but_once_per_tick() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(100.0, 100.0));
        let id = objects
            .spawn(
                ObjectKind::BlobMonster,
                vec2(140.0, 100.0),
                Some(vec2(20.0, 20.0)),
                &mut layers,
            )
            .unwrap();

        run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            1,
            TickIntent {
                dir_x: 0.0,
                dir_y: 0.0,
                attack: true,
            },
        );
        let after_one = objects.get(&id).unwrap().stats.health;
        assert_eq!(after_one, 19.0, "exactly one hit in one tick");
    }

    #[test]
    fn player_body_collision_reverts_player_only() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(200.0, 200.0));
        let tree = objects
            .spawn(
                ObjectKind::PalmTree,
                vec2(240.0, 210.0),
                Some(vec2(14.0, 12.0)),
                &mut layers,
            )
            .unwrap();
        let tree_rect = objects.get(&tree).unwrap().rect;

        // Walk right into the tree until contact, then keep pushing.
        for tick in 1..=40 {
            run_tick(
                &mut objects,
                &mut layers,
                &maps,
                &mut camera,
                tick,
                TickIntent {
                    dir_x: 1.0,
                    dir_y: 0.0,
                    attack: false,
                },
            );
        }
        let player = objects.player().unwrap();
        assert!(
            player.rect.x + player.rect.w <= tree_rect.x + 2.0,
            "player stops at the trunk"
        );
        assert_eq!(objects.get(&tree).unwrap().rect, tree_rect);
    }

    #[test]
    fn pinned_camera_boosts_player_speed() {
        let (maps, mut camera, mut layers, mut objects) = world_with_player(vec2(300.0, 200.0));
        assert!(camera.pinned_left());
        run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            1,
            TickIntent {
                dir_x: -1.0,
                dir_y: 0.0,
                attack: false,
            },
        );
        // Base speed 2, camera speed 3: pinned axis moves at camera speed.
        assert_eq!(objects.player().unwrap().rect.x, 297.0);

        // Moving away from the pinned edge uses the base speed.
        run_tick(
            &mut objects,
            &mut layers,
            &maps,
            &mut camera,
            2,
            TickIntent {
                dir_x: 1.0,
                dir_y: 0.0,
                attack: false,
            },
        );
        assert_eq!(objects.player().unwrap().rect.x, 299.0);
    }
}
