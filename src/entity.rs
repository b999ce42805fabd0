use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::collision::{Circle, aabb_collision, circle_in_rectangle};
use crate::input::TickIntent;
use crate::layers::LayerRegistry;
use crate::map::TileMaps;
use crate::player::{Facing, update_player};

pub const PLAYER_ID: &str = "player";
pub const DETECTION_RADIUS: f32 = 100.0;
pub const MONSTER_KNOCKBACK: f32 = 10.0;

#[derive(Debug)]
pub enum ObjectError {
    NotFound(String),
    DuplicateId(String),
    PlayerExists,
}

impl std::fmt::Display for ObjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "game object not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate game object id: {id}"),
            Self::PlayerExists => write!(f, "a player already exists in this session"),
        }
    }
}

impl std::error::Error for ObjectError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectKind {
    Player,
    BlobMonster,
    PalmTree,
    Invisible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Player,
    Monster,
    Scenery,
}

impl ObjectKind {
    pub fn behavior(&self) -> Behavior {
        match self {
            Self::Player => Behavior::Player,
            Self::BlobMonster => Behavior::Monster,
            Self::PalmTree | Self::Invisible => Behavior::Scenery,
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Player => PLAYER_ID,
            Self::BlobMonster => "blob-monster",
            Self::PalmTree => "palm-tree",
            Self::Invisible => "invisible",
        }
    }

    pub fn z_layer(&self) -> i32 {
        match self {
            Self::Player | Self::BlobMonster => 10,
            Self::PalmTree | Self::Invisible => 20,
        }
    }

    pub fn base_size(&self) -> Vec2 {
        match self {
            Self::Player => vec2(34.0, 46.0),
            Self::BlobMonster => vec2(64.0, 76.0),
            Self::PalmTree => vec2(14.0, 12.0),
            Self::Invisible => vec2(64.0, 64.0),
        }
    }

    pub fn base_stats(&self) -> Stats {
        match self {
            Self::Player => Stats {
                speed: 2.0,
                health: 3.0,
                attack_power: 1.0,
                attack_speed: 0,
            },
            Self::BlobMonster => Stats {
                speed: 1.5,
                health: 20.0,
                attack_power: 0.5,
                attack_speed: 20,
            },
            Self::PalmTree => Stats {
                speed: 0.0,
                health: 10.0,
                attack_power: 0.0,
                attack_speed: 0,
            },
            // Deep pool so invisible blockers act as walls in practice.
            Self::Invisible => Stats {
                speed: 0.0,
                health: 50.0,
                attack_power: 0.0,
                attack_speed: 0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Stats {
    pub speed: f32,
    pub health: f32,
    pub attack_power: f32,
    // Ticks between contact hits; 0 disables the contact attack.
    pub attack_speed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Placement {
    pub pos: Point,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub width: f32,
    pub height: f32,
}

pub struct GameObject {
    pub id: String,
    pub kind: ObjectKind,
    pub rect: Rect,
    pub dir_x: f32,
    pub dir_y: f32,
    pub stats: Stats,
    // Realized displacement of the last move, consumed for knockback/recoil.
    pub vector: Vec2,
    pub prev: Rect,
    pub detected: bool,
    pub armed: bool,
    pub facing: Facing,
    pub swing: Option<u32>,
    pub taking_damage: bool,
}

impl GameObject {
    fn new(id: String, kind: ObjectKind, rect: Rect) -> Self {
        Self {
            id,
            kind,
            rect,
            dir_x: 0.0,
            dir_y: 0.0,
            stats: kind.base_stats(),
            vector: Vec2::ZERO,
            prev: rect,
            detected: false,
            armed: false,
            facing: Facing::Down,
            swing: None,
            taking_damage: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        vec2(
            self.rect.x + self.rect.w * 0.5,
            self.rect.y + self.rect.h * 0.5,
        )
    }

    pub fn view(&self) -> ObjectView {
        ObjectView {
            id: self.id.clone(),
            kind: self.kind,
            rect: self.rect,
            vector: self.vector,
        }
    }

    // Axis-separated move against every tile layer: x first, revert on any
    // blocking overlap, then y. A fully blocked tick leaves a zero vector.
    pub fn step_move(&mut self, maps: &TileMaps, speed_x: f32, speed_y: f32) {
        self.prev = self.rect;

        self.rect.x += self.dir_x * speed_x;
        if maps.collides(&self.rect) {
            self.rect.x = self.prev.x;
        }

        self.rect.y += self.dir_y * speed_y;
        if maps.collides(&self.rect) {
            self.rect.y = self.prev.y;
        }

        self.clamp_to_world(maps);

        let prev_center = vec2(self.prev.x + self.prev.w * 0.5, self.prev.y + self.prev.h * 0.5);
        self.vector = self.center() - prev_center;
    }

    pub fn clamp_to_world(&mut self, maps: &TileMaps) {
        let max_x = (maps.world_width() - self.rect.w).max(0.0);
        let max_y = (maps.world_height() - self.rect.h).max(0.0);
        self.rect.x = self.rect.x.clamp(0.0, max_x);
        self.rect.y = self.rect.y.clamp(0.0, max_y);
    }

    pub fn export(&self) -> Placement {
        Placement {
            pos: Point {
                x: self.rect.x,
                y: self.rect.y,
            },
            kind: self.kind,
            width: self.rect.w,
            height: self.rect.h,
        }
    }
}

// Start-of-tick snapshot of another object. Updates read these instead of
// live registry state, so collision outcomes do not depend on iteration order.
#[derive(Clone)]
pub struct ObjectView {
    pub id: String,
    pub kind: ObjectKind,
    pub rect: Rect,
    pub vector: Vec2,
}

pub enum Target {
    Player,
    Object(String),
}

pub struct DamageEvent {
    pub target: Target,
    pub amount: f32,
    pub knockback: Vec2,
}

pub struct UpdateContext<'a> {
    pub tick: u64,
    pub intent: TickIntent,
    pub maps: &'a TileMaps,
    pub camera: &'a mut Camera,
    pub events: Vec<DamageEvent>,
}

pub struct TickOutcome {
    pub player_dead: bool,
    pub removed: Vec<String>,
}

pub struct GameObjects {
    objects: Vec<GameObject>,
    next_id: u64,
}

impl GameObjects {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 0,
        }
    }

    pub fn from_placements(
        placements: &[Placement],
        layers: &mut LayerRegistry,
    ) -> Result<Self, ObjectError> {
        let mut objects = Self::new();
        for placement in placements {
            objects.spawn_from_placement(placement, layers)?;
        }
        Ok(objects)
    }

    pub fn spawn(
        &mut self,
        kind: ObjectKind,
        pos: Vec2,
        size: Option<Vec2>,
        layers: &mut LayerRegistry,
    ) -> Result<String, ObjectError> {
        let id = match kind {
            ObjectKind::Player => {
                if self.contains(PLAYER_ID) {
                    return Err(ObjectError::PlayerExists);
                }
                PLAYER_ID.to_string()
            }
            _ => {
                let id = format!("{}-{}", kind.id_prefix(), self.next_id);
                self.next_id += 1;
                id
            }
        };
        if self.contains(&id) {
            return Err(ObjectError::DuplicateId(id));
        }

        let size = size.unwrap_or_else(|| kind.base_size());
        let object = GameObject::new(id.clone(), kind, Rect::new(pos.x, pos.y, size.x, size.y));
        layers.add(&id, kind.z_layer());
        self.objects.push(object);
        Ok(id)
    }

    pub fn spawn_from_placement(
        &mut self,
        placement: &Placement,
        layers: &mut LayerRegistry,
    ) -> Result<String, ObjectError> {
        self.spawn(
            placement.kind,
            vec2(placement.pos.x, placement.pos.y),
            Some(vec2(placement.width, placement.height)),
            layers,
        )
    }

    pub fn get(&self, id: &str) -> Result<&GameObject, ObjectError> {
        self.objects
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| ObjectError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut GameObject, ObjectError> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| ObjectError::NotFound(id.to_string()))
    }

    pub fn player(&self) -> Result<&GameObject, ObjectError> {
        self.get(PLAYER_ID)
    }

    pub fn player_mut(&mut self) -> Result<&mut GameObject, ObjectError> {
        self.get_mut(PLAYER_ID)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    // Removes from the object registry and the render layer registry together;
    // a dead object must vanish from both in the same tick.
    pub fn remove(&mut self, id: &str, layers: &mut LayerRegistry) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| o.id != id);
        layers.remove(id);
        before != self.objects.len()
    }

    pub fn export(&self) -> Vec<Placement> {
        self.objects.iter().map(GameObject::export).collect()
    }

    pub fn update(&mut self, ctx: &mut UpdateContext, layers: &mut LayerRegistry) -> TickOutcome {
        let views: Vec<ObjectView> = self.objects.iter().map(GameObject::view).collect();

        for i in 0..self.objects.len() {
            let object = &mut self.objects[i];
            match object.kind.behavior() {
                Behavior::Player => update_player(object, &views, ctx),
                Behavior::Monster => update_monster(object, &views, ctx),
                Behavior::Scenery => {}
            }
        }

        let events = std::mem::take(&mut ctx.events);
        self.apply_events(events, ctx.maps);
        let removed = self.sweep_dead(layers);

        let player_dead = self
            .player()
            .map(|p| p.stats.health <= 0.0)
            .unwrap_or(true);
        TickOutcome {
            player_dead,
            removed,
        }
    }

    fn apply_events(&mut self, events: Vec<DamageEvent>, maps: &TileMaps) {
        for event in events {
            let id = match &event.target {
                Target::Player => PLAYER_ID,
                Target::Object(id) => id.as_str(),
            };
            let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
                continue;
            };
            object.rect.x += event.knockback.x;
            object.rect.y += event.knockback.y;
            object.clamp_to_world(maps);
            if event.amount > 0.0 {
                object.stats.health -= event.amount;
                if object.kind == ObjectKind::Player {
                    object.taking_damage = true;
                }
            }
        }
    }

    fn sweep_dead(&mut self, layers: &mut LayerRegistry) -> Vec<String> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.objects.len() {
            if self.objects[i].kind != ObjectKind::Player && self.objects[i].stats.health <= 0.0 {
                let object = self.objects.remove(i);
                layers.remove(&object.id);
                removed.push(object.id);
            } else {
                i += 1;
            }
        }
        removed
    }
}

fn update_monster(object: &mut GameObject, views: &[ObjectView], ctx: &mut UpdateContext) {
    object.dir_x = 0.0;
    object.dir_y = 0.0;

    let Some(player) = views.iter().find(|v| v.kind == ObjectKind::Player) else {
        object.detected = false;
        return;
    };

    let circle = Circle::new(object.center(), DETECTION_RADIUS);
    object.detected = circle_in_rectangle(&circle, &player.rect);

    // Greedy per-axis steering, no pathfinding; terrain can block a chase
    // indefinitely.
    if object.detected {
        if object.rect.x <= player.rect.x - object.rect.w {
            object.dir_x = 1.0;
        } else if object.rect.x >= player.rect.x + player.rect.w {
            object.dir_x = -1.0;
        }
        if object.rect.y <= player.rect.y - object.rect.h {
            object.dir_y = 1.0;
        } else if object.rect.y >= player.rect.y + player.rect.h {
            object.dir_y = -1.0;
        }
    }

    object.step_move(ctx.maps, object.stats.speed, object.stats.speed);

    for other in views {
        if other.id == object.id {
            continue;
        }
        if !aabb_collision(&object.rect, &other.rect) {
            continue;
        }
        if other.kind == ObjectKind::Player {
            attack_player(object, ctx);
        } else {
            // One-sided separation: back out along the negated displacement.
            object.rect.x += -object.vector.x;
            object.rect.y += -object.vector.y;
        }
    }

    object.clamp_to_world(ctx.maps);
}

// Cadence gate: contact arms the attack on off-beat ticks and fires it exactly
// once when the tick counter hits the attack-speed beat, so sustained contact
// deals at most one hit per window instead of one per tick.
fn attack_player(object: &mut GameObject, ctx: &mut UpdateContext) {
    if object.stats.attack_speed == 0 {
        return;
    }
    if ctx.tick % object.stats.attack_speed == 0 {
        if object.armed {
            object.armed = false;
            ctx.events.push(DamageEvent {
                target: Target::Player,
                amount: object.stats.attack_power,
                knockback: object.vector * MONSTER_KNOCKBACK,
            });
        }
    } else {
        object.armed = true;
    }
}
