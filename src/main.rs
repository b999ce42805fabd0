use macroquad::file::load_string;
use macroquad::prelude::*;

mod attacks;
mod camera;
mod collision;
mod editor;
mod entity;
mod input;
mod layers;
mod map;
mod player;

use camera::Camera;
use editor::Editor;
use entity::{GameObject, GameObjects, ObjectKind, Placement, Point, UpdateContext};
use input::Input;
use layers::LayerRegistry;
use map::{
    BACKGROUND_ID, TILE_EMPTY, TILE_OUT_OF_BOUNDS, TILE_SIZE, TileData, TileMap, TileMaps,
};
use player::attack_rect;

const VIEW_WIDTH: f32 = 512.0;
const VIEW_HEIGHT: f32 = 512.0;
const TICK_INTERVAL_MS: f64 = 100.0;
const CAMERA_SPEED: f32 = 3.0;
const MAX_TICKS_PER_FRAME: u64 = 5;
const WORLD_FILE: &str = "assets/world.json";
const WORLD_COLS: usize = 24;
const WORLD_ROWS: usize = 18;

fn window_conf() -> Conf {
    Conf {
        window_title: "isleblade".to_owned(),
        window_width: VIEW_WIDTH as i32,
        window_height: VIEW_HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

struct World {
    maps: TileMaps,
    objects: GameObjects,
    layers: LayerRegistry,
    camera: Camera,
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut world = load_world().await;
    let mut input = Input::new();
    let mut editor = Editor::new();
    let mut debug = false;
    let mut running = true;

    let mut last_tick: u64 = 0;
    let mut fps = 0;
    let mut fps_timer = 0.0;

    loop {
        // Left click is the attack trigger in play and a tool in the editor.
        if !editor.enabled && running {
            input.poll();
        }
        handle_bindings(&mut editor, &mut debug, &mut world);

        if running {
            let wall_tick = (get_time() * 1000.0 / TICK_INTERVAL_MS) as u64;
            let mut steps = 0;
            while last_tick < wall_tick && steps < MAX_TICKS_PER_FRAME {
                last_tick += 1;
                steps += 1;
                let intent = input.tick_intent();
                let mut ctx = UpdateContext {
                    tick: last_tick,
                    intent,
                    maps: &world.maps,
                    camera: &mut world.camera,
                    events: Vec::new(),
                };
                let outcome = world.objects.update(&mut ctx, &mut world.layers);
                for id in &outcome.removed {
                    info!("{id} destroyed");
                }
                if outcome.player_dead {
                    running = false;
                    warn!("player died, session over");
                    break;
                }
            }
            // After a long stall, drop the backlog instead of fast-forwarding.
            if last_tick < wall_tick {
                last_tick = wall_tick;
            }
        }

        render(&world, last_tick, debug, &editor, running);

        fps_timer += get_frame_time();
        if fps_timer >= 1.0 {
            fps = get_fps();
            fps_timer = 0.0;
        }
        draw_text(&format!("FPS: {fps}"), 20.0, 40.0, 30.0, WHITE);

        next_frame().await;
    }
}

async fn load_world() -> World {
    let file = match load_string(WORLD_FILE).await {
        Ok(json) => match editor::parse_world(&json) {
            Ok(file) => Some(file),
            Err(err) => {
                error!("world file rejected: {err}");
                None
            }
        },
        Err(err) => {
            info!("no world file ({err}), using the built-in island");
            None
        }
    };

    let (cols, rows, tile_layers, placements) = match file {
        Some(file) => (file.cols, file.rows, file.tile_layers, file.objects),
        None => (
            WORLD_COLS,
            WORLD_ROWS,
            default_tile_layers(),
            default_placements(),
        ),
    };

    let mut layers = LayerRegistry::new();
    let maps = match TileMaps::from_layer_data(cols, rows, tile_layers) {
        Ok(maps) => maps,
        Err(err) => {
            error!("tile layers rejected: {err}");
            TileMaps::from_layer_data(WORLD_COLS, WORLD_ROWS, default_tile_layers())
                .unwrap_or_else(|_| unreachable!("built-in world grid is non-empty"))
        }
    };
    for (z, map) in maps.array().iter().enumerate() {
        layers.add(&map.id, z as i32);
    }

    let mut objects = match GameObjects::from_placements(&placements, &mut layers) {
        Ok(objects) => objects,
        Err(err) => {
            error!("placements rejected: {err}");
            let mut fresh = LayerRegistry::new();
            for (z, map) in maps.array().iter().enumerate() {
                fresh.add(&map.id, z as i32);
            }
            layers = fresh;
            GameObjects::new()
        }
    };
    if objects.player().is_err() {
        info!("no player placement, spawning at the island center");
        let center = vec2(maps.world_width() * 0.5, maps.world_height() * 0.5);
        if let Err(err) = objects.spawn(ObjectKind::Player, center, None, &mut layers) {
            error!("{err}");
        }
    }

    let camera = Camera::new(
        VIEW_WIDTH,
        VIEW_HEIGHT,
        maps.world_width(),
        maps.world_height(),
        CAMERA_SPEED,
    );

    World {
        maps,
        objects,
        layers,
        camera,
    }
}

fn default_tile_layers() -> Vec<Vec<TileData>> {
    let mut ground = Vec::with_capacity(WORLD_COLS * WORLD_ROWS);
    for row in 0..WORLD_ROWS {
        for col in 0..WORLD_COLS {
            let border =
                row == 0 || col == 0 || row == WORLD_ROWS - 1 || col == WORLD_COLS - 1;
            let tile = if border {
                TileData::new(0, TILE_OUT_OF_BOUNDS)
            } else {
                let subtype = ((col + row) % 3 + 1) as i32;
                TileData::new(subtype, subtype)
            };
            ground.push(tile);
        }
    }

    let mut obstacles = vec![TileData::empty(); WORLD_COLS * WORLD_ROWS];
    for (col, row) in [(6, 4), (7, 4), (12, 9), (13, 10), (17, 5), (5, 13)] {
        obstacles[row * WORLD_COLS + col] = TileData::new(0, TILE_OUT_OF_BOUNDS);
    }

    vec![ground, obstacles]
}

fn default_placements() -> Vec<Placement> {
    let place = |kind: ObjectKind, x: f32, y: f32| {
        let size = kind.base_size();
        Placement {
            pos: Point { x, y },
            kind,
            width: size.x,
            height: size.y,
        }
    };
    vec![
        place(ObjectKind::Player, 5.0 * TILE_SIZE, 5.0 * TILE_SIZE),
        place(ObjectKind::BlobMonster, 10.0 * TILE_SIZE, 4.0 * TILE_SIZE),
        place(ObjectKind::BlobMonster, 14.0 * TILE_SIZE, 10.0 * TILE_SIZE),
        place(ObjectKind::BlobMonster, 6.0 * TILE_SIZE, 13.0 * TILE_SIZE),
        place(ObjectKind::PalmTree, 3.0 * TILE_SIZE, 3.0 * TILE_SIZE),
        place(ObjectKind::PalmTree, 16.0 * TILE_SIZE, 6.0 * TILE_SIZE),
        place(ObjectKind::PalmTree, 9.0 * TILE_SIZE, 12.0 * TILE_SIZE),
        place(ObjectKind::Invisible, 11.0 * TILE_SIZE, 14.0 * TILE_SIZE),
    ]
}

fn handle_bindings(editor: &mut Editor, debug: &mut bool, world: &mut World) {
    if is_key_pressed(KeyCode::Tab) {
        editor.toggle();
    }
    if is_key_pressed(KeyCode::F1) {
        *debug = !*debug;
    }
    if !editor.enabled {
        return;
    }

    if is_key_pressed(KeyCode::T) {
        editor.next_tile();
    }
    if is_key_pressed(KeyCode::O) {
        editor.next_object();
    }
    if is_key_pressed(KeyCode::L) {
        editor.next_layer(&world.maps);
    }
    if is_key_pressed(KeyCode::F5) {
        match editor::export_world(&world.maps, &world.objects)
            .and_then(|json| editor::save_world(WORLD_FILE, &json))
        {
            Ok(()) => info!("world exported to {WORLD_FILE}"),
            Err(err) => error!("world export failed: {err}"),
        }
    }

    let (mx, my) = mouse_position();
    let mouse_world = world.camera.view_to_world(vec2(mx, my));
    if is_mouse_button_down(MouseButton::Left) {
        editor.paint_tile(&mut world.maps, mouse_world);
    }
    if is_mouse_button_pressed(MouseButton::Middle) {
        match editor.place_object(&mut world.objects, &mut world.layers, mouse_world) {
            Ok(id) => info!("placed {id}"),
            Err(err) => warn!("{err}"),
        }
    }
    if is_mouse_button_pressed(MouseButton::Right) {
        if let Some(id) = editor.remove_object_at(&mut world.objects, &mut world.layers, mouse_world)
        {
            info!("deleted {id}");
        }
    }
}

fn render(world: &World, tick: u64, debug: bool, editor: &Editor, running: bool) {
    // Sea color behind empty tiles.
    clear_background(Color::from_rgba(24, 59, 94, 255));

    for entry in world.layers.ordered() {
        if entry.id.starts_with(BACKGROUND_ID) {
            if let Ok(map) = world.maps.get(&entry.id) {
                draw_tile_map(map, &world.camera);
            }
        } else if let Ok(object) = world.objects.get(&entry.id) {
            draw_object(object, &world.camera, tick, debug);
        }
    }

    if debug {
        draw_debug(world);
    }
    draw_player_ui(world);
    if editor.enabled {
        draw_editor_ui(editor);
    }
    if !running {
        draw_rectangle(0.0, 0.0, VIEW_WIDTH, VIEW_HEIGHT, Color::new(0.0, 0.0, 0.0, 0.6));
        draw_text("YOU DIED", VIEW_WIDTH * 0.5 - 90.0, VIEW_HEIGHT * 0.5, 48.0, RED);
        draw_text(
            "restart to play again",
            VIEW_WIDTH * 0.5 - 90.0,
            VIEW_HEIGHT * 0.5 + 32.0,
            22.0,
            WHITE,
        );
    }
}

fn draw_tile_map(map: &TileMap, camera: &Camera) {
    let (start_col, end_col, start_row, end_row) = map.visible_range(camera);
    for col in start_col..end_col {
        for row in start_row..end_row {
            let Some(tile) = map.tile_at(col, row, camera) else {
                continue;
            };
            if tile.kind == TILE_EMPTY {
                continue;
            }
            draw_rectangle(
                tile.screen.x,
                tile.screen.y,
                tile.screen.w,
                tile.screen.h,
                tile_color(tile.kind),
            );
        }
    }
}

fn tile_color(kind: i32) -> Color {
    match kind {
        TILE_OUT_OF_BOUNDS => Color::from_rgba(84, 78, 70, 255),
        1 => Color::from_rgba(226, 209, 156, 255),
        2 => Color::from_rgba(176, 196, 112, 255),
        3 => Color::from_rgba(128, 172, 96, 255),
        _ => Color::from_rgba(104, 156, 88, 255),
    }
}

fn draw_object(object: &GameObject, camera: &Camera, tick: u64, debug: bool) {
    let view = camera.to_view(&object.rect);
    match object.kind {
        ObjectKind::Player => {
            draw_circle(
                view.x + view.w * 0.5,
                view.y + view.h - 2.0,
                view.w * 0.5 - 3.0,
                Color::new(0.0, 0.0, 0.0, 0.2),
            );
            draw_rectangle(view.x, view.y, view.w, view.h, SKYBLUE);
            if let Some(rect) = attack_rect(object) {
                let swing = camera.to_view(&rect);
                draw_rectangle(
                    swing.x,
                    swing.y,
                    swing.w,
                    swing.h,
                    Color::new(1.0, 1.0, 1.0, 0.35),
                );
            }
        }
        ObjectKind::BlobMonster => {
            // Idle bob keyed off the wall-clock tick, not the frame count.
            let bob = ((tick % 4) as f32 - 1.5).abs() * 2.0;
            draw_rectangle(view.x, view.y + bob, view.w, view.h - bob, GREEN);
            if object.detected {
                draw_rectangle(
                    view.x,
                    view.y + view.h,
                    object.stats.health,
                    5.0,
                    Color::from_rgba(216, 10, 10, 255),
                );
            }
        }
        ObjectKind::PalmTree => {
            draw_rectangle(view.x, view.y, view.w, view.h, BROWN);
            draw_circle(view.x + view.w * 0.5, view.y - 24.0, 22.0, DARKGREEN);
        }
        ObjectKind::Invisible => {
            if debug {
                draw_rectangle_lines(view.x, view.y, view.w, view.h, 1.0, ORANGE);
            }
        }
    }
}

fn draw_debug(world: &World) {
    for map in world.maps.array() {
        let (start_col, end_col, start_row, end_row) = map.visible_range(&world.camera);
        for col in start_col..end_col {
            for row in start_row..end_row {
                let Some(tile) = map.tile_at(col, row, &world.camera) else {
                    continue;
                };
                if tile.solid {
                    draw_rectangle(
                        tile.screen.x,
                        tile.screen.y,
                        tile.screen.w,
                        tile.screen.h,
                        Color::new(1.0, 0.0, 0.0, 0.2),
                    );
                }
                if tile.index >= 0 {
                    draw_text(
                        &format!("{}", tile.index),
                        tile.screen.x + 2.0,
                        tile.screen.y + 12.0,
                        12.0,
                        Color::new(0.5, 0.0, 0.5, 0.8),
                    );
                }
            }
        }
    }

    for object in world.objects.iter() {
        let view = world.camera.to_view(&object.rect);
        let color = match object.kind.behavior() {
            entity::Behavior::Player => RED,
            entity::Behavior::Monster => DARKGREEN,
            entity::Behavior::Scenery => ORANGE,
        };
        draw_rectangle_lines(view.x, view.y, view.w, view.h, 1.0, color);

        let center = world.camera.point_to_view(object.center());
        draw_line(
            center.x,
            center.y,
            center.x + object.vector.x * 50.0,
            center.y + object.vector.y * 50.0,
            1.0,
            color,
        );

        if object.kind.behavior() == entity::Behavior::Monster {
            draw_circle_lines(center.x, center.y, entity::DETECTION_RADIUS, 1.0, color);
        }
        if let Some(rect) = attack_rect(object) {
            let swing = world.camera.to_view(&rect);
            draw_rectangle_lines(swing.x, swing.y, swing.w, swing.h, 1.0, BLACK);
        }
    }
}

fn draw_player_ui(world: &World) {
    let Ok(player) = world.objects.player() else {
        return;
    };
    draw_text(
        &format!("HP {:.1}", player.stats.health.max(0.0)),
        20.0,
        VIEW_HEIGHT - 20.0,
        30.0,
        WHITE,
    );
    let hearts = player.stats.health.max(0.0);
    let mut x = 100.0;
    let mut remaining = hearts;
    while remaining > 0.0 {
        let fill = remaining.min(1.0);
        draw_rectangle(
            x,
            VIEW_HEIGHT - 38.0,
            18.0 * fill,
            18.0,
            Color::from_rgba(216, 10, 10, 255),
        );
        draw_rectangle_lines(x, VIEW_HEIGHT - 38.0, 18.0, 18.0, 1.0, WHITE);
        x += 24.0;
        remaining -= 1.0;
    }

    if player.taking_damage {
        draw_rectangle(
            0.0,
            0.0,
            VIEW_WIDTH,
            VIEW_HEIGHT,
            Color::new(0.85, 0.04, 0.04, 0.2),
        );
    }
}

fn draw_editor_ui(editor: &Editor) {
    let tile = editor.selected_tile();
    let lines = [
        "EDITOR  [Tab] close  [F5] export".to_string(),
        format!(
            "[T] tile brush: index {} type {}   [L] layer: {}",
            tile.index,
            tile.kind,
            editor.active_layer_id()
        ),
        format!("[O] object: {:?}", editor.selected_kind()),
        "LMB paint   MMB place object   RMB delete object".to_string(),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 20.0, 70.0 + i as f32 * 20.0, 20.0, YELLOW);
    }
}
