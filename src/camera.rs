use macroquad::prelude::*;

pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub speed: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32, world_width: f32, world_height: f32, speed: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            max_x: (world_width - width).max(0.0),
            max_y: (world_height - height).max(0.0),
            speed,
        }
    }

    pub fn update(&mut self, dir_x: f32, dir_y: f32) {
        self.x = (self.x + dir_x * self.speed).clamp(0.0, self.max_x);
        self.y = (self.y + dir_y * self.speed).clamp(0.0, self.max_y);
    }

    // Pinned = cannot scroll any further toward that world edge.
    pub fn pinned_left(&self) -> bool {
        self.x <= 0.0
    }

    pub fn pinned_right(&self) -> bool {
        self.x >= self.max_x
    }

    pub fn pinned_top(&self) -> bool {
        self.y <= 0.0
    }

    pub fn pinned_bottom(&self) -> bool {
        self.y >= self.max_y
    }

    pub fn to_view(&self, rect: &Rect) -> Rect {
        Rect::new(rect.x - self.x, rect.y - self.y, rect.w, rect.h)
    }

    pub fn point_to_view(&self, point: Vec2) -> Vec2 {
        point - vec2(self.x, self.y)
    }

    pub fn view_to_world(&self, point: Vec2) -> Vec2 {
        point + vec2(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        // 512 viewport over a 1536x1152 world
        Camera::new(512.0, 512.0, 1536.0, 1152.0, 3.0)
    }

    #[test]
    fn update_moves_by_speed() {
        let mut cam = camera();
        cam.update(1.0, 0.0);
        assert_eq!(cam.x, 3.0);
        assert_eq!(cam.y, 0.0);
        cam.update(0.0, 1.0);
        assert_eq!(cam.y, 3.0);
    }

    #[test]
    fn update_clamps_to_world() {
        let mut cam = camera();
        cam.update(-1.0, -1.0);
        assert_eq!((cam.x, cam.y), (0.0, 0.0));

        cam.x = cam.max_x - 1.0;
        cam.update(1.0, 0.0);
        assert_eq!(cam.x, cam.max_x);
        assert_eq!(cam.max_x, 1024.0);
    }

    #[test]
    fn viewport_larger_than_world_stays_pinned() {
        let mut cam = Camera::new(512.0, 512.0, 256.0, 256.0, 3.0);
        assert_eq!((cam.max_x, cam.max_y), (0.0, 0.0));
        cam.update(1.0, 1.0);
        assert_eq!((cam.x, cam.y), (0.0, 0.0));
        assert!(cam.pinned_left() && cam.pinned_right());
    }

    #[test]
    fn pin_queries() {
        let mut cam = camera();
        assert!(cam.pinned_left());
        assert!(!cam.pinned_right());
        cam.x = cam.max_x;
        assert!(cam.pinned_right());
        assert!(!cam.pinned_left());
    }

    #[test]
    fn view_transform_round_trip() {
        let mut cam = camera();
        cam.x = 100.0;
        cam.y = 40.0;
        let rect = Rect::new(130.0, 90.0, 34.0, 46.0);
        let view = cam.to_view(&rect);
        assert_eq!((view.x, view.y), (30.0, 50.0));
        assert_eq!((view.w, view.h), (34.0, 46.0));
        let world = cam.view_to_world(vec2(view.x, view.y));
        assert_eq!(world, vec2(rect.x, rect.y));
    }
}
