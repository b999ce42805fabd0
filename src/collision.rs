use macroquad::prelude::*;

pub struct Circle {
    pub origin: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(origin: Vec2, radius: f32) -> Self {
        Self { origin, radius }
    }

    pub fn circumference(&self) -> f32 {
        2.0 * std::f32::consts::PI * self.radius
    }

    pub fn diameter(&self) -> f32 {
        2.0 * self.radius
    }
}

// Both rectangles must be in the same coordinate space; view-space callers
// translate with Camera::to_view before testing.
pub fn aabb_collision(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

pub fn point_in_rectangle(point: Vec2, rect: &Rect) -> bool {
    let a = vec2(rect.x, rect.y);
    let b = vec2(rect.x + rect.w, rect.y);
    let c = vec2(rect.x + rect.w, rect.y + rect.h);

    let ab = b - a;
    let ap = point - a;
    let bc = c - b;
    let bp = point - b;

    0.0 <= ab.dot(ap)
        && ab.dot(ap) <= ab.dot(ab)
        && 0.0 <= bc.dot(bp)
        && bc.dot(bp) <= bc.dot(bc)
}

// Boundary-inclusive: touching at exactly `radius` counts as contact.
pub fn circle_in_rectangle(circle: &Circle, rect: &Rect) -> bool {
    let test = vec2(
        circle.origin.x.clamp(rect.x, rect.x + rect.w),
        circle.origin.y.clamp(rect.y, rect.y + rect.h),
    );
    circle.origin.distance(test) <= circle.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_overlap_and_separation() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(aabb_collision(&a, &b));
        assert!(!aabb_collision(&a, &c));
    }

    #[test]
    fn aabb_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!aabb_collision(&a, &b));
        assert!(!aabb_collision(&b, &a));
    }

    #[test]
    fn aabb_is_symmetric() {
        let a = Rect::new(3.0, 7.0, 12.0, 4.0);
        let b = Rect::new(10.0, 5.0, 8.0, 8.0);
        assert_eq!(aabb_collision(&a, &b), aabb_collision(&b, &a));
        let far = Rect::new(100.0, 100.0, 2.0, 2.0);
        assert_eq!(aabb_collision(&a, &far), aabb_collision(&far, &a));
    }

    #[test]
    fn zero_area_rect_never_collides_with_itself() {
        // Degenerate rects still register against a box they sit inside,
        // which is why finished swings carry no rect at all instead of a
        // zero-area one.
        let zero = Rect::new(5.0, 5.0, 0.0, 0.0);
        let around = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!aabb_collision(&zero, &zero));
        assert!(aabb_collision(&zero, &around));
    }

    #[test]
    fn point_containment() {
        let rect = Rect::new(10.0, 10.0, 20.0, 10.0);
        assert!(point_in_rectangle(vec2(15.0, 15.0), &rect));
        assert!(point_in_rectangle(vec2(10.0, 10.0), &rect));
        assert!(point_in_rectangle(vec2(30.0, 20.0), &rect));
        assert!(!point_in_rectangle(vec2(9.9, 15.0), &rect));
        assert!(!point_in_rectangle(vec2(15.0, 20.1), &rect));
    }

    #[test]
    fn circle_rect_boundary_is_inclusive() {
        // Rect's nearest edge exactly `radius` away from the center.
        let rect = Rect::new(100.0, 0.0, 50.0, 50.0);
        let touching = Circle::new(vec2(90.0, 25.0), 10.0);
        let beyond = Circle::new(vec2(89.9, 25.0), 10.0);
        assert!(circle_in_rectangle(&touching, &rect));
        assert!(!circle_in_rectangle(&beyond, &rect));
    }

    #[test]
    fn circle_center_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let circle = Circle::new(vec2(25.0, 25.0), 1.0);
        assert!(circle_in_rectangle(&circle, &rect));
    }

    #[test]
    fn circle_derived_measures() {
        let circle = Circle::new(vec2(0.0, 0.0), 2.0);
        assert_eq!(circle.diameter(), 4.0);
        assert!((circle.circumference() - 4.0 * std::f32::consts::PI).abs() < 1e-5);
    }
}
