use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box; folding any point into it yields that point.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |b, p| b.including(p))
    }

    pub fn including(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn union(self, other: Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of width, height and depth.
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_points() {
        let b = Aabb::from_points([
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(1.0, 7.0, -0.5),
            Vec3::new(0.0, 5.0, 0.0),
        ]);
        assert_eq!(b.min, Vec3::new(-1.0, 3.0, -0.5));
        assert_eq!(b.max, Vec3::new(1.0, 7.0, 0.5));
        assert_eq!(b.center(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(b.max_dimension(), 4.0);
    }

    #[test]
    fn empty_until_a_point_arrives() {
        assert!(Aabb::EMPTY.is_empty());
        assert!(Aabb::from_points(std::iter::empty()).is_empty());
        assert!(!Aabb::EMPTY.including(Vec3::ONE).is_empty());
    }

    #[test]
    fn union_covers_both() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(-2.0), Vec3::splat(-1.0));
        let u = a.union(b);
        assert_eq!(u.min, Vec3::splat(-2.0));
        assert_eq!(u.max, Vec3::ONE);
    }
}
