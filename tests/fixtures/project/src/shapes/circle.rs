use crate::geometry::{Area, Point};

pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Area for Circle {
    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

pub enum Fill {
    Solid,
    Hollow,
}
