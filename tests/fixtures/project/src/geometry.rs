pub const ORIGIN_X: f64 = 0.0;

pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub trait Area {
    fn area(&self) -> f64;
}

pub type Meters = f64;

pub fn distance(a: &Point, b: &Point) -> Meters {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = Point { x: 1.0, y: 2.0 };
        assert_eq!(distance(&p, &p), 0.0);
    }
}
