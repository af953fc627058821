pub mod aabb;
pub mod intersect;
pub mod interval;
pub mod ray;
pub mod rng;
pub mod validate;
