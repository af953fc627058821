/// Numeric type used for most calculations in the engine
pub type Number = f64;
pub type Vector2 = glam::DVec2;
pub type Vector3 = glam::DVec3;
/// Points and vectors share a representation; the alias only documents intent
pub type Point3 = glam::DVec3;
pub type Point2 = glam::DVec2;
pub type Matrix4 = glam::DMat4;

/// Identifier of the collaborator mesh a triangle was loaded from
pub type MeshId = u64;
/// Index of a triangle inside its source mesh's index buffer (`indices[3 * id..3 * id + 3]`)
pub type LocalId = usize;
