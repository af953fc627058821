use crate::tracing_targets;

tracing_targets! {
    MAIN = "main",
    GEOMETRY = "geometry",
    BVH = "bvh",
    RAYCAST = "raycast",
    FLOOD = "flood",
}
