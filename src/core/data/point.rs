/// A pixel position on the presentation surface. Signed so that blocks
/// anchored near the frame edge can be described before clipping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}
