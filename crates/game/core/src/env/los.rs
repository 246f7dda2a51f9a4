//! Bresenham rays for line-of-sight checks.

use crate::state::Position;

/// Returns every tile on the Bresenham line from `from` to `to`, both ends
/// included.
pub fn bresenham_line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut points = Vec::with_capacity(dx.max(-dy) as usize + 1);
    let mut x = from.x;
    let mut y = from.y;
    let mut err = dx + dy;

    loop {
        points.push(Position::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    points
}

/// True if no intermediate tile between `from` and `to` is opaque.
///
/// The endpoints are never tested: a viewer standing in a doorway still sees
/// out, and a target standing in one is still seen.
pub fn has_line_of_sight(
    from: Position,
    to: Position,
    mut is_opaque: impl FnMut(Position) -> bool,
) -> bool {
    let line = bresenham_line(from, to);
    if line.len() <= 2 {
        return true;
    }
    line[1..line.len() - 1].iter().all(|&p| !is_opaque(p))
}
