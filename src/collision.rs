//! Pairwise collision detection and elastic response.
//!
//! Every ordered pair `(i, j)` with `i != j` is visited, outer index first, and
//! resolved in place. A pair visited later in the same pass sees velocities
//! already changed by earlier pairs sharing a particle, so the outcome with
//! several simultaneous contacts depends on list order. There is no spatial
//! index: the pass is O(n²).

use log::debug;

use crate::particle::Particle;

/// Resolves a collision between `a` and `b` if they overlap and are not
/// already separating. Returns whether a resolution happened.
///
/// Velocities are rotated into the frame whose x axis runs from `a` to `b`,
/// the 1D elastic exchange is applied along that axis, and the result is
/// rotated back. Both outgoing velocities are scaled by `a`'s restitution
/// only.
pub fn resolve_pair(a: &mut Particle, b: &mut Particle) -> bool {
    if !a.overlapping(b) {
        return false;
    }

    let dv = a.velocity() - b.velocity();
    let dp = b.position() - a.position();
    if dv.dot(dp) < 0.0 {
        return false;
    }

    // atan2(0, 0) == 0, so coincident particles still get a defined frame.
    let angle = -dp.y.atan2(dp.x);
    let m1 = a.mass();
    let m2 = b.mass();
    let total = m1 + m2;

    let u1 = a.velocity().rotate(angle);
    let u2 = b.velocity().rotate(angle);

    let mut v1 = u1;
    let mut v2 = u2;
    v1.x = u1.x * (m1 - m2) / total + u2.x * 2.0 * m2 / total;
    v2.x = u2.x * (m2 - m1) / total + u1.x * 2.0 * m1 / total;

    let restitution = a.restitution();
    a.state_mut().velocity = v1.rotate(-angle) * restitution;
    b.state_mut().velocity = v2.rotate(-angle) * restitution;
    a.refresh_kinetics();
    b.refresh_kinetics();

    debug!("Collision between '{}' and '{}'", a.name(), b.name());
    true
}

/// Runs [`resolve_pair`] over every ordered pair and returns how many
/// resolutions took place.
pub fn resolve_all(particles: &mut [Particle]) -> usize {
    let n = particles.len();
    let mut resolved = 0;
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let (a, b) = pair_mut(particles, i, j);
            if resolve_pair(a, b) {
                resolved += 1;
            }
        }
    }
    resolved
}

// Two distinct mutable elements, returned in (i, j) order.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
