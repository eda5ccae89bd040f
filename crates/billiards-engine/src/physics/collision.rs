use std::collections::{HashMap, HashSet};

use crate::api::types::BallId;
use crate::entities::ball::{Ball, CollisionModel};
use crate::entities::table::Table;
use crate::math::vector::Vector2D;

/// Detects and resolves ball-ball, ball-wall and ball-pocket collisions.
///
/// Keeps a symmetric contact set so an impulse is applied once per contact
/// event rather than once per frame of continued overlap.
#[derive(Debug, Default)]
pub struct CollisionResolver {
    contacts: HashMap<BallId, HashSet<BallId>>,
    model: CollisionModel,
}

impl CollisionResolver {
    pub fn new(model: CollisionModel) -> Self {
        Self {
            contacts: HashMap::new(),
            model,
        }
    }

    pub fn model(&self) -> CollisionModel {
        self.model
    }

    pub fn in_contact(&self, a: BallId, b: BallId) -> bool {
        self.contacts.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Balls currently touching `id`.
    pub fn contacts_of(&self, id: BallId) -> impl Iterator<Item = BallId> + '_ {
        self.contacts.get(&id).into_iter().flatten().copied()
    }

    /// Number of touching pairs.
    pub fn contact_count(&self) -> usize {
        self.contacts.values().map(HashSet::len).sum::<usize>() / 2
    }

    fn add_contact(&mut self, a: BallId, b: BallId) {
        self.contacts.entry(a).or_default().insert(b);
        self.contacts.entry(b).or_default().insert(a);
    }

    fn remove_contact(&mut self, a: BallId, b: BallId) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(set) = self.contacts.get_mut(&from) {
                set.remove(&to);
                if set.is_empty() {
                    self.contacts.remove(&from);
                }
            }
        }
    }

    /// Drop every contact involving `id`, e.g. after it left the table.
    pub fn forget(&mut self, id: BallId) {
        if let Some(others) = self.contacts.remove(&id) {
            for other in others {
                self.remove_contact(other, id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Exchange momentum between every newly touching pair.
    /// Returns the pairs that collided this call.
    pub fn resolve_balls_collision(&mut self, balls: &mut [Ball]) -> Vec<(BallId, BallId)> {
        let mut collided = Vec::new();

        for j in 1..balls.len() {
            let (head, tail) = balls.split_at_mut(j);
            let b = &mut tail[0];
            for a in head.iter_mut() {
                if !a.is_collided(b) {
                    self.remove_contact(a.id, b.id);
                    continue;
                }
                if self.in_contact(a.id, b.id) {
                    continue;
                }

                match a.collide(b, self.model) {
                    Ok(()) => {
                        log::debug!("balls {} and {} collided", a.id, b.id);
                        collided.push((a.id, b.id));
                    }
                    Err(e) => log::warn!("skipping collision response: {}", e),
                }
                self.add_contact(a.id, b.id);
            }
        }

        collided
    }

    /// Clamp balls back inside the walls and reflect their velocity.
    /// Returns the balls that bounced. A ball lying against a wall is still
    /// clamped, but it only counts as a hit when the reflection changed its
    /// velocity.
    pub fn resolve_ball_board_collision(&self, table: &Table, balls: &mut [Ball]) -> Vec<BallId> {
        let mut hit = Vec::new();
        for ball in balls.iter_mut() {
            let reflection = table.process_wall_collision(ball);
            if reflection == Vector2D::ONE {
                continue;
            }
            let reflected = ball.velocity.mul_components(reflection);
            if reflected != ball.velocity {
                hit.push(ball.id);
            }
            ball.velocity = reflected;
        }
        hit
    }

    /// Remove captured balls from the live set.
    /// Returns each removed ball with the index of the pocket it fell into.
    pub fn resolve_ball_hole_collision(
        &mut self,
        table: &Table,
        balls: &mut Vec<Ball>,
    ) -> Vec<(BallId, usize)> {
        let mut pocketed = Vec::new();
        balls.retain(|ball| match table.process_pocket_collision(ball) {
            Some(pocket) => {
                pocketed.push((ball.id, pocket));
                false
            }
            None => true,
        });
        for &(id, pocket) in &pocketed {
            log::debug!("ball {} fell into pocket {}", id, pocket);
            self.forget(id);
        }
        pocketed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BallColor;
    use crate::config::SimConfig;

    const R: f32 = 0.034;

    fn ball(id: u32, x: f32, y: f32) -> Ball {
        Ball::new(BallId(id), Vector2D::new(x, y), R, 0.17, BallColor::WHITE)
    }

    fn table() -> Table {
        Table::from_config(&SimConfig::default()).unwrap()
    }

    #[test]
    fn overlap_across_frames_fires_once() {
        let mut resolver = CollisionResolver::default();
        let mut balls = vec![
            ball(1, 1.0, 0.7).with_velocity(Vector2D::new(0.01, 0.0)),
            ball(2, 1.0 + 2.0 * R - 0.005, 0.7),
        ];

        assert_eq!(resolver.resolve_balls_collision(&mut balls), vec![(BallId(1), BallId(2))]);
        let after_first = (balls[0].velocity, balls[1].velocity);

        for _ in 0..5 {
            assert!(resolver.resolve_balls_collision(&mut balls).is_empty());
        }
        assert_eq!((balls[0].velocity, balls[1].velocity), after_first);
        assert!(resolver.in_contact(BallId(1), BallId(2)));
    }

    #[test]
    fn separation_then_recollision_fires_again() {
        let mut resolver = CollisionResolver::default();
        let mut balls = vec![ball(1, 1.0, 0.7), ball(2, 1.0 + 2.0 * R - 0.005, 0.7)];
        assert_eq!(resolver.resolve_balls_collision(&mut balls).len(), 1);

        balls[1].position.x += 0.1;
        assert!(resolver.resolve_balls_collision(&mut balls).is_empty());
        assert!(!resolver.in_contact(BallId(1), BallId(2)));
        assert_eq!(resolver.contact_count(), 0);

        balls[1].position.x -= 0.1;
        assert_eq!(resolver.resolve_balls_collision(&mut balls).len(), 1);
    }

    #[test]
    fn contact_set_is_symmetric() {
        let mut resolver = CollisionResolver::default();
        let mut balls = vec![
            ball(1, 1.0, 0.7),
            ball(2, 1.0 + 2.0 * R - 0.005, 0.7),
            ball(3, 1.0, 0.7 + 2.0 * R - 0.005),
        ];
        resolver.resolve_balls_collision(&mut balls);
        for a in [BallId(1), BallId(2), BallId(3)] {
            for b in resolver.contacts_of(a) {
                assert!(resolver.in_contact(b, a));
            }
        }
        assert_eq!(resolver.contact_count(), 2);
    }

    #[test]
    fn coincident_balls_are_recorded_without_impulse() {
        let mut resolver = CollisionResolver::default();
        let mut balls = vec![
            ball(1, 1.0, 0.7).with_velocity(Vector2D::new(0.02, 0.0)),
            ball(2, 1.0, 0.7),
        ];
        assert!(resolver.resolve_balls_collision(&mut balls).is_empty());
        assert!(resolver.in_contact(BallId(1), BallId(2)));
        assert_eq!(balls[0].velocity, Vector2D::new(0.02, 0.0));
    }

    #[test]
    fn wall_hit_reflects_velocity() {
        let resolver = CollisionResolver::default();
        let t = table();
        let mut balls = vec![
            ball(1, t.right_wall() - R + 0.01, 0.7).with_velocity(Vector2D::new(0.02, 0.01)),
            ball(2, 1.0, 0.7).with_velocity(Vector2D::new(0.02, 0.01)),
        ];
        let hit = resolver.resolve_ball_board_collision(&t, &mut balls);
        assert_eq!(hit, vec![BallId(1)]);
        assert_eq!(balls[0].velocity, Vector2D::new(-0.02, 0.01));
        assert_eq!(balls[1].velocity, Vector2D::new(0.02, 0.01));
    }

    #[test]
    fn resting_ball_on_wall_is_clamped_without_a_hit() {
        let resolver = CollisionResolver::default();
        let t = table();
        let mut balls = vec![ball(1, t.right_wall() - R + 0.001, 0.7)];

        for _ in 0..10 {
            assert!(resolver.resolve_ball_board_collision(&t, &mut balls).is_empty());
            assert!((balls[0].position.x + R - t.right_wall()).abs() < 1e-6);
            assert_eq!(balls[0].velocity, Vector2D::ZERO);
        }
    }

    #[test]
    fn sliding_along_wall_is_not_a_hit() {
        let resolver = CollisionResolver::default();
        let t = table();
        // Touching the top wall while moving parallel to it.
        let mut balls = vec![ball(1, 1.0, t.top_wall() + R).with_velocity(Vector2D::new(0.02, 0.0))];
        assert!(resolver.resolve_ball_board_collision(&t, &mut balls).is_empty());
        assert_eq!(balls[0].velocity, Vector2D::new(0.02, 0.0));
    }

    #[test]
    fn pocketed_ball_leaves_set_and_contacts() {
        let mut resolver = CollisionResolver::default();
        let t = table();
        let mut balls = vec![ball(1, 0.02, 0.02), ball(2, 0.02 + 2.0 * R - 0.005, 0.02), ball(3, 1.0, 0.7)];
        resolver.resolve_balls_collision(&mut balls);
        assert!(resolver.in_contact(BallId(1), BallId(2)));

        let pocketed = resolver.resolve_ball_hole_collision(&t, &mut balls);
        assert_eq!(pocketed, vec![(BallId(1), 0)]);
        assert_eq!(balls.len(), 2);
        assert!(balls.iter().all(|b| b.id != BallId(1)));
        assert!(!resolver.in_contact(BallId(2), BallId(1)));
        assert_eq!(resolver.contact_count(), 0);
    }
}
