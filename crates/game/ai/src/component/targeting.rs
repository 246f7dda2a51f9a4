//! Target selection, threat estimation and context assembly.

use game_core::{ActorView, EntityId, Position};

use super::{AiComponent, TickEnv};
use crate::archetype::TargetingMode;
use crate::config::TickOptions;
use crate::context::{TargetInfo, TargetSource, UtilityContext};
use crate::disposition::{Disposition, RelationLookup};
use crate::movement;
use crate::perception::PerceivedActor;
use crate::threat::{awareness_threat, proximity, relationship_threat};

impl AiComponent {
    /// Disposition used for this tick. Forced hostility pins it to the
    /// minimum without touching the stored value.
    pub(super) fn effective_disposition(&self, subject: EntityId, options: TickOptions) -> Disposition {
        if options.force_hostile {
            Disposition::MIN
        } else {
            self.dispositions.get(subject)
        }
    }

    /// Builds the immutable per-tick context.
    pub(super) fn build_context(
        &self,
        me: &ActorView,
        perceived: &[PerceivedActor],
        env: &TickEnv<'_>,
    ) -> UtilityContext {
        let mut ctx = UtilityContext::new(&self.tuning);
        ctx.health_percent = me.health.fraction();
        ctx.has_patrol_route = self.body.has_patrol_route();

        if let Some(target) = self.select_target(perceived, env) {
            let disposition = self.effective_disposition(target.id, env.options);
            ctx.threat_level = self.outgoing_threat(&target, disposition);
            ctx.disposition = disposition;
            ctx.best_attack_destination = movement::best_attack_destination(
                env.world,
                self.body.position,
                target.position,
                self.body.opens_doors,
                &self.tuning,
            );
            ctx.can_attack = target.distance <= 1 || ctx.best_attack_destination.is_some();
            ctx.target = Some(target);
        }

        let (incoming, source) = self.incoming_threat(perceived, env.relations);
        ctx.incoming_threat = incoming;
        ctx.incoming_source = source;

        ctx.flee_from = if incoming > ctx.threat_level {
            source
        } else {
            ctx.target_id().or(source)
        };

        if let Some(threat) = ctx.flee_from.and_then(|id| locate(id, &ctx, perceived)) {
            ctx.best_flee_step = movement::best_flee_step(
                env.world,
                self.body.position,
                threat,
                self.body.opens_doors,
                &self.tuning,
            );
            ctx.has_escape_route = ctx.best_flee_step.is_some();
        }

        tracing::debug!(
            target = ?ctx.target_id(),
            threat = ctx.threat_level,
            incoming = ctx.incoming_threat,
            health = ctx.health_percent,
            escape = ctx.has_escape_route,
            "context built"
        );
        ctx
    }

    /// Chooses who to focus on this tick.
    ///
    /// 1. The perceived actor with the highest relationship threat. Ties go to
    ///    the nearer one, then the more hostile one.
    /// 2. The remembered attacker, if still alive, wherever it is.
    /// 3. For proximity-targeting archetypes, the nearest perceived actor.
    pub(super) fn select_target(
        &self,
        perceived: &[PerceivedActor],
        env: &TickEnv<'_>,
    ) -> Option<TargetInfo> {
        let mut best: Option<(f32, &PerceivedActor, Disposition)> = None;
        for candidate in perceived {
            let disposition = self.effective_disposition(candidate.actor.id, env.options);
            let threat =
                relationship_threat(candidate.distance, self.profile.aggro_radius, disposition);
            if threat <= 0.0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_threat, incumbent, best_disposition)) => {
                    threat > best_threat
                        || (threat == best_threat
                            && (candidate.distance < incumbent.distance
                                || (candidate.distance == incumbent.distance
                                    && disposition < best_disposition)))
                }
            };
            if better {
                best = Some((threat, candidate, disposition));
            }
        }
        if let Some((_, chosen, _)) = best {
            return Some(target_info(chosen, TargetSource::Threat));
        }

        if let Some(attacker) = self.last_attacker {
            let alive = env.world.actor(attacker).filter(|actor| actor.is_alive());
            if let Some(actor) = alive {
                return Some(TargetInfo {
                    id: actor.id,
                    position: actor.position,
                    distance: self.body.position.chebyshev(actor.position),
                    source: TargetSource::Attacker,
                });
            }
        }

        match self.profile.targeting {
            TargetingMode::Proximity => perceived
                .first()
                .map(|nearest| target_info(nearest, TargetSource::Proximity)),
            TargetingMode::Threat => None,
        }
    }

    /// Relationship threat toward the target, or combat awareness of a
    /// remembered attacker when the relationship alone reads zero.
    fn outgoing_threat(&self, target: &TargetInfo, disposition: Disposition) -> f32 {
        let threat = relationship_threat(target.distance, self.profile.aggro_radius, disposition);
        if threat > 0.0 || self.last_attacker != Some(target.id) {
            return threat;
        }
        awareness_threat(
            target.distance,
            self.tuning.combat_awareness_radius,
            disposition,
        )
    }

    /// Strongest threat any perceived actor poses to this agent, judged by
    /// that actor's own disposition and awareness.
    pub(super) fn incoming_threat(
        &self,
        perceived: &[PerceivedActor],
        relations: &dyn RelationLookup,
    ) -> (f32, Option<EntityId>) {
        let mut strongest = 0.0;
        let mut source = None;
        for other in perceived {
            let Some(theirs) = relations.disposition(other.actor.id, self.body.id) else {
                continue;
            };
            if theirs.value() >= 0 {
                continue;
            }
            let threat =
                theirs.hostility_signal() * proximity(other.distance, other.actor.awareness_radius);
            if threat > strongest {
                strongest = threat;
                source = Some(other.actor.id);
            }
        }
        (strongest, source)
    }
}

fn target_info(perceived: &PerceivedActor, source: TargetSource) -> TargetInfo {
    TargetInfo {
        id: perceived.actor.id,
        position: perceived.actor.position,
        distance: perceived.distance,
        source,
    }
}

fn locate(id: EntityId, ctx: &UtilityContext, perceived: &[PerceivedActor]) -> Option<Position> {
    if let Some(target) = ctx.target.filter(|target| target.id == id) {
        return Some(target.position);
    }
    perceived
        .iter()
        .find(|entry| entry.actor.id == id)
        .map(|entry| entry.actor.position)
}
