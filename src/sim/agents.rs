//! Agent behavior state machines
//!
//! Per-archetype update logic for the antagonist chasers, the helper robot,
//! the customer, the product manager, the lawyer and the compliance traps.
//! Each update runs once per tick, in the fixed order the world step calls
//! them - the robot reads chaser states computed earlier in the same tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::geom::resolve_against_walls;
use super::level::PATROL_WAYPOINTS;
use super::state::{
    Chaser, ChaserBehavior, ChaserState, GameOverReason, GameState, SessionPhase, Workstation,
    push_callout, spawn_particles,
};
use super::steering::{choose_step, move_towards};
use crate::consts::*;

/// Speed for this tick: the product-manager slow overrides everything,
/// otherwise chasing runs hot and patrol runs at base.
fn chaser_speed(chaser: &Chaser, chasing: bool) -> f32 {
    if chaser.slow_timer > 0 {
        chaser.base_speed * SLOW_SPEED_MULT
    } else if chasing {
        chaser.base_speed * CHASE_SPEED_MULT
    } else {
        chaser.base_speed
    }
}

fn nearest_incomplete_workstation(workstations: &[Workstation], to: Vec2) -> Option<Vec2> {
    workstations
        .iter()
        .filter(|ws| !ws.completed)
        .map(|ws| ws.pos)
        .min_by(|a, b| a.distance(to).total_cmp(&b.distance(to)))
}

fn random_roam_point(rng: &mut Pcg32) -> Vec2 {
    Vec2::new(
        100.0 + rng.random_range(0.0..800.0),
        100.0 + rng.random_range(0.0..500.0),
    )
}

fn clamp_to_playfield(chaser: &mut Chaser) {
    let size = chaser.scaled_size();
    chaser.pos.x = chaser.pos.x.clamp(20.0, PLAYFIELD_W - size.x - 20.0);
    chaser.pos.y = chaser.pos.y.clamp(80.0, PLAYFIELD_H - size.y - 20.0);
}

/// Advance every chaser one tick.
pub(crate) fn update_chasers(state: &mut GameState) {
    let GameState {
        chasers,
        walls,
        workstations,
        player,
        robot,
        callouts,
        rng,
        ..
    } = state;

    for i in 0..chasers.len() {
        let (before, rest) = chasers.split_at_mut(i);
        let Some((chaser, after)) = rest.split_first_mut() else {
            break;
        };

        if chaser.grow_timer > 0 {
            chaser.grow_timer -= 1;
        }

        // Barely moving for too long means wedged between walls; teleport
        // somewhere random instead of grinding against the corner forever
        if (chaser.pos.x - chaser.last_pos.x).abs() < STUCK_EPSILON
            && (chaser.pos.y - chaser.last_pos.y).abs() < STUCK_EPSILON
        {
            chaser.stuck_count += 1;
            if chaser.stuck_count > STUCK_LIMIT_TICKS {
                chaser.pos = random_roam_point(rng);
                chaser.stuck_count = 0;
            }
        } else {
            chaser.stuck_count = 0;
        }
        chaser.last_pos = chaser.pos;

        if chaser.slow_timer > 0 {
            chaser.slow_timer -= 1;
        }

        // Robot distraction: shuffle away from the robot and skip vision
        // entirely this tick
        if chaser.distract_timer > 0 {
            chaser.distract_timer -= 1;
            chaser.state = ChaserState::Distracted;
            chaser.speed = chaser_speed(chaser, false);
            let away = (chaser.pos - robot.pos).normalize_or_zero();
            let target = chaser.pos + away * 50.0;
            let step = chaser.speed * chaser.size_multiplier;
            chaser.pos = choose_step(chaser.pos, chaser.scaled_size(), step, target, walls, rng);
            if chaser.distract_timer == 0 {
                chaser.state = ChaserState::Patrol;
            }
            clamp_to_playfield(chaser);
            continue;
        }

        let distance = player.pos.distance(chaser.pos);
        let sees_player = distance < chaser.sight_range
            && !player.in_break_room
            && !player.being_dragged()
            && super::geom::line_of_sight(chaser.pos, player.pos, walls);

        if sees_player {
            let was_chasing = chaser.state == ChaserState::Chase;
            if !was_chasing {
                push_callout(
                    callouts,
                    chaser.pos + Vec2::new(0.0, -30.0),
                    "!",
                    "#ff0000",
                    24.0,
                );
            }
            if matches!(
                chaser.behavior,
                ChaserBehavior::Predictive | ChaserBehavior::Interceptor | ChaserBehavior::Mastermind
            ) {
                // Extrapolate from the previous sighting; on the first
                // sighting there is no velocity estimate yet
                chaser.predicted = if was_chasing {
                    player.pos + (player.pos - chaser.last_seen) * PREDICT_LOOKAHEAD
                } else {
                    player.pos
                };
            }
            chaser.state = ChaserState::Chase;
            chaser.chase_timer = CHASE_TICKS;
            chaser.last_seen = player.pos;

            // A mastermind rats the player out to the whole floor, once
            if chaser.behavior == ChaserBehavior::Mastermind {
                for other in before.iter_mut().chain(after.iter_mut()) {
                    if other.state != ChaserState::Chase {
                        other.state = ChaserState::Chase;
                        other.chase_timer = ALERT_CHASE_TICKS;
                        other.last_seen = player.pos;
                        push_callout(
                            callouts,
                            other.pos + Vec2::new(0.0, -30.0),
                            "!",
                            "#ff0000",
                            20.0,
                        );
                    }
                }
            }
        }

        if chaser.state == ChaserState::Chase {
            chaser.speed = chaser_speed(chaser, true);
            let target = if sees_player {
                match chaser.behavior {
                    // Ambush the objective: midpoint between the player and
                    // their nearest remaining workstation
                    ChaserBehavior::Interceptor | ChaserBehavior::Mastermind => {
                        nearest_incomplete_workstation(workstations, player.pos)
                            .map_or(player.pos, |ws| (player.pos + ws) * 0.5)
                    }
                    ChaserBehavior::Predictive => chaser.predicted,
                    _ => player.pos,
                }
            } else {
                chaser.last_seen
            };
            let step = chaser.speed * chaser.size_multiplier;
            chaser.pos = choose_step(chaser.pos, chaser.scaled_size(), step, target, walls, rng);

            chaser.chase_timer = chaser.chase_timer.saturating_sub(1);
            if chaser.chase_timer == 0 {
                chaser.state = ChaserState::Patrol;
                chaser.speed = chaser.base_speed;
            }
        } else {
            chaser.speed = chaser_speed(chaser, false);
            let step = chaser.speed * chaser.size_multiplier;
            match chaser.behavior {
                ChaserBehavior::SmartPatrol
                | ChaserBehavior::Interceptor
                | ChaserBehavior::Mastermind => {
                    // Route over every incomplete workstation plus the fixed
                    // waypoints, wrapping around
                    let mut route: Vec<Vec2> = workstations
                        .iter()
                        .filter(|ws| !ws.completed)
                        .map(|ws| ws.pos)
                        .collect();
                    route.extend(PATROL_WAYPOINTS);
                    let target = route[chaser.patrol_index % route.len()];
                    chaser.pos =
                        choose_step(chaser.pos, chaser.scaled_size(), step, target, walls, rng);
                    if (chaser.pos.x - target.x).abs() < PATROL_ARRIVE_DIST
                        && (chaser.pos.y - target.y).abs() < PATROL_ARRIVE_DIST
                    {
                        chaser.patrol_index = chaser.patrol_index.wrapping_add(1);
                    }
                }
                _ => {
                    if (chaser.pos.x - chaser.wander_target.x).abs() < WANDER_ARRIVE_DIST
                        && (chaser.pos.y - chaser.wander_target.y).abs() < WANDER_ARRIVE_DIST
                    {
                        chaser.wander_target = random_roam_point(rng);
                    }
                    chaser.pos = choose_step(
                        chaser.pos,
                        chaser.scaled_size(),
                        step,
                        chaser.wander_target,
                        walls,
                        rng,
                    );
                }
            }
        }

        clamp_to_playfield(chaser);
    }
}

/// Advance the helper robot: wander, and zap the nearest hunting chaser with
/// a distraction when the player is close. Purely beneficial.
pub(crate) fn update_robot(state: &mut GameState) {
    let GameState {
        robot,
        chasers,
        player,
        walls,
        particles,
        callouts,
        rng,
        ..
    } = state;

    if (robot.pos.x - robot.wander_target.x).abs() < ROBOT_ARRIVE_DIST
        && (robot.pos.y - robot.wander_target.y).abs() < ROBOT_ARRIVE_DIST
    {
        robot.wander_target = random_roam_point(rng);
    }
    move_towards(&mut robot.pos, robot.wander_target, ROBOT_SPEED);
    resolve_against_walls(&mut robot.pos, Vec2::splat(robot.size), walls);

    if player.pos.distance(robot.pos) < ROBOT_ASSIST_RANGE && robot.cooldown == 0 {
        // Nearest chaser that is actively hunting, in range and not already
        // slowed by the product manager
        let mut best: Option<(usize, f32)> = None;
        for (i, chaser) in chasers.iter().enumerate() {
            if chaser.state != ChaserState::Chase || chaser.slow_timer > 0 {
                continue;
            }
            let distance = chaser.pos.distance(robot.pos);
            if distance < ROBOT_TARGET_RANGE && best.is_none_or(|(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }

        if let Some((i, _)) = best {
            robot.distracting = true;
            robot.distract_timer = DISTRACT_TICKS;
            robot.cooldown = ROBOT_COOLDOWN_TICKS;

            let chaser = &mut chasers[i];
            chaser.distract_timer = DISTRACT_TICKS;
            chaser.state = ChaserState::Distracted;

            spawn_particles(particles, rng, robot.pos, "#ffff00", 10);
            push_callout(
                callouts,
                robot.pos + Vec2::new(0.0, -20.0),
                "BEEP!",
                "#3498db",
                16.0,
            );
        }
    }

    robot.cooldown = robot.cooldown.saturating_sub(1);
    if robot.distract_timer > 0 {
        robot.distract_timer -= 1;
        if robot.distract_timer == 0 {
            robot.distracting = false;
        }
    }
}

/// Pay out once all of the customer's required workstations are done; tick
/// the death fade otherwise.
pub(crate) fn update_customer(state: &mut GameState) {
    let GameState {
        customer,
        customer_requirements,
        workstations,
        score,
        particles,
        callouts,
        rng,
        ..
    } = state;
    let Some(customer) = customer.as_mut() else {
        return;
    };

    if customer.alive {
        // A requirement index past the roster counts as satisfied rather
        // than wedging the level
        let requirements_met = customer_requirements
            .iter()
            .all(|&i| workstations.get(i).is_none_or(|ws| ws.completed));
        if requirements_met && customer.has_requirement {
            customer.has_requirement = false;
            *score += CUSTOMER_REWARD;
            spawn_particles(particles, rng, customer.pos, "#ffd700", 20);
            push_callout(
                callouts,
                customer.pos + Vec2::new(0.0, -20.0),
                format!("+{CUSTOMER_REWARD:.0}!"),
                "#ffd700",
                20.0,
            );
        }
    } else if customer.death_timer > 0 {
        customer.death_timer -= 1;
    }
}

/// Advance the product manager: dormant on cooldown, then swoop in from
/// off-screen, lock the nearest chaser and pull it into a meeting.
pub(crate) fn update_product_manager(state: &mut GameState) {
    let GameState {
        product_manager: pm,
        chasers,
        particles,
        callouts,
        rng,
        ..
    } = state;

    pm.cooldown = pm.cooldown.saturating_sub(1);

    if !pm.active && pm.cooldown == 0 {
        pm.active = true;
        pm.slow_applied = false;
        pm.active_timer = PM_ACTIVE_TICKS;
        let from_left = rng.random_bool(0.5);
        pm.pos = Vec2::new(
            if from_left { -50.0 } else { PLAYFIELD_W + 50.0 },
            100.0 + rng.random_range(0.0..500.0),
        );
        let entry = pm.pos;
        pm.target = chasers
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.pos.distance(entry).total_cmp(&b.pos.distance(entry)))
            .map(|(i, _)| i);
        push_callout(
            callouts,
            pm.pos + Vec2::new(0.0, -20.0),
            "MEETING!",
            "#9b59b6",
            16.0,
        );
    }

    if pm.active {
        // A dangling target index is treated as having no target at all
        if let Some((i, target_pos)) = pm.target.and_then(|i| chasers.get(i).map(|c| (i, c.pos))) {
            move_towards(&mut pm.pos, target_pos, PM_SPEED);
            if !pm.slow_applied && pm.pos.distance(target_pos) < PM_APPROACH_DIST {
                let chaser = &mut chasers[i];
                chaser.slow_timer = PM_SLOW_TICKS;
                pm.slow_applied = true;
                spawn_particles(particles, rng, chaser.pos, "#ff00ff", 15);
                push_callout(
                    callouts,
                    chaser.pos + Vec2::new(0.0, -20.0),
                    "SLOW!",
                    "#ff00ff",
                    14.0,
                );
            }
        }

        pm.active_timer = pm.active_timer.saturating_sub(1);
        if pm.active_timer == 0 {
            pm.active = false;
            pm.cooldown = rng.random_range(600..1200);
            pm.pos.x = -50.0;
            pm.target = None;
        }
    }
}

/// Advance the lawyer: dormant until the score is worth suing over, then
/// hunt the player down and haul them to the desk. The drag itself is
/// resolved by the world step.
pub(crate) fn update_lawyer(state: &mut GameState) {
    let GameState {
        lawyer,
        player,
        walls,
        callouts,
        score,
        screen_shake,
        ..
    } = state;
    let Some(lawyer) = lawyer.as_mut() else {
        return;
    };
    if player.being_dragged() {
        return;
    }

    lawyer.cooldown = lawyer.cooldown.saturating_sub(1);

    if !lawyer.hunting && *score > LAWYER_TRIGGER_SCORE && lawyer.cooldown == 0 {
        lawyer.hunting = true;
        push_callout(
            callouts,
            lawyer.pos + Vec2::new(0.0, -20.0),
            "OBJECTION!",
            "#ff0000",
            20.0,
        );
    }

    if lawyer.hunting {
        move_towards(&mut lawyer.pos, player.pos, lawyer.speed);
        resolve_against_walls(&mut lawyer.pos, Vec2::splat(lawyer.size), walls);

        if player.pos.distance(lawyer.pos) < LAWYER_SEIZE_DIST {
            player.dragged_to = Some(lawyer.desk);
            lawyer.hunting = false;
            lawyer.cooldown = LAWYER_COOLDOWN_TICKS;
            push_callout(
                callouts,
                player.pos + Vec2::new(0.0, -20.0),
                "SUED!",
                "#ff0000",
                24.0,
            );
            *screen_shake = 20;
        }
    } else {
        // Amble back to the desk at half pace
        move_towards(&mut lawyer.pos, lawyer.desk, lawyer.speed * 0.5);
    }
}

/// Advance every compliance trap through its warmup/active/cooldown cycle
/// and apply contact effects while active.
pub(crate) fn update_traps(state: &mut GameState) {
    let GameState {
        traps,
        player,
        customer,
        chasers,
        particles,
        callouts,
        rng,
        screen_shake,
        phase,
        game_over_reason,
        ..
    } = state;

    for trap in traps.iter_mut() {
        if !trap.active {
            trap.warmup_timer = trap.warmup_timer.saturating_sub(1);
            if trap.warmup_timer == 0 {
                trap.active = true;
                trap.active_timer = rng.random_range(180..300);
                push_callout(
                    callouts,
                    trap.pos + Vec2::new(20.0, 0.0),
                    "WARNING!",
                    "#ff0000",
                    20.0,
                );
                *screen_shake = 10;
            }
            continue;
        }

        trap.active_timer = trap.active_timer.saturating_sub(1);
        if trap.active_timer == 0 {
            trap.active = false;
            trap.warmup_timer = rng.random_range(300..600);
            continue;
        }

        let zone = trap.rect();

        // Standing in an active trap ends the run unless invulnerable
        if *phase == SessionPhase::Running
            && player.invulnerable == 0
            && player.rect().overlaps(&zone)
        {
            *phase = SessionPhase::GameOver;
            *game_over_reason = Some(GameOverReason::ComplianceViolation);
            spawn_particles(particles, rng, player.pos + Vec2::splat(12.0), "#ff0000", 50);
            push_callout(
                callouts,
                player.pos + Vec2::new(0.0, -20.0),
                "VIOLATED!",
                "#ff0000",
                24.0,
            );
        }

        // The customer is not so lucky
        if let Some(customer) = customer.as_mut()
            && customer.alive
            && customer.rect().overlaps(&zone)
        {
            customer.alive = false;
            customer.death_timer = CUSTOMER_DEATH_FADE_TICKS;
            spawn_particles(particles, rng, customer.pos + Vec2::splat(14.0), "#ff0000", 30);
            push_callout(
                callouts,
                customer.pos + Vec2::new(0.0, -20.0),
                "NO!!!",
                "#ff0000",
                20.0,
            );
            *screen_shake = 15;
        }

        // Chasers feed on compliance: bigger, faster, sharper eyes. Several
        // can grow off the same trap in the same tick.
        for chaser in chasers.iter_mut() {
            if chaser.growing() || !chaser.rect().overlaps(&zone) {
                continue;
            }
            chaser.grow_timer = GROW_ANIM_TICKS;
            chaser.size_multiplier = (chaser.size_multiplier * GROW_SIZE_MULT).min(SIZE_MULT_CAP);
            chaser.sight_range *= GROW_SIGHT_MULT;
            // Buff the base so the gain survives the per-tick speed reset
            chaser.base_speed *= GROW_SPEED_MULT;
            chaser.speed *= GROW_SPEED_MULT;
            spawn_particles(particles, rng, chaser.pos + Vec2::splat(14.0), "#ff00ff", 20);
            push_callout(
                callouts,
                chaser.pos + Vec2::new(0.0, -20.0),
                "POWER UP!",
                "#ff00ff",
                16.0,
            );
        }
    }
}
