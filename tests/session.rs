//! End-to-end session scenarios driven through the public API

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use squad_invaders::consts::*;
use squad_invaders::sim::{
    Aabb, Arena, BonusShip, Collidable, Direction, Emitter, EmitterConfig, EventBus, Faction,
    Formation, FormationUnit, GameEvent, GameOverCause, Heading, OpponentKind, Opponents, Session,
    SessionStatus, ShipPhase, TickInput, tick,
};
use squad_invaders::{MemoryHighScores, Settings, SimError};

fn session(seed: u64) -> Session<MemoryHighScores> {
    Session::new(&Settings::default(), seed, MemoryHighScores::new()).unwrap()
}

fn idle() -> TickInput {
    TickInput::default()
}

fn frozen_view(session: &Session<MemoryHighScores>) -> String {
    serde_json::to_string(&session.snapshot()).unwrap()
}

#[test]
fn test_formation_turns_at_right_edge() {
    let mut formation = Formation::new(Arena::default());
    let mut bus = EventBus::new();
    formation.set_heading(Heading::Right);
    let shift = SCREEN_WIDTH - 1.0 - formation.units()[9].bounds().right();
    for unit in formation.units_mut() {
        unit.pos.x += shift;
    }
    let before: Vec<Vec2> = formation.units().iter().map(|u| u.pos).collect();

    let step = formation.update(&mut bus).unwrap();

    assert_eq!(step.moved, Direction::Down);
    assert_eq!(formation.heading(), Heading::Left);
    for (unit, old) in formation.units().iter().zip(&before) {
        assert_eq!(unit.pos.x, old.x);
        assert_eq!(unit.pos.y, old.y + formation.speed());
    }
    assert!(bus.is_empty());
}

#[test]
fn test_bonus_ship_shields_unit_behind_it() {
    let arena = Arena::default();
    let mut rng = Pcg32::seed_from_u64(4);
    let mut laser = Emitter::new(EmitterConfig::laser());
    laser.add_opponent(OpponentKind::Formation).unwrap();
    laser.add_opponent(OpponentKind::BonusShip).unwrap();

    // Laser spawns at x 118.5..121.5, y 88..100
    assert!(laser.launch(Aabb::new(100.0, 100.0, 40.0, 20.0), 0));
    let units = vec![FormationUnit::new(Vec2::new(105.0, 85.0), 0, 60)];
    let mut ship = BonusShip::new(arena, &mut rng, 0);
    ship.pos = Vec2::new(100.0, 85.0);

    let mut bus = EventBus::new();
    let opponents = Opponents {
        units: &units,
        bonus_ship: Some(&ship),
        player: None,
    };
    assert_eq!(laser.check_hit(&opponents, &mut bus), 1);
    assert_eq!(
        bus.pop(),
        Some(GameEvent::BonusShipHit {
            points: SHIP_BASE_POINTS
        })
    );
    assert!(bus.is_empty());
    assert!(laser.projectiles().is_empty());
}

#[test]
fn test_lethal_ship_bomb_ends_run_once() {
    let mut s = session(21);
    {
        let world = s.world_mut();
        world.scoreboard.health = 1;
        world.scoreboard.score = 340;
        let target = world.player.bounds();
        assert!(world.ship_bombs.launch(target, 10_000));
    }

    s.tick(&idle()).unwrap();

    assert_eq!(s.status(), SessionStatus::Over);
    assert_eq!(s.world().scoreboard.health, -1);
    assert_eq!(s.high_scores().saves(), 1);
    assert_eq!(
        s.last_events(),
        &[
            GameEvent::PlayerHit {
                faction: Faction::ShipBomb,
                damage: SHIP_BOMB_DAMAGE
            },
            GameEvent::GameOver {
                cause: GameOverCause::HealthDepleted
            }
        ]
    );
    assert_eq!(s.snapshot().high_score, Some(340));

    let clock = s.clock_ms();
    for _ in 0..20 {
        s.tick(&TickInput {
            fire: true,
            resume: true,
            ..Default::default()
        })
        .unwrap();
    }
    assert_eq!(s.clock_ms(), clock);
    assert_eq!(s.high_scores().saves(), 1);
}

#[test]
fn test_last_kill_advances_exactly_one_wave() {
    let mut s = session(8);
    {
        let world = s.world_mut();
        let units = world.formation.units_mut();
        for unit in units.iter_mut().skip(1) {
            unit.alive = false;
        }
        units[0].pos = Vec2::new(400.0, 300.0);
        // After the formation steps left the laser sits inside unit 0
        assert!(world.laser.launch(Aabb::new(405.0, 315.0, 20.0, 5.0), 0));
    }

    s.tick(&idle()).unwrap();

    let waves: Vec<&GameEvent> = s
        .last_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::NewWave { .. }))
        .collect();
    assert_eq!(waves, vec![&GameEvent::NewWave { wave: 2 }]);
    assert_eq!(s.status(), SessionStatus::NewWave);

    let board = &s.world().scoreboard;
    assert_eq!(board.wave, 2);
    assert_eq!(board.score, 60 + 2 * WAVE_SCORE_BONUS);
    assert_eq!(board.health, STARTING_HEALTH + 1);
    assert_eq!(s.world().formation.alive_count(), FORMATION_SIZE);
    assert_eq!(s.world().formation.wave(), 2);
    for unit in s.world().formation.units() {
        assert_eq!(unit.pos, unit.home + Vec2::new(0.0, WAVE_DROP_STEP));
    }

    let frozen = frozen_view(&s);
    for _ in 0..10 {
        s.tick(&TickInput {
            fire: true,
            move_left: true,
            ..Default::default()
        })
        .unwrap();
        assert!(s.last_events().is_empty());
    }
    assert_eq!(frozen_view(&s), frozen);

    s.tick(&TickInput {
        resume: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(s.status(), SessionStatus::Active);
    s.tick(&idle()).unwrap();
    assert_ne!(frozen_view(&s), frozen);
}

#[test]
fn test_pause_freezes_after_settling_tick() {
    let mut s = session(13);
    for _ in 0..5 {
        s.tick(&idle()).unwrap();
    }
    s.tick(&TickInput {
        pause: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(s.status(), SessionStatus::Paused);
    let clock = s.clock_ms();
    assert_eq!(clock, 6 * TICK_MS);

    let frozen = frozen_view(&s);
    for _ in 0..50 {
        s.tick(&TickInput {
            fire: true,
            move_right: true,
            pause: true,
            restart: true,
            ..Default::default()
        })
        .unwrap();
    }
    assert_eq!(frozen_view(&s), frozen);
    assert_eq!(s.clock_ms(), clock);
}

#[test]
fn test_formation_landing_ends_run() {
    let mut s = session(17);
    {
        let formation = &mut s.world_mut().formation;
        let lowest = formation.units()[50].bounds().bottom();
        let dy = SCREEN_HEIGHT - BOTTOM_MARGIN - lowest - 1.0;
        let dx = -formation.units()[0].pos.x;
        for unit in formation.units_mut() {
            unit.pos += Vec2::new(dx, dy);
        }
    }

    s.tick(&idle()).unwrap();

    assert_eq!(s.status(), SessionStatus::Over);
    assert!(s.last_events().contains(&GameEvent::ReachedBottom));
    assert!(s.last_events().contains(&GameEvent::GameOver {
        cause: GameOverCause::FormationLanded
    }));
    assert_eq!(s.high_scores().saves(), 1);

    s.tick(&TickInput {
        restart: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(s.status(), SessionStatus::Active);
    assert_eq!(s.world().formation.alive_count(), FORMATION_SIZE);
    assert_eq!(s.world().formation.units()[0].pos, Vec2::new(90.0, 90.0));
}

#[test]
fn test_formation_starts_bombing_after_initial_delay() {
    let mut s = session(29);
    let mut first_drop = None;
    for _ in 0..400 {
        s.tick(&idle()).unwrap();
        if !s.world().formation_bombs.projectiles().is_empty() {
            first_drop = Some(s.clock_ms());
            break;
        }
    }

    let first_drop = first_drop.expect("formation never dropped a bomb");
    assert!(first_drop > 2 * BOMB_COOLDOWN_MS);
    assert_eq!(s.world().formation_bombs.last_launch_ms(), Some(first_drop));

    let bomb = &s.world().formation_bombs.projectiles()[0];
    assert_eq!(bomb.faction, Faction::FormationBomb);
    assert!(bomb.vel.y > 0.0);
    let bomb_center = bomb.bounds().center_x();
    assert!(
        s.world()
            .formation
            .units()
            .iter()
            .any(|u| u.alive && (u.bounds().center_x() - bomb_center).abs() < 1e-3)
    );
}

#[test]
fn test_parked_bonus_ship_drops_bombs() {
    let mut s = session(31);
    let mut rng = Pcg32::seed_from_u64(31);
    let last_quiet_tick = 2 * BOMB_COOLDOWN_MS / TICK_MS;
    for _ in 0..last_quiet_tick {
        tick(&mut s, &idle()).unwrap();
    }
    assert!(s.world().ship_bombs.projectiles().is_empty());

    // Park a fresh ship that cannot enter for at least two more seconds
    let now = s.clock_ms();
    s.world_mut().bonus = BonusShip::new(Arena::default(), &mut rng, now);

    tick(&mut s, &idle()).unwrap();

    assert!(matches!(s.world().bonus.phase(), ShipPhase::Offscreen { .. }));
    assert_eq!(s.world().ship_bombs.last_launch_ms(), Some(s.clock_ms()));
    let bombs = s.world().ship_bombs.projectiles();
    assert_eq!(bombs.len(), 1);
    assert_eq!(bombs[0].faction, Faction::ShipBomb);
    assert_eq!(bombs[0].damage, SHIP_BOMB_DAMAGE);
}

#[test]
fn test_destroyed_bonus_ship_stops_bombing() {
    let mut s = session(31);
    s.world_mut().bonus.on_hit();
    for _ in 0..400 {
        tick(&mut s, &idle()).unwrap();
    }
    assert_eq!(s.world().ship_bombs.last_launch_ms(), Some(BOMB_COOLDOWN_MS));
    assert!(s.world().ship_bombs.projectiles().is_empty());
}

#[test]
fn test_supply_crate_heals() {
    let mut s = session(3);
    {
        let world = s.world_mut();
        let target = world.player.bounds();
        assert!(world.supply_drops.launch(target, 10_000));
    }
    s.tick(&idle()).unwrap();
    assert_eq!(s.world().scoreboard.health, STARTING_HEALTH + 1);
    assert_eq!(s.status(), SessionStatus::Active);
}

#[test]
fn test_same_seed_same_game() {
    let mut a = session(77);
    let mut b = session(77);
    for i in 0..2_000u32 {
        let input = TickInput {
            fire: i % 3 == 0,
            move_left: i % 200 < 100,
            move_right: i % 200 >= 100,
            ..Default::default()
        };
        a.tick(&input).unwrap();
        b.tick(&input).unwrap();
    }
    assert_eq!(frozen_view(&a), frozen_view(&b));
}

#[test]
fn test_bad_opponent_is_a_setup_error() {
    let mut bombs = Emitter::new(EmitterConfig::ship_bomb());
    let err = bombs.add_opponent(OpponentKind::Formation).unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidOpponent {
            faction: Faction::ShipBomb,
            opponent: OpponentKind::Formation
        }
    );
    assert!(err.to_string().contains("cannot target"));
}
