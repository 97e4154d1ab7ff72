use flappy_dusk::day_night::{self, DayNight};
use flappy_dusk::{Config, Effect, Error, Round, RoundState, Sound, Spawner, Tuning};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::time::Duration;

fn create_test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(12345)
}

/// Gap center of the next pair the bird has not cleared yet.
fn next_gap(round: &Round) -> f64 {
    let t = round.tuning();
    let bird = round.bird();
    round
        .obstacles()
        .iter()
        .find(|o| o.x + t.pipe_width / 2.0 + t.hitbox_size >= bird.x)
        .map(|o| o.gap_center)
        .unwrap_or_else(|| t.band_mid())
}

#[test]
fn test_autopilot_round_stays_consistent() {
    let mut rng = create_test_rng();
    let mut round = Round::new(Tuning::default());
    round.primary_input(&mut rng);

    let mut last_score = 0;
    for _ in 0..20_000 {
        if round.bird().y > next_gap(&round) + 10.0 && round.bird().vy > 0.0 {
            round.primary_input(&mut rng);
        }
        round.step(&mut rng);
        round.drain_effects().for_each(drop);

        let t = round.tuning().clone();
        assert!(round.bird().vy <= t.max_fall_speed);
        assert!(round.score() >= last_score);
        last_score = round.score();
        assert!(round.obstacles().len() <= 5);
        for pair in round.obstacles().windows(2) {
            assert!(pair[0].id < pair[1].id);
            assert!(pair[0].x < pair[1].x);
        }
        for o in round.obstacles() {
            assert!((t.min_gap_y..=t.max_gap_y).contains(&o.gap_center));
        }

        if round.state() != RoundState::Running {
            break;
        }
        for o in round.obstacles() {
            assert_eq!(o.scored, o.x < round.bird().x);
        }
    }
    if round.state() == RoundState::Over {
        assert_eq!(round.best(), round.score());
    }
}

#[test]
fn test_uniform_gaps_keep_their_distance() {
    let mut rng = create_test_rng();
    let t = Tuning {
        pattern_chance: 0.0,
        ..Tuning::default()
    };
    let mut spawner = Spawner::new(&t);
    let mut last = spawner.last_gap;
    for i in 0..500 {
        let o = spawner.spawn(&t, i as f64 * 1000.0, &mut rng);
        assert!((o.gap_center - last).abs() >= t.min_gap_difference);
        assert_eq!(o.gap_center, o.gap_center.round());
        last = o.gap_center;
    }
}

#[test]
fn test_every_strategy_mix_stays_in_band() {
    let mut rng = create_test_rng();
    let t = Tuning {
        pattern_chance: 1.0,
        ..Tuning::default()
    };
    let mut spawner = Spawner::new(&t);
    for i in 0..1_000 {
        let o = spawner.spawn(&t, i as f64, &mut rng);
        assert!(o.gap_top() >= t.min_gap_y - t.pipe_gap / 2.0);
        assert!(o.gap_bottom() <= t.max_gap_y + t.pipe_gap / 2.0);
        assert_eq!(o.id, i + 1);
    }
}

#[test]
fn test_day_turns_to_night_and_back() {
    let t = Tuning::default();
    let mut cycle = DayNight::new(&t);

    for _ in 0..2_000 {
        cycle.advance(2);
    }
    assert_eq!(cycle.phase(), 0.0);

    let mut peak = 0.0f64;
    for _ in 0..2_000 {
        cycle.advance(10);
        peak = peak.max(cycle.phase());
    }
    assert_eq!(cycle.phase(), 0.5);
    assert!(peak <= 0.5 + 1e-9);
    assert!(day_night::is_night(cycle.phase()));
    assert_eq!(day_night::night_depth(cycle.phase()), 1.0);

    for _ in 0..2_000 {
        cycle.advance(20);
    }
    assert_eq!(cycle.phase(), 0.0);
    assert!(!day_night::is_night(cycle.phase()));
}

#[test]
fn test_pause_freezes_wall_time() {
    let mut rng = create_test_rng();
    let mut round = Round::new(Tuning::default());
    round.primary_input(&mut rng);
    round.tick(Duration::from_millis(100), &mut rng);
    round.toggle_pause();
    let frozen = round.clone();
    for _ in 0..30 {
        round.tick(Duration::from_millis(33), &mut rng);
        round.primary_input(&mut rng);
    }
    assert_eq!(round, frozen);

    round.toggle_pause();
    round.tick(Duration::from_millis(100), &mut rng);
    assert!(round.clock() > frozen.clock());
}

#[test]
fn test_falling_bird_hits_ground_once() {
    let mut rng = create_test_rng();
    let mut round = Round::new(Tuning::default());
    round.primary_input(&mut rng);
    round.drain_effects().for_each(drop);

    for _ in 0..200 {
        round.tick(Duration::from_millis(33), &mut rng);
    }
    assert_eq!(round.state(), RoundState::Over);
    let hits = round
        .drain_effects()
        .filter(|e| *e == Effect::Sound(Sound::Hit))
        .count();
    assert_eq!(hits, 1);

    round.primary_input(&mut rng);
    assert_eq!(round.state(), RoundState::Idle);
    assert!(round.obstacles().is_empty());
}

#[test]
fn test_config_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("flappy-dusk-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.json");
    fs::write(&good, r#"{ "seed": 7, "sound": false, "tuning": { "pipe_gap": 180 } }"#).unwrap();
    let cfg = Config::load_from(&good).unwrap();
    assert_eq!(cfg.seed, Some(7));
    assert!(!cfg.sound);
    assert_eq!(cfg.tuning.pipe_gap, 180.0);
    assert_eq!(cfg.tuning.gravity, Tuning::default().gravity);

    let bad = dir.join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(Config::load_from(&bad), Err(Error::ConfigParse { .. })));

    let missing = dir.join("missing.json");
    assert_eq!(Config::load_from(&missing).unwrap(), Config::default());

    fs::remove_dir_all(&dir).unwrap();
}
