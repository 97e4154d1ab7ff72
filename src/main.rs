use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, terminal,
};
use flappy_dusk::{
    Config, Effect, Result, Round, RoundState,
    audio::Audio,
    day_night::StarClock,
    effects::BurstKind,
    logging,
    particles::Particles,
    pixels::PixelBuf,
    render::{self, Viewport},
    scenery::Scenery,
};
use log::{error, info};
use rand::{SeedableRng, rngs::StdRng};
use std::io::{self, Write, stdout};
use std::process::ExitCode;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(33); // ~30 fps

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("flappy-dusk: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cfg = Config::load()?;
    let log_path = cfg.log_path();
    logging::init_log(cfg.level_filter()?, &log_path)?;
    info!("starting, logging to {}", log_path.display());

    let mut rng = match cfg.seed {
        Some(seed) => {
            info!("using fixed seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let audio = Audio::new(cfg.sound);
    info!("sound {}", if audio.is_active() { "on" } else { "off" });

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    let setup = execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    );

    let result = match setup {
        Ok(()) => play(&mut out, Round::new(cfg.tuning), &audio, &mut rng),
        Err(e) => Err(e.into()),
    };
    let restored = restore(&mut out);
    result?;
    restored?;
    info!("bye");
    Ok(())
}

fn restore(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()
}

fn play(out: &mut impl Write, mut round: Round, audio: &Audio, rng: &mut StdRng) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut view = Viewport::new(buf.width(), buf.height(), round.tuning());
    let mut particles = Particles::new();
    let mut stars = StarClock::default();
    let mut scenery = Scenery::new(round.tuning(), rng);
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let before = round.state();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                        round.primary_input(rng);
                    }
                    KeyCode::Char('p') => round.toggle_pause(),
                    _ => {}
                },
                Event::Resize(c, r) => {
                    buf.resize(c as usize, r as usize * 2);
                    view = Viewport::new(buf.width(), buf.height(), round.tuning());
                }
                _ => {}
            }
        }

        // Update
        let now = Instant::now();
        let dt = now - last;
        last = now;
        round.tick(dt, rng);

        for effect in round.drain_effects() {
            match effect {
                Effect::Sound(sound) => audio.play(sound),
                Effect::Burst { kind, x, y, count } => particles.burst(kind, x, y, count, rng),
            }
        }

        if round.state() == RoundState::Idle && before != RoundState::Idle {
            particles.clear();
            stars.reset();
            scenery.reset(round.tuning(), rng);
        }
        if round.state() == RoundState::Running {
            if let Some(n) = stars.due(round.clock(), round.day_night().phase(), rng) {
                particles.burst(BurstKind::Star, 0.0, 0.0, n, rng);
            }
        }
        if round.state() != RoundState::Paused {
            particles.update(dt.as_secs_f64() * 1000.0);
        }
        scenery.advance(round.state(), dt.as_secs_f64(), round.tuning(), rng);

        // Render
        render::draw(&mut buf, &view, &round, &particles, &scenery);
        buf.render(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}
