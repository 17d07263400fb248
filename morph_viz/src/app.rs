//! Top-level application state machine.
//!
//! `AppState` owns the `MorphController`, the gesture classifier and
//! rotation mapper, every population with its animator, and the scene
//! rotation.  The capture side feeds it [`SourceEvent`]s; the render side
//! calls [`AppState::tick`] once per frame.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hand_signal::{Gesture, GestureClassifier, LandmarkFrame, RotationMapper};
use morph_field::{MorphAnimator, MorphController, MorphState, Population, SceneRotation};

use crate::capture::{CaptureSession, SimInput, SourceEvent};
use crate::config::SessionConfig;
use crate::error::AppError;
use crate::replay::{load_replay, ReplayLandmarkSource};
use crate::visualizer::{UiCommand, Visualizer};

/// Longest frame step fed to the animators; a stalled window resumes
/// smoothly instead of jumping.
const MAX_FRAME_DELTA: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════════════
// GestureStatus
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GestureStatus {
    /// No frame has arrived yet.
    #[default]
    Waiting,
    /// Frames are arriving.
    Active,
    /// Capture is gone; only the explicit toggle drives the morph.
    Unavailable(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Layer: one population and its animator
// ════════════════════════════════════════════════════════════════════════════

pub struct Layer {
    pub population: Population,
    pub animator:   MorphAnimator,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── control ──────────────────────────────────────────────────────────
    controller: MorphController,
    classifier: GestureClassifier,
    mapper:     RotationMapper,

    // ── scene ────────────────────────────────────────────────────────────
    layers:     Vec<Layer>,
    scene:      SceneRotation,

    // ── last signals, held between frames ────────────────────────────────
    rotation_signal: f32,
    hand_visible:    bool,
    status:          GestureStatus,

    seed: u64,
}

impl AppState {
    pub fn new(cfg: &SessionConfig) -> Result<Self, AppError> {
        cfg.validate()?;
        let seed = cfg.resolve_seed();
        log::info!("population seed {seed}");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let layers = cfg
            .populations
            .iter()
            .map(|spec| -> Result<Layer, AppError> {
                let population = Population::generate(spec, &cfg.shape, &mut rng)?;
                let animator = MorphAnimator::for_population(&population);
                Ok(Layer { population, animator })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total: usize = layers.iter().map(|l| l.population.len()).sum();
        log::info!("{} populations, {} entities", layers.len(), total);

        Ok(AppState {
            controller: MorphController::default(),
            classifier: GestureClassifier::new(cfg.classifier.clone())?,
            mapper:     RotationMapper::new(cfg.rotation.clone())?,
            layers,
            scene:      SceneRotation::new(cfg.scene),
            rotation_signal: 0.0,
            hand_visible:    false,
            status:          GestureStatus::Waiting,
            seed,
        })
    }

    // ── capture side ──────────────────────────────────────────────────────

    /// Process one capture event.  `now` is time since session start.
    pub fn handle_event(&mut self, event: SourceEvent, now: Duration) {
        match event {
            SourceEvent::Frame(frame) => {
                self.status = GestureStatus::Active;
                self.apply_frame(frame.as_ref(), now);
            }
            SourceEvent::Unavailable(reason) => {
                log::warn!("hand capture unavailable: {reason}");
                self.status = GestureStatus::Unavailable(reason);
                self.apply_frame(None, now);
            }
            SourceEvent::Finished => {
                log::info!("hand capture finished");
                self.status = GestureStatus::Unavailable("capture finished".into());
                self.apply_frame(None, now);
            }
        }
    }

    fn apply_frame(&mut self, frame: Option<&LandmarkFrame>, now: Duration) {
        self.hand_visible = frame.is_some();
        if let Some(f) = frame {
            if let Some(target) = self.classifier.classify(f, self.controller.current(), now) {
                self.controller.request_transition(target);
            }
        }
        self.rotation_signal = self.mapper.map(frame);
    }

    /// Explicit UI toggle; works whatever the capture status.
    pub fn toggle(&mut self) -> MorphState {
        self.controller.toggle()
    }

    // ── render side ───────────────────────────────────────────────────────

    /// Advance every animator and the scene rotation by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        let state = self.controller.current();
        for layer in &mut self.layers {
            layer.animator.advance(delta, state);
        }
        self.scene.advance(delta, state, self.rotation_signal);
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn state(&self)           -> MorphState     { self.controller.current() }
    pub fn revision(&self)        -> u64            { self.controller.revision() }
    pub fn layers(&self)          -> &[Layer]       { &self.layers }
    pub fn scene(&self)           -> &SceneRotation { &self.scene }
    pub fn rotation_signal(&self) -> f32            { self.rotation_signal }
    pub fn gesture(&self)         -> Gesture        { self.classifier.gesture() }
    pub fn hand_visible(&self)    -> bool           { self.hand_visible }
    pub fn status(&self)          -> &GestureStatus { &self.status }
    pub fn seed(&self)            -> u64            { self.seed }

    /// One-line summary for the HUD.
    pub fn status_line(&self) -> String {
        let capture = match &self.status {
            GestureStatus::Waiting            => "waiting for hand".to_string(),
            GestureStatus::Active if self.hand_visible => {
                format!("hand: {}", self.gesture().name())
            }
            GestureStatus::Active             => "no hand".to_string(),
            GestureStatus::Unavailable(why)   => format!("gestures off ({why})"),
        };
        format!(
            "{}  {}  spin {:+.2}  seed {}",
            self.state(),
            capture,
            self.rotation_signal,
            self.seed
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the windowed application loop
// ════════════════════════════════════════════════════════════════════════════

pub struct RunOptions {
    pub replay:      Option<PathBuf>,
    pub loop_replay: bool,
}

/// Run the viewer.
///
/// Creates the visualizer, the landmark source (replay file if given,
/// otherwise the simulator, or hardware with `--features leap`) and drives
/// the event/render loop at ~60 fps.
pub fn run(cfg: SessionConfig, opts: RunOptions) -> Result<(), AppError> {
    let cadence = cfg.capture.cadence();
    let mut app = AppState::new(&cfg)?;

    // ── Sim input channel (ignored when frames come from elsewhere) ───────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let capture = match opts.replay {
        Some(path) => {
            CaptureSession::spawn(ReplayLandmarkSource::open(&path, cadence, opts.loop_replay)?)
        }
        None => live_source(sim_rx, cadence),
    };

    let mut vis = Visualizer::new(sim_tx)?;

    let started = Instant::now();
    let mut last = started;
    while vis.is_open() {
        match vis.poll_input() {
            UiCommand::Quit   => break,
            UiCommand::Toggle => {
                let state = app.toggle();
                log::info!("toggle -> {state}");
            }
            UiCommand::None   => {}
        }

        for event in capture.try_iter() {
            app.handle_event(event, started.elapsed());
        }

        let now = Instant::now();
        let delta = (now - last).as_secs_f32().min(MAX_FRAME_DELTA);
        last = now;
        app.tick(delta);

        vis.render(&app);
    }

    capture.stop();
    Ok(())
}

#[cfg(not(feature = "leap"))]
fn live_source(sim_rx: mpsc::Receiver<SimInput>, cadence: Duration) -> CaptureSession {
    CaptureSession::spawn(crate::capture::SimLandmarkSource::new(sim_rx, cadence))
}

#[cfg(feature = "leap")]
fn live_source(_sim_rx: mpsc::Receiver<SimInput>, _cadence: Duration) -> CaptureSession {
    CaptureSession::spawn(crate::capture::LeapLandmarkSource)
}

// ════════════════════════════════════════════════════════════════════════════
// Headless mode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessSummary {
    pub seed:        u64,
    pub final_state: MorphState,
    pub transitions: u64,
    pub frames_fed:  usize,
    pub scene_angle: f32,
    /// Raw blend factor per population, by name.
    pub factors:     Vec<(String, f32)>,
}

/// Advance a session for `seconds` of simulated time at 60 Hz, without a
/// window.  Replay frames are fed on the configured cadence of the same
/// simulated clock, so the run is deterministic for a fixed seed.
pub fn run_headless(
    cfg:     &SessionConfig,
    frames:  &[Option<LandmarkFrame>],
    seconds: f32,
    looping: bool,
) -> Result<HeadlessSummary, AppError> {
    const DT: f32 = 1.0 / 60.0;

    if !seconds.is_finite() {
        return Err(AppError::HeadlessDuration(seconds));
    }
    let mut app = AppState::new(cfg)?;
    let cadence = cfg.capture.cadence();
    let steps = (seconds.max(0.0) * 60.0).round() as u64;

    let mut next_frame = Duration::ZERO;
    let mut cursor = 0usize;
    let mut fed = 0usize;
    let mut finished = frames.is_empty();

    for step in 0..steps {
        let now = Duration::from_secs_f64(step as f64 / 60.0);
        while !finished && now >= next_frame {
            app.handle_event(SourceEvent::Frame(frames[cursor].clone()), now);
            fed += 1;
            cursor += 1;
            next_frame += cadence;
            if cursor == frames.len() {
                if looping {
                    cursor = 0;
                } else {
                    finished = true;
                    app.handle_event(SourceEvent::Finished, now);
                }
            }
        }
        app.tick(DT);
    }

    let summary = HeadlessSummary {
        seed:        app.seed(),
        final_state: app.state(),
        transitions: app.revision(),
        frames_fed:  fed,
        scene_angle: app.scene().angle(),
        factors:     app
            .layers()
            .iter()
            .map(|l| (l.population.name.clone(), l.animator.factor()))
            .collect(),
    };
    log::info!(
        "headless {:.1}s: {} frames, {} transitions, final state {}",
        seconds,
        summary.frames_fed,
        summary.transitions,
        summary.final_state
    );
    Ok(summary)
}

/// Headless run driven by an optional replay file.
pub fn run_headless_from(
    cfg:     &SessionConfig,
    replay:  Option<&std::path::Path>,
    seconds: f32,
    looping: bool,
) -> Result<HeadlessSummary, AppError> {
    let frames = match replay {
        Some(path) => load_replay(path)?,
        None       => Vec::new(),
    };
    run_headless(cfg, &frames, seconds, looping)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use morph_field::PopulationSpec;

    fn small_config() -> SessionConfig {
        SessionConfig {
            populations: PopulationSpec::defaults()
                .into_iter()
                .map(|s| PopulationSpec { count: s.count.min(40), ..s })
                .collect(),
            seed: Some(7),
            ..Default::default()
        }
    }

    fn make_app() -> AppState {
        AppState::new(&small_config()).unwrap()
    }

    fn frame(wrist_x: f32, ratio: f32) -> SourceEvent {
        SourceEvent::Frame(Some(LandmarkFrame::posed(wrist_x, ratio)))
    }

    #[test]
    fn starts_scattered_and_waiting() {
        let app = make_app();
        assert_eq!(app.state(), MorphState::Scattered);
        assert_eq!(app.status(), &GestureStatus::Waiting);
        assert_eq!(app.layers().len(), 4);
        assert_eq!(app.seed(), 7);
    }

    #[test]
    fn invalid_config_is_rejected_before_building() {
        let mut cfg = small_config();
        cfg.populations[1].count = 0;
        assert!(matches!(AppState::new(&cfg), Err(AppError::Scene(_))));
    }

    #[test]
    fn toggle_works_while_capture_unavailable() {
        let mut app = make_app();
        app.handle_event(SourceEvent::Unavailable("no camera".into()), Duration::ZERO);
        assert!(matches!(app.status(), GestureStatus::Unavailable(_)));
        assert_eq!(app.toggle(), MorphState::Assembled);
        app.tick(1_000.0);
        assert!(app.layers().iter().all(|l| l.animator.factor() == 1.0));
    }

    #[test]
    fn fist_frame_assembles() {
        let mut app = make_app();
        app.handle_event(frame(0.5, 0.5), Duration::ZERO);
        assert_eq!(app.state(), MorphState::Assembled);
        assert_eq!(app.gesture(), Gesture::Fist);
        app.tick(1_000.0);
        for layer in app.layers() {
            for (t, e) in layer.animator.transforms(&layer.population.entities).zip(&layer.population.entities) {
                assert!((t.position - e.assembled).length() < 1e-4);
            }
        }
    }

    #[test]
    fn open_palm_inside_debounce_is_ignored() {
        let mut app = make_app();
        app.handle_event(frame(0.5, 0.5), Duration::ZERO);
        app.handle_event(frame(0.5, 1.6), Duration::from_millis(500));
        assert_eq!(app.state(), MorphState::Assembled);
        app.handle_event(frame(0.5, 1.6), Duration::from_millis(1_001));
        assert_eq!(app.state(), MorphState::Scattered);
    }

    #[test]
    fn hand_loss_zeroes_rotation() {
        let mut app = make_app();
        app.handle_event(frame(0.0, 1.0), Duration::ZERO);
        assert_eq!(app.rotation_signal(), 1.5);
        app.handle_event(SourceEvent::Frame(None), Duration::from_millis(33));
        assert_eq!(app.rotation_signal(), 0.0);
        assert!(!app.hand_visible());
        assert_eq!(app.status(), &GestureStatus::Active);
    }

    #[test]
    fn rotation_signal_persists_across_ticks() {
        let mut app = make_app();
        app.handle_event(frame(0.0, 1.0), Duration::ZERO);
        let before = app.scene().angle();
        for _ in 0..10 {
            app.tick(0.01);
        }
        assert_eq!(app.rotation_signal(), 1.5);
        let turned = app.scene().angle() - before;
        assert!((turned - 0.1 * (0.05 + 1.5)).abs() < 1e-4);
    }

    #[test]
    fn status_line_reports_state_and_hand() {
        let mut app = make_app();
        app.handle_event(frame(0.5, 0.5), Duration::ZERO);
        let line = app.status_line();
        assert!(line.starts_with("assembled"));
        assert!(line.contains("hand: fist"));
    }

    #[test]
    fn headless_replay_is_deterministic() {
        let cfg = small_config();
        let mut frames: Vec<_> = (0..10).map(|_| Some(LandmarkFrame::posed(0.5, 0.5))).collect();
        frames.extend((0..10).map(|_| Some(LandmarkFrame::posed(0.5, 1.0))));

        let a = run_headless(&cfg, &frames, 3.0, false).unwrap();
        let b = run_headless(&cfg, &frames, 3.0, false).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.final_state, MorphState::Assembled);
        assert_eq!(a.transitions, 1);
        assert_eq!(a.frames_fed, 20);

        let foliage = a.factors.iter().find(|(n, _)| n == "foliage").map(|(_, f)| *f);
        assert!(foliage.unwrap() > 0.99);
    }

    #[test]
    fn headless_rejects_non_finite_duration() {
        for seconds in [f32::INFINITY, f32::NAN] {
            let err = run_headless(&small_config(), &[], seconds, false).unwrap_err();
            assert!(matches!(err, AppError::HeadlessDuration(_)));
        }
        assert!(run_headless(&small_config(), &[], -1.0, false).is_ok());
    }

    #[test]
    fn headless_without_frames_stays_scattered() {
        let summary = run_headless(&small_config(), &[], 1.0, false).unwrap();
        assert_eq!(summary.final_state, MorphState::Scattered);
        assert_eq!(summary.frames_fed, 0);
        assert!(summary.factors.iter().all(|(_, f)| *f == 0.0));
    }
}
