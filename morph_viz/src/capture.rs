//! Hand capture: landmark frames from a simulator, a replay file or
//! LeapMotion hardware.
//!
//! Every source runs on its own thread and delivers [`SourceEvent`]s over a
//! `mpsc` channel.  The consumer never needs to know where frames came from.
//! [`CaptureSession`] owns the thread: stopping or dropping the session
//! signals the source and joins it, so no frame arrives after teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hand_signal::LandmarkFrame;

// ════════════════════════════════════════════════════════════════════════════
// SourceEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// One inference result; `None` when no hand is in view.
    Frame(Option<LandmarkFrame>),
    /// The source could not start.  Explicit controls keep working.
    Unavailable(String),
    /// The source ran out of frames.
    Finished,
}

// ════════════════════════════════════════════════════════════════════════════
// StopToken
// ════════════════════════════════════════════════════════════════════════════

/// Shared cancellation flag polled by source threads.
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait: unified interface for hw, sim and replay
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.
///
/// `run` must return promptly once `stop` is set or `tx` is disconnected.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>, stop: StopToken);
}

// ════════════════════════════════════════════════════════════════════════════
// CaptureSession
// ════════════════════════════════════════════════════════════════════════════

pub struct CaptureSession {
    rx:     Receiver<SourceEvent>,
    stop:   StopToken,
    handle: Option<JoinHandle<()>>,
}

impl CaptureSession {
    /// Spawn `source` on its own thread.
    pub fn spawn<S: LandmarkSource>(source: S) -> Self {
        let (tx, rx) = mpsc::channel();
        let stop = StopToken::default();
        let token = stop.clone();
        let handle = thread::spawn(move || Box::new(source).run(tx, token));
        CaptureSession { rx, stop, handle: Some(handle) }
    }

    /// Everything delivered since the last call, without blocking.
    pub fn try_iter(&self) -> impl Iterator<Item = SourceEvent> + '_ {
        self.rx.try_iter()
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SourceEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Signal the source and wait for its thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.request();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("capture thread panicked");
            } else {
                log::debug!("capture thread joined");
            }
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: keyboard/mouse synthetic hand (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Pose held by the simulated hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimPose {
    /// Fingers half curled, inside the classifier's dead band.
    #[default]
    Relaxed,
    Fist,
    Open,
}

impl SimPose {
    fn extension_ratio(self) -> f32 {
        match self {
            SimPose::Relaxed => 1.1,
            SimPose::Fist    => 0.6,
            SimPose::Open    => 1.6,
        }
    }
}

/// Raw input from the viewer window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Hide or show the hand.
    TogglePresence,
    Pose(SimPose),
    /// Wrist x in normalised image coordinates.
    WristX(f32),
}

/// State of the synthetic hand.
#[derive(Clone, Debug, PartialEq)]
pub struct SimHand {
    pub present: bool,
    pub pose:    SimPose,
    pub wrist_x: f32,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { present: true, pose: SimPose::Relaxed, wrist_x: 0.5 }
    }
}

impl SimHand {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::TogglePresence => self.present = !self.present,
            SimInput::Pose(p)        => self.pose = p,
            SimInput::WristX(x)      => {
                if x.is_finite() {
                    self.wrist_x = x.clamp(0.0, 1.0);
                }
            }
        }
    }

    pub fn frame(&self) -> Option<LandmarkFrame> {
        self.present
            .then(|| LandmarkFrame::posed(self.wrist_x, self.pose.extension_ratio()))
    }
}

/// Landmark source driven by [`SimInput`] events from the viewer window.
///
/// Emits the current synthetic hand every `cadence`, like a camera
/// pipeline running inference at a fixed rate.
pub struct SimLandmarkSource {
    pub rx:      Receiver<SimInput>,
    pub cadence: Duration,
    pub hand:    SimHand,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, cadence: Duration) -> Self {
        SimLandmarkSource { rx, cadence, hand: SimHand::default() }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>, stop: StopToken) {
        let SimLandmarkSource { rx, cadence, mut hand } = *self;
        let mut next = Instant::now();
        while !stop.is_stopped() {
            let wait = next.saturating_duration_since(Instant::now());
            match rx.recv_timeout(wait) {
                Ok(input) => {
                    hand.apply(input);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    let _ = tx.send(SourceEvent::Finished);
                    return;
                }
            }
            next = Instant::now() + cadence;
            if tx.send(SourceEvent::Frame(hand.frame())).is_err() {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// The first tracked hand is mapped onto the 21-point scheme: the wrist is
/// the arm's distal joint, each digit contributes its proximal, intermediate
/// and distal base joints plus the fingertip.  Millimetres above the device
/// are normalised into the `[0, 1]` image square.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>, stop: StopToken) {
        use hand_signal::Landmark;
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(SourceEvent::Unavailable(format!("LeapC connection: {e:?}")));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(SourceEvent::Unavailable(format!("LeapMotion device: {e:?}")));
            return;
        }

        macro_rules! point {
            ($joint:expr) => {{
                let v = $joint;
                leap_to_image(v.x, v.y, v.z)
            }};
        }

        while !stop.is_stopped() {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            let Event::Tracking(frame) = msg.event() else { continue };

            let landmarks = frame.hands().into_iter().next().map(|hand| {
                let mut pts: Vec<Landmark> = Vec::with_capacity(hand_signal::LANDMARK_COUNT);
                pts.push(point!(hand.arm().next_joint()));
                for digit in hand.digits().into_iter() {
                    pts.push(point!(digit.proximal().prev_joint()));
                    pts.push(point!(digit.intermediate().prev_joint()));
                    pts.push(point!(digit.distal().prev_joint()));
                    pts.push(point!(digit.distal().next_joint()));
                }
                LandmarkFrame::new(pts)
            });
            if tx.send(SourceEvent::Frame(landmarks)).is_err() {
                return;
            }
        }
    }
}

/// LeapMotion millimetres → normalised image coordinates (y down).
#[cfg(feature = "leap")]
fn leap_to_image(x: f32, y: f32, z: f32) -> hand_signal::Landmark {
    hand_signal::Landmark::new((x + 200.0) / 400.0, 1.0 - (y - 50.0) / 400.0, z / 400.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
