// Debug controls driven from a host thread while the program runs on another

use pietty::grid::Grid;
use pietty::interpreter::control::ExecutionState;
use pietty::interpreter::engine::{DebugSettings, HaltReason, Interpreter, Termination};
use pietty::interpreter::errors::{Control, Fault};
use pietty::interpreter::events::Event;
use pietty::snapshot::Recorder;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Pushes 1, pops it, and repeats forever
const PING_PONG: &str = "lR R";

fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(1));
    }
}

fn spawn_run(
    settings: DebugSettings,
) -> (
    Arc<Interpreter>,
    Recorder,
    JoinHandle<Result<Termination, Fault>>,
) {
    let grid: Grid = PING_PONG.parse().expect("valid program");
    let recorder = Recorder::new();
    let interpreter = Arc::new(Interpreter::debug(settings, recorder.clone()));
    let worker = {
        let interpreter = Arc::clone(&interpreter);
        thread::spawn(move || interpreter.interpret(&grid, Vec::new(), std::io::empty()))
    };
    (interpreter, recorder, worker)
}

fn paused_start() -> DebugSettings {
    DebugSettings {
        step_delay: Duration::ZERO,
        start_paused: true,
    }
}

#[test]
fn test_controls_need_debug_mode() {
    let interpreter = Interpreter::new();
    assert!(!interpreter.is_debug());
    assert!(matches!(
        interpreter.pause(),
        Err(Fault::NotDebuggable {
            control: Control::Pause
        })
    ));
    assert!(matches!(
        interpreter.handle().cancel(),
        Err(Fault::NotDebuggable {
            control: Control::Cancel
        })
    ));
}

#[test]
fn test_controls_while_idle() {
    let interpreter = Interpreter::debug(DebugSettings::default(), Recorder::new());
    assert_eq!(interpreter.state(), ExecutionState::Idle);
    for result in [interpreter.pause(), interpreter.resume(), interpreter.step()] {
        assert!(matches!(
            result,
            Err(Fault::InvalidControl {
                state: ExecutionState::Idle,
                ..
            })
        ));
    }
    assert_eq!(interpreter.cancel().ok(), Some(ExecutionState::Idle));
}

#[test]
fn test_single_step_then_resume_then_cancel() {
    let (interpreter, recorder, worker) = spawn_run(paused_start());
    wait_until("paused start", || {
        recorder
            .events()
            .contains(&Event::StateChanged(ExecutionState::Paused))
    });
    assert_eq!(recorder.snapshot().operations, 0);

    // A second run cannot start while this one is active
    let grid: Grid = PING_PONG.parse().expect("valid program");
    assert!(matches!(
        interpreter.interpret(&grid, Vec::new(), std::io::empty()),
        Err(Fault::AlreadyRunning {
            state: ExecutionState::Paused
        })
    ));

    assert_eq!(interpreter.step().ok(), Some(ExecutionState::OneMoreStep));
    wait_until("first step", || {
        interpreter.state() == ExecutionState::Paused && recorder.snapshot().operations == 1
    });
    assert_eq!(recorder.snapshot().stack, vec![1]);

    interpreter.step().expect("step while paused");
    wait_until("second step", || {
        interpreter.state() == ExecutionState::Paused && recorder.snapshot().operations == 2
    });
    assert!(recorder.snapshot().stack.is_empty());

    assert_eq!(interpreter.resume().ok(), Some(ExecutionState::Running));
    assert!(matches!(
        interpreter.step(),
        Err(Fault::InvalidControl {
            control: Control::Step,
            state: ExecutionState::Running
        })
    ));
    wait_until("free run", || recorder.snapshot().operations > 10);

    assert_eq!(interpreter.cancel().ok(), Some(ExecutionState::Idle));
    let termination = worker
        .join()
        .expect("worker thread")
        .expect("run without fault");
    assert_eq!(termination.reason, HaltReason::Cancelled);
    assert_eq!(interpreter.state(), ExecutionState::Idle);
    assert_eq!(
        recorder.events().last(),
        Some(&Event::StateChanged(ExecutionState::Idle))
    );
}

#[test]
fn test_pause_stops_a_free_run() {
    let settings = DebugSettings {
        step_delay: Duration::from_millis(1),
        start_paused: false,
    };
    let (interpreter, recorder, worker) = spawn_run(settings);
    wait_until("some progress", || recorder.snapshot().operations > 2);

    assert_eq!(interpreter.pause().ok(), Some(ExecutionState::Paused));
    // At most the iteration already past the gate completes
    let settled = recorder.snapshot().operations;
    thread::sleep(Duration::from_millis(50));
    assert!(recorder.snapshot().operations <= settled + 1);

    interpreter.cancel().expect("cancel");
    let termination = worker
        .join()
        .expect("worker thread")
        .expect("run without fault");
    assert_eq!(termination.reason, HaltReason::Cancelled);
}

#[test]
fn test_cancel_cuts_step_delay_short() {
    let settings = DebugSettings {
        step_delay: Duration::from_secs(30),
        start_paused: false,
    };
    let (interpreter, recorder, worker) = spawn_run(settings);
    wait_until("run start", || {
        recorder
            .events()
            .contains(&Event::StateChanged(ExecutionState::Running))
    });

    let started = Instant::now();
    interpreter.cancel().expect("cancel");
    let termination = worker
        .join()
        .expect("worker thread")
        .expect("run without fault");
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(termination.reason, HaltReason::Cancelled);
    assert_eq!(termination.operations, 0);
}

#[test]
fn test_cancel_while_paused() {
    let (interpreter, recorder, worker) = spawn_run(paused_start());
    wait_until("paused start", || interpreter.state() == ExecutionState::Paused);
    interpreter.cancel().expect("cancel");
    let termination = worker
        .join()
        .expect("worker thread")
        .expect("run without fault");
    assert_eq!(termination.reason, HaltReason::Cancelled);
    assert_eq!(recorder.snapshot().operations, 0);

    // The engine can be used again once the cancelled run has unwound
    let worker = {
        let interpreter = Arc::clone(&interpreter);
        thread::spawn(move || {
            let grid: Grid = "lR R W W".parse().expect("valid program");
            interpreter.interpret(&grid, Vec::new(), std::io::empty())
        })
    };
    wait_until("second paused start", || interpreter.state() == ExecutionState::Paused);
    interpreter.resume().expect("resume");
    let termination = worker
        .join()
        .expect("worker thread")
        .expect("run without fault");
    assert_eq!(termination.reason, HaltReason::WhiteTrap);
    assert_eq!(termination.stack, vec![1]);
}

#[test]
fn test_new_run_accepted_once_idle_is_reported() {
    let (tx, rx) = mpsc::channel();
    let settings = DebugSettings {
        step_delay: Duration::ZERO,
        start_paused: false,
    };
    let interpreter = Arc::new(Interpreter::debug(settings, tx));
    let grid: Grid = "lR R W W".parse().expect("valid program");
    let worker = {
        let interpreter = Arc::clone(&interpreter);
        let grid = grid.clone();
        thread::spawn(move || interpreter.interpret(&grid, Vec::new(), std::io::empty()))
    };

    loop {
        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("event from the first run");
        if event == Event::StateChanged(ExecutionState::Idle) {
            break;
        }
    }

    let second = interpreter
        .interpret(&grid, Vec::new(), std::io::empty())
        .expect("second run is accepted");
    assert_eq!(second.stack, vec![1]);
    let first = worker
        .join()
        .expect("worker thread")
        .expect("run without fault");
    assert_eq!(first.reason, HaltReason::WhiteTrap);
}
