// End-to-end programs run through the public interpreter API
//
// Every program ends in a two-codel white strip on the right edge: the slide
// runs into the edge, turns back, and stops on its own trace.

use pietty::grid::color::Color;
use pietty::grid::{Cell, Grid, Position};
use pietty::interpreter::cursor::{Chooser, Direction};
use pietty::interpreter::engine::{DebugSettings, HaltReason, Interpreter, Termination};
use pietty::interpreter::errors::{Failure, Fault};
use pietty::interpreter::events::Event;
use pietty::interpreter::operation::Operation;
use pietty::memory::RollError;
use pietty::snapshot::Recorder;
use std::time::Duration;

fn run(source: &str, input: &str) -> (Termination, String) {
    let grid: Grid = source.parse().expect("valid program");
    let mut output = Vec::new();
    let termination = Interpreter::new()
        .interpret(&grid, &mut output, input.as_bytes())
        .expect("run without fault");
    (termination, String::from_utf8(output).expect("utf-8 output"))
}

fn run_recorded(source: &str, input: &str) -> (Termination, String, Vec<Event>) {
    let grid: Grid = source.parse().expect("valid program");
    let recorder = Recorder::new();
    let settings = DebugSettings {
        step_delay: Duration::ZERO,
        start_paused: false,
    };
    let interpreter = Interpreter::debug(settings, recorder.clone());
    let mut output = Vec::new();
    let termination = interpreter
        .interpret(&grid, &mut output, input.as_bytes())
        .expect("run without fault");
    (
        termination,
        String::from_utf8(output).expect("utf-8 output"),
        recorder.events(),
    )
}

fn failures(events: &[Event]) -> Vec<(Operation, Failure)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::OperationFailed { operation, failure } => Some((*operation, *failure)),
            _ => None,
        })
        .collect()
}

fn operations(events: &[Event]) -> Vec<Operation> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::OperationSelected { operation, .. } => Some(*operation),
            _ => None,
        })
        .collect()
}

#[test]
fn test_single_white_codel() {
    let (result, output) = run("W", "");
    assert_eq!(result.reason, HaltReason::WhiteTrap);
    assert_eq!(result.operations, 0);
    assert!(result.stack.is_empty());
    assert!(output.is_empty());
}

#[test]
fn test_push_region_size() {
    let (result, _) = run("lR R W W", "");
    assert_eq!(result.stack, vec![1]);

    let (result, _) = run("lR lR lR R W W", "");
    assert_eq!(result.stack, vec![3]);
}

#[test]
fn test_add_on_empty_stack_is_skipped() {
    let (result, _, events) = run_recorded("R R R R R Y W W", "");
    assert_eq!(result.operations, 2);
    assert!(result.stack.is_empty());
    assert_eq!(
        failures(&events),
        vec![(
            Operation::Add,
            Failure::StackUnderflow {
                required: 2,
                available: 0
            }
        )]
    );
}

#[test]
fn test_divide_then_out_number() {
    // push 5, push 3, divide, out_number
    let (result, output, events) = run_recorded("lR lR lR lR lR R R R dR dG lY W W", "");
    assert_eq!(
        operations(&events),
        vec![
            Operation::Push,
            Operation::Push,
            Operation::Divide,
            Operation::OutNumber,
            Operation::Nop
        ]
    );
    assert_eq!(output, "1");
    assert!(result.stack.is_empty());
    assert!(failures(&events).is_empty());
}

#[test]
fn test_stack_changes_are_reported() {
    let (_, _, events) = run_recorded("lR lR lR lR lR R R R dR dG lY W W", "");
    let stacks: Vec<Vec<i64>> = events
        .iter()
        .filter_map(|e| match e {
            Event::StackChanged(stack) => Some(stack.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(stacks, vec![vec![5], vec![5, 3], vec![1], vec![]]);
}

#[test]
fn test_pointer_two_turns_right_into_left() {
    // push 2, pointer; the reversed cursor leaves the tall region through its
    // bottom-left codel into a walled-in white strip
    let source = "lR lR R dC\n\
                  K  K  K dC\n\
                  K  W  W dC";
    let (result, _, events) = run_recorded(source, "");
    assert_eq!(
        operations(&events),
        vec![Operation::Push, Operation::Pointer, Operation::Nop]
    );
    let first_turn = events.iter().find_map(|e| match e {
        Event::DirectionChanged(dp) => Some(*dp),
        _ => None,
    });
    assert_eq!(first_turn, Some(Direction::Left));
    assert!(result.stack.is_empty());
    assert_eq!(result.reason, HaltReason::WhiteTrap);
}

#[test]
fn test_duplicate_then_multiply() {
    // push 3, duplicate, multiply
    let (result, _, events) = run_recorded("lR lR lR R B lM W W", "");
    assert_eq!(
        operations(&events),
        vec![
            Operation::Push,
            Operation::Duplicate,
            Operation::Multiply,
            Operation::Nop
        ]
    );
    assert_eq!(result.stack, vec![9]);
}

#[test]
fn test_switch_on_odd_value_toggles_chooser() {
    // push 1, switch
    let (result, _, events) = run_recorded("lR R lC W W", "");
    assert_eq!(
        operations(&events),
        vec![Operation::Push, Operation::Switch, Operation::Nop]
    );
    let first_toggle = events.iter().find_map(|e| match e {
        Event::ChooserChanged(cc) => Some(*cc),
        _ => None,
    });
    assert_eq!(first_toggle, Some(Chooser::Right));
    assert!(result.stack.is_empty());
}

#[test]
fn test_negative_switch_and_pointer() {
    // push 1, push 2, subtract, duplicate, switch, pointer
    let (result, _, events) = run_recorded("lR R R dR lY lM dG lM W W", "");
    assert_eq!(
        operations(&events),
        vec![
            Operation::Push,
            Operation::Push,
            Operation::Subtract,
            Operation::Duplicate,
            Operation::Switch,
            Operation::Pointer,
            Operation::Nop
        ]
    );
    let stacks: Vec<Vec<i64>> = events
        .iter()
        .filter_map(|e| match e {
            Event::StackChanged(stack) => Some(stack.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        stacks,
        vec![vec![1], vec![1, 2], vec![-1], vec![-1, -1], vec![-1], vec![]]
    );

    // -1 is odd, so switch toggles; pointer turns one step counter-clockwise
    let first_toggle = events.iter().find_map(|e| match e {
        Event::ChooserChanged(cc) => Some(*cc),
        _ => None,
    });
    assert_eq!(first_toggle, Some(Chooser::Right));
    let first_turn = events.iter().find_map(|e| match e {
        Event::DirectionChanged(dp) => Some(*dp),
        _ => None,
    });
    assert_eq!(first_turn, Some(Direction::Up));
    assert!(result.stack.is_empty());
    assert_eq!(result.reason, HaltReason::WhiteTrap);
}

#[test]
fn test_snapshot_follows_white_slide() {
    let grid: Grid = "lR R W W".parse().expect("valid program");
    let recorder = Recorder::new();
    let settings = DebugSettings {
        step_delay: Duration::ZERO,
        start_paused: false,
    };
    let result = Interpreter::debug(settings, recorder.clone())
        .interpret(&grid, Vec::new(), std::io::empty())
        .expect("run without fault");
    assert_eq!(result.cursor.position, Position::new(3, 0));

    let moves: Vec<Position> = recorder
        .events()
        .iter()
        .filter_map(|e| match e {
            Event::Moved(position) => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(moves, vec![Position::new(2, 0), Position::new(3, 0)]);

    let snapshot = recorder.snapshot();
    assert_eq!(snapshot.position, result.cursor.position);
    assert_eq!(snapshot.region, None);
}

#[test]
fn test_division_by_zero_is_skipped() {
    // push 2, push 1, not, divide
    let (result, _, events) = run_recorded("lR lR R dR G B W W", "");
    assert_eq!(result.stack, vec![2, 0]);
    assert_eq!(
        failures(&events),
        vec![(Operation::Divide, Failure::DivisionByZero)]
    );

    // push 2, push 1, not, mod
    let (result, _, events) = run_recorded("lR lR R dR G dB W W", "");
    assert_eq!(result.stack, vec![2, 0]);
    assert_eq!(failures(&events), vec![(Operation::Mod, Failure::DivisionByZero)]);
}

#[test]
fn test_roll_with_negative_depth_leaves_stack() {
    // push 1, push 2, subtract, push 1, roll
    let (result, _, events) = run_recorded("lR R R dR lY Y dM W W", "");
    assert_eq!(result.stack, vec![-1, 1]);
    assert_eq!(
        failures(&events),
        vec![(Operation::Roll, Failure::InvalidRoll(RollError::NegativeDepth(-1)))]
    );
}

#[test]
fn test_roll_deeper_than_stack_leaves_stack() {
    // push 2, push 1, roll
    let (result, _, events) = run_recorded("lR lR R dR lB W W", "");
    assert_eq!(result.stack, vec![2, 1]);
    assert_eq!(
        failures(&events),
        vec![(
            Operation::Roll,
            Failure::InvalidRoll(RollError::TooDeep {
                depth: 2,
                available: 0
            })
        )]
    );
}

#[test]
fn test_char_echo() {
    // in_char, out_char
    let (result, output) = run("lR lM dB W W", "é");
    assert_eq!(output, "é");
    assert!(result.stack.is_empty());
}

#[test]
fn test_number_echo() {
    // in_number, out_number
    let (_, output) = run("lR dB lC W W", "  -42\n");
    assert_eq!(output, "-42");
}

#[test]
fn test_input_exhausted_is_skipped() {
    let (result, output, events) = run_recorded("lR lM dB W W", "");
    assert!(output.is_empty());
    assert!(result.stack.is_empty());
    assert_eq!(
        failures(&events),
        vec![
            (Operation::InChar, Failure::InputExhausted),
            (
                Operation::OutChar,
                Failure::StackUnderflow {
                    required: 1,
                    available: 0
                }
            )
        ]
    );
}

#[test]
fn test_malformed_number_is_skipped() {
    let (result, _, events) = run_recorded("lR dB lC W W", "abc");
    assert!(result.stack.is_empty());
    assert_eq!(
        failures(&events)[0],
        (Operation::InNumber, Failure::MalformedInput)
    );
}

#[test]
fn test_region_entered_precedes_operation() {
    let (_, _, events) = run_recorded("lR lR R W W", "");
    let entered = events.iter().position(|e| {
        matches!(e, Event::RegionEntered { position, size: 1, .. } if *position == Position::new(2, 0))
    });
    let selected = events
        .iter()
        .position(|e| matches!(e, Event::OperationSelected { operation: Operation::Push, .. }));
    assert!(entered.is_some());
    assert!(entered < selected);
}

#[test]
fn test_corrupt_grid_is_rejected() {
    let cells = vec![
        Cell::new(Position::new(1, 0), Color::White),
        Cell::new(Position::new(0, 0), Color::White),
    ];
    let grid = Grid::from_cells(2, 1, cells).expect("cell count matches");
    let result = Interpreter::new().interpret(&grid, Vec::new(), std::io::empty());
    match result {
        Err(Fault::CorruptGrid { slot, stored }) => {
            assert_eq!(slot, Position::new(0, 0));
            assert_eq!(stored, Position::new(1, 0));
        }
        other => panic!("expected a corrupt grid fault, got {:?}", other),
    }
}

#[test]
fn test_interpreter_is_reusable() {
    let grid: Grid = "lR R W W".parse().expect("valid program");
    let interpreter = Interpreter::new();
    for _ in 0..3 {
        let result = interpreter
            .interpret(&grid, Vec::new(), std::io::empty())
            .expect("run without fault");
        assert_eq!(result.stack, vec![1]);
    }
}
