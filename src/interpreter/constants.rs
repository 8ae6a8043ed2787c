// Constants for the interpreter

use std::time::Duration;

/// Exit attempts from a colored region before the program halts
/// (every direction pointer with both chooser settings)
pub const EXIT_ATTEMPTS: usize = 8;

/// Directions tried from a white codel before it counts as a trap
pub const WHITE_SLIDE_ATTEMPTS: usize = 4;

/// Default pause before each iteration in debug mode
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(250);
