#![forbid(unsafe_code)]

//! Timed input scripts: `T@ACTION[,T@ACTION...]`.
//!
//! `T` is milliseconds since mount. Actions:
//!
//! | Action        | Effect                         |
//! |---------------|--------------------------------|
//! | `right`       | right arrow click              |
//! | `left`        | left arrow click               |
//! | `index:D`     | click on indicator `D` (1-based) |
//! | `wheel:DELTA` | wheel event with vertical delta |
//! | `enter`       | pointer enters the widget      |
//! | `leave`       | pointer leaves the widget      |

use core::fmt;
use core::time::Duration;

use scrollpic_core::carousel::Carousel;
use scrollpic_core::dom::Dom;
use scrollpic_core::error::CarouselError;
use scrollpic_core::scheduler::Scheduler;
use scrollpic_core::track::Direction;
use serde::Serialize;

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Arrow { direction: Direction },
    Index { display: usize },
    Wheel { delta: f64 },
    Enter,
    Leave,
}

impl Action {
    /// Feed the action to a carousel.
    pub fn apply<D: Dom, S: Scheduler>(
        &self,
        carousel: &mut Carousel<D, S>,
    ) -> Result<(), CarouselError> {
        match *self {
            Self::Arrow { direction } => carousel.click_arrow(direction),
            Self::Index { display } => carousel.click_index(display),
            Self::Wheel { delta } => carousel.wheel(delta),
            Self::Enter => carousel.pointer_enter(),
            Self::Leave => carousel.pointer_leave(),
        }
    }
}

/// An action and the virtual time it fires at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub at: Duration,
    pub action: Action,
}

/// Why a script entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    entry: String,
    reason: &'static str,
}

impl ScriptError {
    fn new(entry: &str, reason: &'static str) -> Self {
        Self {
            entry: entry.to_string(),
            reason,
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad script entry `{}`: {}", self.entry, self.reason)
    }
}

impl std::error::Error for ScriptError {}

fn parse_action(entry: &str, text: &str) -> Result<Action, ScriptError> {
    let (name, arg) = match text.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (text, None),
    };
    match (name, arg) {
        ("right", None) => Ok(Action::Arrow { direction: Direction::Right }),
        ("left", None) => Ok(Action::Arrow { direction: Direction::Left }),
        ("enter", None) => Ok(Action::Enter),
        ("leave", None) => Ok(Action::Leave),
        ("index", Some(arg)) => match arg.parse::<usize>() {
            Ok(display) if display > 0 => Ok(Action::Index { display }),
            _ => Err(ScriptError::new(entry, "index needs a positive integer")),
        },
        ("wheel", Some(arg)) => match arg.parse::<f64>() {
            Ok(delta) if delta.is_finite() => Ok(Action::Wheel { delta }),
            _ => Err(ScriptError::new(entry, "wheel needs a number")),
        },
        ("right" | "left" | "enter" | "leave", Some(_)) => {
            Err(ScriptError::new(entry, "action takes no argument"))
        }
        _ => Err(ScriptError::new(entry, "unknown action")),
    }
}

/// Parse a comma-separated script. Steps come back ordered by time; entries
/// sharing a time keep their written order.
pub fn parse(script: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for entry in script.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (at, action) = entry
            .split_once('@')
            .ok_or_else(|| ScriptError::new(entry, "expected T@ACTION"))?;
        let at = at
            .trim()
            .parse::<u64>()
            .map_err(|_| ScriptError::new(entry, "time must be whole milliseconds"))?;
        steps.push(Step {
            at: Duration::from_millis(at),
            action: parse_action(entry, action.trim())?,
        });
    }
    steps.sort_by_key(|s| s.at);
    Ok(steps)
}
