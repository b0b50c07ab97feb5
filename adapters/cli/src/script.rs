//! Text scripts that stand in for keyboard input in headless runs.
//!
//! A script is a whitespace separated list of steps. Each step names one or
//! more actions joined by `+` and may repeat for several frames with `*n`:
//! `forward*30 forward+left*10 slow idle*5 quit`.

use maze_runner_core::FrameInput;
use thiserror::Error;

/// Errors raised while parsing a script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The step named an action that does not exist.
    #[error("unknown action `{action}` in step `{step}`")]
    UnknownAction {
        /// Offending action name.
        action: String,
        /// Step containing the action.
        step: String,
    },
    /// The repeat count was not a positive integer.
    #[error("invalid repeat count in step `{step}`")]
    InvalidRepeat {
        /// Step containing the repeat count.
        step: String,
    },
}

/// Expands a script into one input record per frame.
pub(crate) fn parse(text: &str) -> Result<Vec<FrameInput>, ScriptError> {
    let mut frames = Vec::new();
    for step in text.split_whitespace() {
        let (actions, repeat) = match step.split_once('*') {
            Some((actions, count)) => {
                let count = count
                    .parse::<usize>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| ScriptError::InvalidRepeat {
                        step: step.to_owned(),
                    })?;
                (actions, count)
            }
            None => (step, 1),
        };

        let mut input = FrameInput::default();
        for action in actions.split('+') {
            apply_action(&mut input, action).ok_or_else(|| ScriptError::UnknownAction {
                action: action.to_owned(),
                step: step.to_owned(),
            })?;
        }
        frames.extend(std::iter::repeat(input).take(repeat));
    }
    Ok(frames)
}

fn apply_action(input: &mut FrameInput, action: &str) -> Option<()> {
    match action.to_ascii_lowercase().as_str() {
        "forward" => input.intent.move_forward = true,
        "backward" => input.intent.move_backward = true,
        "left" => input.intent.turn_left = true,
        "right" => input.intent.turn_right = true,
        "idle" => {}
        "reset" => input.reset = true,
        "regenerate" => input.regenerate = true,
        "slow" => input.toggle_slow_walk = true,
        "minimap" => input.toggle_minimap = true,
        "icons" => input.toggle_icons = true,
        "legend" => input.toggle_legend = true,
        "quit" => input.quit = true,
        _ => return None,
    }
    Some(())
}
