use core_types::{ConfirmationInput, ConfirmationState};

/// Two-step confirmation gate in front of any destructive action.
///
/// A plain yes/no dialog is not enough for an operation that can destroy the
/// wrong folder; the second step requires the user to type the project folder
/// name exactly. Typed text is trimmed of surrounding whitespace and compared
/// case-sensitively with no further normalization.
#[derive(Debug, Clone)]
pub struct ConfirmationFlow {
    expected: String,
    state: ConfirmationState,
}

impl ConfirmationFlow {
    pub fn new(expected_folder_name: impl Into<String>) -> Self {
        Self {
            expected: expected_folder_name.into(),
            state: ConfirmationState::Idle,
        }
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    /// Feed one input event; returns an optional explanatory message.
    ///
    /// Inputs that are meaningless in the current state are ignored, they
    /// neither advance nor cancel the flow.
    pub fn handle(&mut self, input: ConfirmationInput) -> Option<String> {
        let (next, message) = transition(self.state, input, &self.expected);
        self.state = next;
        message
    }

    /// Drive the machine over a sequence of inputs, stopping at the first
    /// terminal state. Running out of inputs before a terminal state leaves
    /// the machine where it stands; callers treat anything other than
    /// `Confirmed` as a cancellation.
    pub fn run(mut self, inputs: impl IntoIterator<Item = ConfirmationInput>) -> ConfirmationState {
        for input in inputs {
            if self.state.is_terminal() {
                break;
            }
            self.handle(input);
        }
        self.state
    }
}

fn transition(
    state: ConfirmationState,
    input: ConfirmationInput,
    expected: &str,
) -> (ConfirmationState, Option<String>) {
    match (state, input) {
        (ConfirmationState::Idle, ConfirmationInput::Proceed) => (
            ConfirmationState::AwaitingTypedConfirmation,
            Some(format!(
                "Type the project folder name to confirm: {}",
                expected
            )),
        ),
        (ConfirmationState::Idle, ConfirmationInput::Cancel) => (
            ConfirmationState::Cancelled,
            Some("Uninstall cancelled.".to_string()),
        ),
        (ConfirmationState::AwaitingTypedConfirmation, ConfirmationInput::TypedText(typed)) => {
            if typed.trim() == expected {
                (ConfirmationState::Confirmed, None)
            } else {
                (
                    ConfirmationState::Cancelled,
                    Some("Confirmation did not match. Uninstall cancelled.".to_string()),
                )
            }
        }
        (ConfirmationState::AwaitingTypedConfirmation, ConfirmationInput::Cancel) => (
            ConfirmationState::Cancelled,
            Some("Uninstall cancelled.".to_string()),
        ),
        // TypedText outside the awaiting state, Proceed while awaiting, and
        // anything after a terminal state are ignored.
        (state, _) => (state, None),
    }
}
