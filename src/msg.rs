/// All possible messages that drive state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    // -- Input
    Command(String),
    InputClosed,

    // -- Tools
    CloseAllTools,
}
