/// All possible semantic keyboard actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Board view
    ScrollLeft,
    ScrollRight,
    CancelDrag,
    ShowHelp,
    ClosePanel,
    Quit,

    // Editing a field
    InputChar(char),
    InputBackspace,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,
    InputDeleteWord,
    InputLineBreak,
    InputSoftSubmit,
    InputCancel,

    // No-op
    None,
}
