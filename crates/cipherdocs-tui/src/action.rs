/// Everything the user (or the clock) can ask the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ForceQuit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    /// Enter: open directory / choose file / confirm.
    DrillIn,
    /// Esc: go back / cancel / dismiss.
    NavigateBack,
    /// Text delivered by bracketed paste (a dropped file shows up this way).
    Paste(String),
    ClickAt(u16, u16),
    /// Mouse dragged to (column, row) with the left button held.
    DragAt(u16, u16),
    /// Left button released.
    DragEnd,
    Copy,
    Download,
    NewFile,
    ToggleHelp,
    Resize(u16, u16),
    Tick,
    None,
}
