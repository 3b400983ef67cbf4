/// Keys the runtime reports by name.
///
/// Anything else arrives as `Other` with the platform key code, or 0 when the
/// platform has no code for it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Home,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    W,
    A,
    S,
    D,

    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Press or release of a key or mouse button.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Window input, independent of the windowing backend.
///
/// Pointer coordinates are logical pixels from the window's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: ButtonState,
        /// Auto-repeat while held.
        repeat: bool,
    },
    PointerMoved {
        x: f32,
        y: f32,
    },
    /// Button change at the last known pointer position.
    PointerButton {
        button: MouseButton,
        state: ButtonState,
        x: f32,
        y: f32,
    },
    PointerLeft,
    Focused(bool),
}
