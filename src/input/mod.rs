// Input module - Calculator keyboard and joypad mapping
//
// This module provides:
// - Calculator key set and keyboard snapshots
// - Keyboard scan primitive (trait)
// - Input Mapper (keys to joypad lines and shell commands)
// - TOML key map configuration
// - Host keyboard (winit) and gamepad (gilrs) sources

pub mod config;
pub mod gamepad;
pub mod keyboard;
pub mod mapper;

pub use config::KeyMapConfig;
pub use gamepad::GamepadHandler;
pub use keyboard::KeyboardHandler;
pub use mapper::{Commands, FrameInput, InputMapper, KeyMap};

macro_rules! calculator_keys {
    ($($key:ident => $name:literal,)*) => {
        /// A key of the calculator keyboard
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Key {
            $($key,)*
        }

        impl Key {
            /// Every key, in keyboard order
            pub const ALL: &'static [Key] = &[$(Key::$key,)*];

            /// Name used in configuration files
            pub fn name(self) -> &'static str {
                match self {
                    $(Key::$key => $name,)*
                }
            }

            /// Parse a configuration name
            pub fn from_name(name: &str) -> Result<Key, String> {
                match name {
                    $($name => Ok(Key::$key),)*
                    _ => Err(format!("Unknown key: {}", name)),
                }
            }
        }
    };
}

calculator_keys! {
    Left => "Left",
    Up => "Up",
    Down => "Down",
    Right => "Right",
    Ok => "OK",
    Back => "Back",
    Home => "Home",
    OnOff => "OnOff",
    Shift => "Shift",
    Alpha => "Alpha",
    Xnt => "XNT",
    Var => "Var",
    Toolbox => "Toolbox",
    Backspace => "Backspace",
    Exp => "Exp",
    Ln => "Ln",
    Log => "Log",
    Imaginary => "Imaginary",
    Comma => "Comma",
    Power => "Power",
    Sine => "Sine",
    Cosine => "Cosine",
    Tangent => "Tangent",
    Pi => "Pi",
    Sqrt => "Sqrt",
    Square => "Square",
    Seven => "Seven",
    Eight => "Eight",
    Nine => "Nine",
    LeftParenthesis => "LeftParenthesis",
    RightParenthesis => "RightParenthesis",
    Four => "Four",
    Five => "Five",
    Six => "Six",
    Multiplication => "Multiplication",
    Division => "Division",
    One => "One",
    Two => "Two",
    Three => "Three",
    Plus => "Plus",
    Minus => "Minus",
    Zero => "Zero",
    Dot => "Dot",
    Ee => "EE",
    Ans => "Ans",
    Exe => "EXE",
}

impl Key {
    fn bit(self) -> u64 {
        1 << (self as u8)
    }
}

/// Snapshot of the keys held during one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardState(u64);

impl KeyboardState {
    /// No key held
    pub const EMPTY: KeyboardState = KeyboardState(0);

    pub fn from_keys<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        let mut state = Self::EMPTY;
        for key in keys {
            state.press(key);
        }
        state
    }

    pub fn is_down(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn press(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for KeyboardState {
    type Output = KeyboardState;

    fn bitor(self, rhs: KeyboardState) -> KeyboardState {
        KeyboardState(self.0 | rhs.0)
    }
}

/// Keyboard scan primitive
pub trait Keyboard {
    /// Snapshot of the keys currently held
    fn scan(&mut self) -> KeyboardState;
}
