//! The GUI-automation boundary.
//!
//! The interpreter core never synthesizes input itself; every executor
//! receives an [`Actuator`] capability and calls through it. Hosts
//! supply a platform backend; this crate ships [`NullActuator`], a
//! stateful no-op implementation useful for smoke runs, and
//! [`crate::testing::RecordingActuator`] for tests.

use std::path::PathBuf;

use thiserror::Error;

use crate::os::OsFamily;

/// Pointer coordinates, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// A rectangular screen region for capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One sampled pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// The packed 24-bit `0xRRGGBB` word.
    pub fn word(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// A failure raised inside an actuator backend.
///
/// `UserIsActive` is the safe-mode abort: the user moved the mouse while
/// a script was driving it. It is a runtime condition for the host, not
/// a parse diagnostic, and no rollback of earlier effects is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuatorError {
    #[error("User is active; control was taken back from the script")]
    UserIsActive,
    #[error("{0}")]
    Backend(String),
}

/// The capability object executors drive.
///
/// Mouse buttons and key codes are backend-defined integers; delays are
/// milliseconds. All methods are synchronous and non-cancellable from
/// the interpreter's point of view.
pub trait Actuator {
    // Pointer and screen queries
    fn coords(&mut self) -> Result<Point, ActuatorError>;
    fn screen_size(&mut self) -> Result<Size, ActuatorError>;
    fn pixel(&mut self, x: i32, y: i32) -> Result<Rgb, ActuatorError>;

    /// Capture `region` (or the whole screen) and save it; returns the
    /// path written.
    fn print_screen(&mut self, region: Option<Region>) -> Result<PathBuf, ActuatorError>;

    // Mouse
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), ActuatorError>;
    fn click(&mut self, button: i32) -> Result<(), ActuatorError>;
    fn double_click(&mut self, button: i32) -> Result<(), ActuatorError>;
    fn press_button(&mut self, button: i32) -> Result<(), ActuatorError>;
    fn release_button(&mut self, button: i32) -> Result<(), ActuatorError>;
    fn release_buttons(&mut self) -> Result<(), ActuatorError>;
    fn roll_buttons(&mut self, buttons: &[i32]) -> Result<(), ActuatorError>;
    fn wheel(&mut self, amount: i32) -> Result<(), ActuatorError>;

    // Keyboard
    fn type_key(&mut self, key: i32) -> Result<(), ActuatorError>;
    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError>;
    fn type_text_unsurely(&mut self, text: &str) -> Result<(), ActuatorError>;
    fn press_key(&mut self, key: i32) -> Result<(), ActuatorError>;
    fn release_key(&mut self, key: i32) -> Result<(), ActuatorError>;
    fn release_keys(&mut self) -> Result<(), ActuatorError>;
    fn roll_keys(&mut self, keys: &[i32]) -> Result<(), ActuatorError>;
    fn enter(&mut self) -> Result<(), ActuatorError>;

    // Clipboard
    fn copy(&mut self, text: &str) -> Result<(), ActuatorError>;
    fn paste(&mut self) -> Result<(), ActuatorError>;

    // Timing
    fn delay(&mut self, millis: i32) -> Result<(), ActuatorError>;
    fn wait_for_idle(&mut self) -> Result<(), ActuatorError>;

    // Modes and pressed-state bookkeeping
    fn begin_fast_mode(&mut self) -> Result<(), ActuatorError>;
    fn end_fast_mode(&mut self) -> Result<(), ActuatorError>;
    fn begin_safe_mode(&mut self) -> Result<(), ActuatorError>;
    fn end_safe_mode(&mut self) -> Result<(), ActuatorError>;
    fn stash(&mut self) -> Result<(), ActuatorError>;
    fn unstash(&mut self) -> Result<(), ActuatorError>;
    fn release_pressed(&mut self) -> Result<(), ActuatorError>;
    fn clear_pressed_buttons(&mut self) -> Result<(), ActuatorError>;
    fn clear_pressed_keys(&mut self) -> Result<(), ActuatorError>;
    fn beep(&mut self) -> Result<(), ActuatorError>;

    // Automation parameters
    fn default_button(&self) -> i32;
    fn left_button(&self) -> i32;
    fn middle_button(&self) -> i32;
    fn right_button(&self) -> i32;
    fn auto_delay(&self) -> i32;
    fn is_auto_delay(&self) -> bool;
    fn fast_delay(&self) -> i32;
    fn long_delay(&self) -> i32;
    fn short_delay(&self) -> i32;
    fn is_auto_wait_for_idle(&self) -> bool;
    fn is_release_mode(&self) -> bool;
    fn is_safe_mode(&self) -> bool;
    fn os_family(&self) -> OsFamily;
    fn set_auto_delay_ms(&mut self, millis: i32) -> Result<(), ActuatorError>;
    fn set_auto_delay(&mut self, enabled: bool) -> Result<(), ActuatorError>;
    fn set_auto_wait_for_idle(&mut self, enabled: bool) -> Result<(), ActuatorError>;
    fn set_fast_delay(&mut self, millis: i32) -> Result<(), ActuatorError>;
    fn set_long_delay(&mut self, millis: i32) -> Result<(), ActuatorError>;
    fn set_short_delay(&mut self, millis: i32) -> Result<(), ActuatorError>;
    fn set_os_family(&mut self, family: OsFamily) -> Result<(), ActuatorError>;
    fn set_release_mode(&mut self, enabled: bool) -> Result<(), ActuatorError>;
}

pub const DEFAULT_FAST_DELAY: i32 = 44;
pub const DEFAULT_SHORT_DELAY: i32 = 110;
pub const DEFAULT_LONG_DELAY: i32 = 1100;
pub const DEFAULT_AUTO_DELAY: i32 = DEFAULT_SHORT_DELAY;

/// A saved-state record for `stash`/`unstash` and fast mode: an explicit
/// stack entry, owned by the actuator.
#[derive(Debug, Clone, Copy)]
struct Stash {
    auto_delay: i32,
}

/// A stateful no-op backend.
///
/// Parameter bookkeeping (delays, modes, pressed lists, the stash stack)
/// is real; pointer, keyboard, and clipboard synthesis does nothing.
/// Screen capture is unsupported and reports a backend error.
#[derive(Debug)]
pub struct NullActuator {
    auto_delay: i32,
    is_auto_delay: bool,
    auto_wait_for_idle: bool,
    fast_delay: i32,
    long_delay: i32,
    short_delay: i32,
    default_button: i32,
    left_button: i32,
    middle_button: i32,
    right_button: i32,
    os_family: OsFamily,
    release_mode: bool,
    safe_mode: bool,
    pressed_buttons: Vec<i32>,
    pressed_keys: Vec<i32>,
    stashes: Vec<Stash>,
}

impl NullActuator {
    pub fn new() -> Self {
        Self {
            auto_delay: DEFAULT_AUTO_DELAY,
            is_auto_delay: true,
            auto_wait_for_idle: false,
            fast_delay: DEFAULT_FAST_DELAY,
            long_delay: DEFAULT_LONG_DELAY,
            short_delay: DEFAULT_SHORT_DELAY,
            default_button: 1,
            left_button: 1,
            middle_button: 2,
            right_button: 3,
            os_family: OsFamily::current(),
            release_mode: true,
            safe_mode: false,
            pressed_buttons: Vec::new(),
            pressed_keys: Vec::new(),
            stashes: Vec::new(),
        }
    }
}

impl Default for NullActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl Actuator for NullActuator {
    fn coords(&mut self) -> Result<Point, ActuatorError> {
        Ok(Point { x: 0, y: 0 })
    }

    fn screen_size(&mut self) -> Result<Size, ActuatorError> {
        Ok(Size {
            width: 0,
            height: 0,
        })
    }

    fn pixel(&mut self, _x: i32, _y: i32) -> Result<Rgb, ActuatorError> {
        Ok(Rgb { r: 0, g: 0, b: 0 })
    }

    fn print_screen(&mut self, _region: Option<Region>) -> Result<PathBuf, ActuatorError> {
        Err(ActuatorError::Backend(
            "Screen capture is not supported by the null actuator".into(),
        ))
    }

    fn move_to(&mut self, _x: i32, _y: i32) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn click(&mut self, _button: i32) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn double_click(&mut self, button: i32) -> Result<(), ActuatorError> {
        self.click(button)?;
        self.click(button)
    }

    fn press_button(&mut self, button: i32) -> Result<(), ActuatorError> {
        if self.release_mode {
            self.pressed_buttons.push(button);
        }
        Ok(())
    }

    fn release_button(&mut self, button: i32) -> Result<(), ActuatorError> {
        if let Some(i) = self.pressed_buttons.iter().rposition(|&b| b == button) {
            self.pressed_buttons.remove(i);
        }
        Ok(())
    }

    fn release_buttons(&mut self) -> Result<(), ActuatorError> {
        self.pressed_buttons.clear();
        Ok(())
    }

    fn roll_buttons(&mut self, buttons: &[i32]) -> Result<(), ActuatorError> {
        for &button in buttons {
            self.press_button(button)?;
        }
        for &button in buttons.iter().rev() {
            self.release_button(button)?;
        }
        Ok(())
    }

    fn wheel(&mut self, _amount: i32) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn type_key(&mut self, _key: i32) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn type_text(&mut self, _text: &str) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn type_text_unsurely(&mut self, _text: &str) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn press_key(&mut self, key: i32) -> Result<(), ActuatorError> {
        if self.release_mode {
            self.pressed_keys.push(key);
        }
        Ok(())
    }

    fn release_key(&mut self, key: i32) -> Result<(), ActuatorError> {
        if let Some(i) = self.pressed_keys.iter().rposition(|&k| k == key) {
            self.pressed_keys.remove(i);
        }
        Ok(())
    }

    fn release_keys(&mut self) -> Result<(), ActuatorError> {
        self.pressed_keys.clear();
        Ok(())
    }

    fn roll_keys(&mut self, keys: &[i32]) -> Result<(), ActuatorError> {
        for &key in keys {
            self.press_key(key)?;
        }
        for &key in keys.iter().rev() {
            self.release_key(key)?;
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn copy(&mut self, _text: &str) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn paste(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn delay(&mut self, _millis: i32) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn wait_for_idle(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn begin_fast_mode(&mut self) -> Result<(), ActuatorError> {
        self.stash()?;
        self.set_auto_delay_ms(self.fast_delay)
    }

    fn end_fast_mode(&mut self) -> Result<(), ActuatorError> {
        self.unstash()
    }

    fn begin_safe_mode(&mut self) -> Result<(), ActuatorError> {
        self.safe_mode = true;
        Ok(())
    }

    fn end_safe_mode(&mut self) -> Result<(), ActuatorError> {
        self.safe_mode = false;
        Ok(())
    }

    fn stash(&mut self) -> Result<(), ActuatorError> {
        self.stashes.push(Stash {
            auto_delay: self.auto_delay,
        });
        Ok(())
    }

    fn unstash(&mut self) -> Result<(), ActuatorError> {
        if let Some(stash) = self.stashes.pop() {
            self.set_auto_delay_ms(stash.auto_delay)?;
        }
        Ok(())
    }

    fn release_pressed(&mut self) -> Result<(), ActuatorError> {
        self.release_buttons()?;
        self.release_keys()
    }

    fn clear_pressed_buttons(&mut self) -> Result<(), ActuatorError> {
        self.pressed_buttons.clear();
        Ok(())
    }

    fn clear_pressed_keys(&mut self) -> Result<(), ActuatorError> {
        self.pressed_keys.clear();
        Ok(())
    }

    fn beep(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn default_button(&self) -> i32 {
        self.default_button
    }

    fn left_button(&self) -> i32 {
        self.left_button
    }

    fn middle_button(&self) -> i32 {
        self.middle_button
    }

    fn right_button(&self) -> i32 {
        self.right_button
    }

    fn auto_delay(&self) -> i32 {
        self.auto_delay
    }

    fn is_auto_delay(&self) -> bool {
        self.is_auto_delay
    }

    fn fast_delay(&self) -> i32 {
        self.fast_delay
    }

    fn long_delay(&self) -> i32 {
        self.long_delay
    }

    fn short_delay(&self) -> i32 {
        self.short_delay
    }

    fn is_auto_wait_for_idle(&self) -> bool {
        self.auto_wait_for_idle
    }

    fn is_release_mode(&self) -> bool {
        self.release_mode
    }

    fn is_safe_mode(&self) -> bool {
        self.safe_mode
    }

    fn os_family(&self) -> OsFamily {
        self.os_family
    }

    fn set_auto_delay_ms(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.auto_delay = millis;
        self.is_auto_delay = millis > 0;
        Ok(())
    }

    fn set_auto_delay(&mut self, enabled: bool) -> Result<(), ActuatorError> {
        self.is_auto_delay = enabled && self.short_delay > 0;
        self.auto_delay = if enabled { self.short_delay } else { 0 };
        Ok(())
    }

    fn set_auto_wait_for_idle(&mut self, enabled: bool) -> Result<(), ActuatorError> {
        self.auto_wait_for_idle = enabled;
        Ok(())
    }

    fn set_fast_delay(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.fast_delay = millis;
        Ok(())
    }

    fn set_long_delay(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.long_delay = millis;
        Ok(())
    }

    fn set_short_delay(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.short_delay = millis;
        Ok(())
    }

    fn set_os_family(&mut self, family: OsFamily) -> Result<(), ActuatorError> {
        self.os_family = family;
        Ok(())
    }

    fn set_release_mode(&mut self, enabled: bool) -> Result<(), ActuatorError> {
        self.release_mode = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_word() {
        let px = Rgb {
            r: 0x12,
            g: 0x34,
            b: 0x56,
        };
        assert_eq!(px.word(), 0x123456);
    }

    #[test]
    fn test_fast_mode_restores_auto_delay() {
        let mut act = NullActuator::new();
        assert_eq!(act.auto_delay(), DEFAULT_AUTO_DELAY);

        act.begin_fast_mode().unwrap();
        assert_eq!(act.auto_delay(), DEFAULT_FAST_DELAY);

        act.end_fast_mode().unwrap();
        assert_eq!(act.auto_delay(), DEFAULT_AUTO_DELAY);
    }

    #[test]
    fn test_stash_stack_nests() {
        let mut act = NullActuator::new();
        act.set_auto_delay_ms(50).unwrap();
        act.stash().unwrap();
        act.set_auto_delay_ms(10).unwrap();
        act.stash().unwrap();
        act.set_auto_delay_ms(1).unwrap();

        act.unstash().unwrap();
        assert_eq!(act.auto_delay(), 10);
        act.unstash().unwrap();
        assert_eq!(act.auto_delay(), 50);
        // Unstash with nothing stashed is a no-op.
        act.unstash().unwrap();
        assert_eq!(act.auto_delay(), 50);
    }

    #[test]
    fn test_release_mode_tracks_pressed_input() {
        let mut act = NullActuator::new();
        act.press_button(1).unwrap();
        act.press_key(65).unwrap();
        assert_eq!(act.pressed_buttons, vec![1]);
        assert_eq!(act.pressed_keys, vec![65]);

        act.release_pressed().unwrap();
        assert!(act.pressed_buttons.is_empty());
        assert!(act.pressed_keys.is_empty());

        act.set_release_mode(false).unwrap();
        act.press_button(1).unwrap();
        assert!(act.pressed_buttons.is_empty());
    }
}
