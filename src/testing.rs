//! Test support.
//!
//! [`RecordingActuator`] logs every action it is asked to perform as a
//! readable string, so tests can assert on the exact sequence of calls
//! an interpreted script produced. Parameter bookkeeping delegates to
//! [`NullActuator`].

use std::path::PathBuf;

use crate::actuator::{Actuator, ActuatorError, NullActuator, Point, Region, Rgb, Size};
use crate::os::OsFamily;

#[derive(Debug, Default)]
pub struct RecordingActuator {
    inner: NullActuator,
    pub calls: Vec<String>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }
}

impl Actuator for RecordingActuator {
    fn coords(&mut self) -> Result<Point, ActuatorError> {
        self.log("coords()");
        self.inner.coords()
    }

    fn screen_size(&mut self) -> Result<Size, ActuatorError> {
        self.log("screen_size()");
        self.inner.screen_size()
    }

    fn pixel(&mut self, x: i32, y: i32) -> Result<Rgb, ActuatorError> {
        self.log(format!("pixel({x},{y})"));
        self.inner.pixel(x, y)
    }

    fn print_screen(&mut self, region: Option<Region>) -> Result<PathBuf, ActuatorError> {
        match region {
            Some(r) => self.log(format!("print_screen({},{},{},{})", r.x, r.y, r.width, r.height)),
            None => self.log("print_screen()"),
        }
        Ok(PathBuf::from("screenshot.png"))
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), ActuatorError> {
        self.log(format!("move_to({x},{y})"));
        self.inner.move_to(x, y)
    }

    fn click(&mut self, button: i32) -> Result<(), ActuatorError> {
        self.log(format!("click({button})"));
        self.inner.click(button)
    }

    fn double_click(&mut self, button: i32) -> Result<(), ActuatorError> {
        self.log(format!("double_click({button})"));
        Ok(())
    }

    fn press_button(&mut self, button: i32) -> Result<(), ActuatorError> {
        self.log(format!("press_button({button})"));
        self.inner.press_button(button)
    }

    fn release_button(&mut self, button: i32) -> Result<(), ActuatorError> {
        self.log(format!("release_button({button})"));
        self.inner.release_button(button)
    }

    fn release_buttons(&mut self) -> Result<(), ActuatorError> {
        self.log("release_buttons()");
        self.inner.release_buttons()
    }

    fn roll_buttons(&mut self, buttons: &[i32]) -> Result<(), ActuatorError> {
        self.log(format!("roll_buttons({buttons:?})"));
        Ok(())
    }

    fn wheel(&mut self, amount: i32) -> Result<(), ActuatorError> {
        self.log(format!("wheel({amount})"));
        Ok(())
    }

    fn type_key(&mut self, key: i32) -> Result<(), ActuatorError> {
        self.log(format!("type_key({key})"));
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError> {
        self.log(format!("type_text({text:?})"));
        Ok(())
    }

    fn type_text_unsurely(&mut self, text: &str) -> Result<(), ActuatorError> {
        self.log(format!("type_text_unsurely({text:?})"));
        Ok(())
    }

    fn press_key(&mut self, key: i32) -> Result<(), ActuatorError> {
        self.log(format!("press_key({key})"));
        self.inner.press_key(key)
    }

    fn release_key(&mut self, key: i32) -> Result<(), ActuatorError> {
        self.log(format!("release_key({key})"));
        self.inner.release_key(key)
    }

    fn release_keys(&mut self) -> Result<(), ActuatorError> {
        self.log("release_keys()");
        self.inner.release_keys()
    }

    fn roll_keys(&mut self, keys: &[i32]) -> Result<(), ActuatorError> {
        self.log(format!("roll_keys({keys:?})"));
        Ok(())
    }

    fn enter(&mut self) -> Result<(), ActuatorError> {
        self.log("enter()");
        Ok(())
    }

    fn copy(&mut self, text: &str) -> Result<(), ActuatorError> {
        self.log(format!("copy({text:?})"));
        Ok(())
    }

    fn paste(&mut self) -> Result<(), ActuatorError> {
        self.log("paste()");
        Ok(())
    }

    fn delay(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.log(format!("delay({millis})"));
        Ok(())
    }

    fn wait_for_idle(&mut self) -> Result<(), ActuatorError> {
        self.log("wait_for_idle()");
        Ok(())
    }

    fn begin_fast_mode(&mut self) -> Result<(), ActuatorError> {
        self.log("begin_fast_mode()");
        self.inner.begin_fast_mode()
    }

    fn end_fast_mode(&mut self) -> Result<(), ActuatorError> {
        self.log("end_fast_mode()");
        self.inner.end_fast_mode()
    }

    fn begin_safe_mode(&mut self) -> Result<(), ActuatorError> {
        self.log("begin_safe_mode()");
        self.inner.begin_safe_mode()
    }

    fn end_safe_mode(&mut self) -> Result<(), ActuatorError> {
        self.log("end_safe_mode()");
        self.inner.end_safe_mode()
    }

    fn stash(&mut self) -> Result<(), ActuatorError> {
        self.log("stash()");
        self.inner.stash()
    }

    fn unstash(&mut self) -> Result<(), ActuatorError> {
        self.log("unstash()");
        self.inner.unstash()
    }

    fn release_pressed(&mut self) -> Result<(), ActuatorError> {
        self.log("release_pressed()");
        self.inner.release_pressed()
    }

    fn clear_pressed_buttons(&mut self) -> Result<(), ActuatorError> {
        self.log("clear_pressed_buttons()");
        self.inner.clear_pressed_buttons()
    }

    fn clear_pressed_keys(&mut self) -> Result<(), ActuatorError> {
        self.log("clear_pressed_keys()");
        self.inner.clear_pressed_keys()
    }

    fn beep(&mut self) -> Result<(), ActuatorError> {
        self.log("beep()");
        Ok(())
    }

    fn default_button(&self) -> i32 {
        self.inner.default_button()
    }

    fn left_button(&self) -> i32 {
        self.inner.left_button()
    }

    fn middle_button(&self) -> i32 {
        self.inner.middle_button()
    }

    fn right_button(&self) -> i32 {
        self.inner.right_button()
    }

    fn auto_delay(&self) -> i32 {
        self.inner.auto_delay()
    }

    fn is_auto_delay(&self) -> bool {
        self.inner.is_auto_delay()
    }

    fn fast_delay(&self) -> i32 {
        self.inner.fast_delay()
    }

    fn long_delay(&self) -> i32 {
        self.inner.long_delay()
    }

    fn short_delay(&self) -> i32 {
        self.inner.short_delay()
    }

    fn is_auto_wait_for_idle(&self) -> bool {
        self.inner.is_auto_wait_for_idle()
    }

    fn is_release_mode(&self) -> bool {
        self.inner.is_release_mode()
    }

    fn is_safe_mode(&self) -> bool {
        self.inner.is_safe_mode()
    }

    fn os_family(&self) -> OsFamily {
        self.inner.os_family()
    }

    fn set_auto_delay_ms(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.log(format!("set_auto_delay_ms({millis})"));
        self.inner.set_auto_delay_ms(millis)
    }

    fn set_auto_delay(&mut self, enabled: bool) -> Result<(), ActuatorError> {
        self.log(format!("set_auto_delay({enabled})"));
        self.inner.set_auto_delay(enabled)
    }

    fn set_auto_wait_for_idle(&mut self, enabled: bool) -> Result<(), ActuatorError> {
        self.log(format!("set_auto_wait_for_idle({enabled})"));
        self.inner.set_auto_wait_for_idle(enabled)
    }

    fn set_fast_delay(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.log(format!("set_fast_delay({millis})"));
        self.inner.set_fast_delay(millis)
    }

    fn set_long_delay(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.log(format!("set_long_delay({millis})"));
        self.inner.set_long_delay(millis)
    }

    fn set_short_delay(&mut self, millis: i32) -> Result<(), ActuatorError> {
        self.log(format!("set_short_delay({millis})"));
        self.inner.set_short_delay(millis)
    }

    fn set_os_family(&mut self, family: OsFamily) -> Result<(), ActuatorError> {
        self.log(format!("set_os_family({family})"));
        self.inner.set_os_family(family)
    }

    fn set_release_mode(&mut self, enabled: bool) -> Result<(), ActuatorError> {
        self.log(format!("set_release_mode({enabled})"));
        self.inner.set_release_mode(enabled)
    }
}
