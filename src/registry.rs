//! The instruction registry.
//!
//! Maps normalized instruction ids to [`Executor`] functions. A registry
//! is an explicit value passed to the interpreter, so hosts may extend,
//! replace, or remove entries freely, and two interpreters can run with
//! different dialects. [`Registry::base`] builds the stock dialect.

use std::collections::HashMap;

use crate::actuator::{Actuator, Region};
use crate::error::Error;
use crate::instruction::{self, Instruction};
use crate::os::OsFamily;

/// One executable instruction behavior.
///
/// A plain function pointer: entries carry no state of their own, all
/// state lives behind the actuator.
pub type Executor = fn(&mut dyn Actuator, &Instruction) -> Result<(), Error>;

/// The number of entries [`Registry::base`] installs. A test checks the
/// two stay equal, which catches a copy-pasted id overwriting an
/// existing entry.
pub const BASE_COUNT: usize = 71;

#[derive(Default)]
pub struct Registry {
    entries: HashMap<String, Executor>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock instruction set.
    pub fn base() -> Self {
        let mut reg = Self::new();
        reg.add_base();
        reg
    }

    /// Install an executor under an already-normalized id.
    pub fn insert_id(&mut self, id: &str, executor: Executor) -> Option<Executor> {
        self.entries.insert(id.to_string(), executor)
    }

    /// Install an executor under a human-readable name, normalizing it
    /// first.
    pub fn insert_name(&mut self, name: &str, executor: Executor) -> Option<Executor> {
        self.entries.insert(instruction::to_id(name), executor)
    }

    pub fn remove_id(&mut self, id: &str) -> Option<Executor> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Executor> {
        self.entries.get(id).copied()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Install the stock entries.
    ///
    /// When adding an entry here, update [`BASE_COUNT`] to match.
    pub fn add_base(&mut self) {
        // Pointer and screen queries
        self.insert_id("getcoords", |a, _| {
            let p = a.coords()?;
            println!("({},{})", p.x, p.y);
            Ok(())
        });
        self.insert_id("getxcoord", |a, _| {
            println!("{}", a.coords()?.x);
            Ok(())
        });
        self.insert_id("getycoord", |a, _| {
            println!("{}", a.coords()?.y);
            Ok(())
        });

        // Main methods
        self.insert_id("beep", |a, _| Ok(a.beep()?));
        self.insert_id("beginfastmode", |a, _| Ok(a.begin_fast_mode()?));
        self.insert_id("beginsafemode", |a, _| Ok(a.begin_safe_mode()?));
        self.insert_id("clearpressed", |a, _| {
            a.clear_pressed_buttons()?;
            Ok(a.clear_pressed_keys()?)
        });
        self.insert_id("clearpressedbuttons", |a, _| Ok(a.clear_pressed_buttons()?));
        self.insert_id("clearpressedkeys", |a, _| Ok(a.clear_pressed_keys()?));
        self.insert_id("click", |a, inst| match inst.args.len() {
            0 => Ok(a.click(a.default_button())?),
            1 => Ok(a.click(inst.get_int(0)?)?),
            2 => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.click(a.default_button())?)
            }
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.click(inst.get_int(2)?)?)
            }
        });
        self.insert_id("clicks", |a, inst| {
            for button in inst.get_ints()? {
                a.click(button)?;
            }
            Ok(())
        });
        self.insert_id("copy", |a, inst| Ok(a.copy(inst.get_str(0)?)?));
        self.insert_id("delay", |a, inst| Ok(a.delay(inst.get_int(0)?)?));
        self.insert_id("delayauto", |a, _| {
            if a.is_auto_delay() {
                a.delay(a.auto_delay())?;
            }
            Ok(())
        });
        self.insert_id("delayfast", |a, _| Ok(a.delay(a.fast_delay())?));
        self.insert_id("delaylong", |a, _| Ok(a.delay(a.long_delay())?));
        self.insert_id("delayshort", |a, _| Ok(a.delay(a.short_delay())?));
        self.insert_id("doubleclick", |a, inst| match inst.args.len() {
            0 => Ok(a.double_click(a.default_button())?),
            1 => Ok(a.double_click(inst.get_int(0)?)?),
            2 => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.double_click(a.default_button())?)
            }
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.double_click(inst.get_int(2)?)?)
            }
        });
        self.insert_id("drag", |a, inst| {
            let button = match inst.args.len() {
                4 => a.default_button(),
                _ => inst.get_int(4)?,
            };
            a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
            a.press_button(button)?;
            a.move_to(inst.get_int(2)?, inst.get_int(3)?)?;
            Ok(a.release_button(button)?)
        });
        self.insert_id("endfastmode", |a, _| Ok(a.end_fast_mode()?));
        self.insert_id("endsafemode", |a, _| Ok(a.end_safe_mode()?));
        self.insert_id("enter", |a, inst| match inst.args.len() {
            0 => Ok(a.enter()?),
            1 => {
                paste_text(a, inst.get_str(0)?)?;
                Ok(a.enter()?)
            }
            2 => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                a.click(a.default_button())?;
                Ok(a.enter()?)
            }
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                a.click(a.default_button())?;
                paste_text(a, inst.get_str(2)?)?;
                Ok(a.enter()?)
            }
        });
        self.insert_id("leftclick", |a, inst| match inst.args.len() {
            0 => Ok(a.click(a.left_button())?),
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.click(a.left_button())?)
            }
        });
        self.insert_id("middleclick", |a, inst| match inst.args.len() {
            0 => Ok(a.click(a.middle_button())?),
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.click(a.middle_button())?)
            }
        });
        self.insert_id("move", |a, inst| {
            Ok(a.move_to(inst.get_int(0)?, inst.get_int(1)?)?)
        });
        self.insert_id("paste", |a, inst| match inst.args.len() {
            0 => Ok(a.paste()?),
            1 => paste_text(a, inst.get_str(0)?),
            2 => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                a.click(a.default_button())?;
                Ok(a.paste()?)
            }
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                a.click(a.default_button())?;
                paste_text(a, inst.get_str(2)?)
            }
        });
        self.insert_id("pressbutton", |a, inst| match inst.args.len() {
            1 => Ok(a.press_button(inst.get_int(0)?)?),
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.press_button(inst.get_int(2)?)?)
            }
        });
        self.insert_id("pressbuttons", |a, inst| {
            for button in inst.get_ints()? {
                a.press_button(button)?;
            }
            Ok(())
        });
        self.insert_id("presskey", |a, inst| match inst.args.len() {
            1 => Ok(a.press_key(inst.get_int(0)?)?),
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.press_key(inst.get_int(2)?)?)
            }
        });
        self.insert_id("presskeys", |a, inst| {
            for key in inst.get_ints()? {
                a.press_key(key)?;
            }
            Ok(())
        });
        self.insert_id("printscreen", |a, inst| {
            let region = match inst.args.len() {
                0 => None,
                2 => Some(Region {
                    x: 0,
                    y: 0,
                    width: inst.get_int(0)?,
                    height: inst.get_int(1)?,
                }),
                _ => Some(Region {
                    x: inst.get_int(0)?,
                    y: inst.get_int(1)?,
                    width: inst.get_int(2)?,
                    height: inst.get_int(3)?,
                }),
            };
            let path = a.print_screen(region)?;
            println!("Saving screenshot to: {}", path.display());
            Ok(())
        });
        self.insert_id("releasebutton", |a, inst| match inst.args.len() {
            1 => Ok(a.release_button(inst.get_int(0)?)?),
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.release_button(inst.get_int(2)?)?)
            }
        });
        self.insert_id("releasebuttons", |a, inst| match inst.args.len() {
            0 => Ok(a.release_buttons()?),
            _ => {
                for button in inst.get_ints()? {
                    a.release_button(button)?;
                }
                Ok(())
            }
        });
        self.insert_id("releasekey", |a, inst| match inst.args.len() {
            1 => Ok(a.release_key(inst.get_int(0)?)?),
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.release_key(inst.get_int(2)?)?)
            }
        });
        self.insert_id("releasekeys", |a, inst| match inst.args.len() {
            0 => Ok(a.release_keys()?),
            _ => {
                for key in inst.get_ints()? {
                    a.release_key(key)?;
                }
                Ok(())
            }
        });
        self.insert_id("releasepressed", |a, _| Ok(a.release_pressed()?));
        self.insert_id("rightclick", |a, inst| match inst.args.len() {
            0 => Ok(a.click(a.right_button())?),
            _ => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.click(a.right_button())?)
            }
        });
        self.insert_id("rollbuttons", |a, inst| {
            Ok(a.roll_buttons(&inst.get_ints()?)?)
        });
        self.insert_id("rollkeys", |a, inst| Ok(a.roll_keys(&inst.get_ints()?)?));
        self.insert_id("stash", |a, _| Ok(a.stash()?));
        self.insert_id("type", |a, inst| match inst.args.len() {
            3 => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                match inst.try_int(2) {
                    Some(key) => Ok(a.type_key(key)?),
                    None => Ok(a.type_text(inst.get_str(2)?)?),
                }
            }
            _ => match inst.try_int(0) {
                Some(key) => Ok(a.type_key(key)?),
                None => Ok(a.type_text(inst.get_str(0)?)?),
            },
        });
        self.insert_id("types", |a, inst| {
            for key in inst.get_ints()? {
                a.type_key(key)?;
            }
            Ok(())
        });
        self.insert_id("typeunsurely", |a, inst| match inst.args.len() {
            3 => {
                a.move_to(inst.get_int(0)?, inst.get_int(1)?)?;
                Ok(a.type_text_unsurely(inst.get_str(2)?)?)
            }
            _ => Ok(a.type_text_unsurely(inst.get_str(0)?)?),
        });
        self.insert_id("unstash", |a, _| Ok(a.unstash()?));
        self.insert_id("waitforidle", |a, _| Ok(a.wait_for_idle()?));
        self.insert_id("wheel", |a, inst| Ok(a.wheel(inst.get_int(0)?)?));

        // Extra methods
        self.insert_id("puts", |_, inst| {
            for arg in &inst.args {
                println!("{}", arg.value);
            }
            println!();
            Ok(())
        });

        // Setters
        self.insert_id("setautodelay", |a, inst| {
            match inst.try_int(0) {
                Some(millis) => {
                    a.set_auto_delay_ms(millis)?;
                    println!("setAutoDelay: {}", a.auto_delay());
                }
                None => {
                    a.set_auto_delay(inst.get_bool(0)?)?;
                    println!("setAutoDelay: {}", a.is_auto_delay());
                }
            }
            Ok(())
        });
        self.insert_id("setautowaitforidle", |a, inst| {
            a.set_auto_wait_for_idle(inst.get_bool(0)?)?;
            println!("setAutoWaitForIdle: {}", a.is_auto_wait_for_idle());
            Ok(())
        });
        self.insert_id("setfastdelay", |a, inst| {
            a.set_fast_delay(inst.get_int(0)?)?;
            println!("setFastDelay: {}", a.fast_delay());
            Ok(())
        });
        self.insert_id("setlongdelay", |a, inst| {
            a.set_long_delay(inst.get_int(0)?)?;
            println!("setLongDelay: {}", a.long_delay());
            Ok(())
        });
        self.insert_id("setosfamily", |a, inst| {
            a.set_os_family(OsFamily::guess_from_name(inst.get_str(0)?))?;
            println!("setOSFamily: {}", a.os_family());
            Ok(())
        });
        self.insert_id("setreleasemode", |a, inst| {
            a.set_release_mode(inst.get_bool(0)?)?;
            println!("setReleaseMode: {}", a.is_release_mode());
            Ok(())
        });
        self.insert_id("setshortdelay", |a, inst| {
            a.set_short_delay(inst.get_int(0)?)?;
            println!("setShortDelay: {}", a.short_delay());
            Ok(())
        });

        // Getters
        self.insert_id("getautodelay", |a, _| {
            println!("{}", a.auto_delay());
            Ok(())
        });
        self.insert_id("isautodelay", |a, _| {
            println!("{}", a.is_auto_delay());
            Ok(())
        });
        self.insert_id("isautowaitforidle", |a, _| {
            println!("{}", a.is_auto_wait_for_idle());
            Ok(())
        });
        self.insert_id("getdefaultbutton", |a, _| {
            println!("{}", a.default_button());
            Ok(())
        });
        self.insert_id("getfastdelay", |a, _| {
            println!("{}", a.fast_delay());
            Ok(())
        });
        self.insert_id("getleftbutton", |a, _| {
            println!("{}", a.left_button());
            Ok(())
        });
        self.insert_id("getlongdelay", |a, _| {
            println!("{}", a.long_delay());
            Ok(())
        });
        self.insert_id("getmiddlebutton", |a, _| {
            println!("{}", a.middle_button());
            Ok(())
        });
        self.insert_id("getosfamily", |a, _| {
            println!("{}", a.os_family());
            Ok(())
        });
        self.insert_id("getpixel", |a, inst| {
            let px = a.pixel(inst.get_int(0)?, inst.get_int(1)?)?;
            println!(
                "(r={},g={},b={}) | Hex={:X} | RGB={}",
                px.r,
                px.g,
                px.b,
                px.word(),
                px.word()
            );
            Ok(())
        });
        self.insert_id("isreleasemode", |a, _| {
            println!("{}", a.is_release_mode());
            Ok(())
        });
        self.insert_id("getrightbutton", |a, _| {
            println!("{}", a.right_button());
            Ok(())
        });
        self.insert_id("issafemode", |a, _| {
            println!("{}", a.is_safe_mode());
            Ok(())
        });
        self.insert_id("getscreenheight", |a, _| {
            println!("{}", a.screen_size()?.height);
            Ok(())
        });
        self.insert_id("getscreensize", |a, _| {
            let size = a.screen_size()?;
            println!("{}x{}", size.width, size.height);
            Ok(())
        });
        self.insert_id("getscreenwidth", |a, _| {
            println!("{}", a.screen_size()?.width);
            Ok(())
        });
        self.insert_id("getshortdelay", |a, _| {
            println!("{}", a.short_delay());
            Ok(())
        });
    }
}

/// Copy then paste, the composition behind string-valued `paste`,
/// `enter`, and friends.
fn paste_text(a: &mut dyn Actuator, text: &str) -> Result<(), Error> {
    a.copy(text)?;
    Ok(a.paste()?)
}
