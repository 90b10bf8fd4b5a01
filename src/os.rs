//! Operating-system family detection for automation parameters.

use std::fmt;

/// The broad OS family an actuator is driving, used to pick the right
/// clipboard/shortcut conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Linux,
    MacOs,
    Windows,
    Unknown,
}

impl OsFamily {
    /// Guess the family from an OS name string.
    ///
    /// The name is whitespace-stripped and lowercased before matching.
    /// "darwin" must classify as macOS, never Windows, despite
    /// containing "win".
    pub fn guess_from_name(os_name: &str) -> Self {
        let name: String = os_name
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        if name.contains("linux") {
            OsFamily::Linux
        } else if name.contains("darwin") || name.contains("mac") || name.contains("osx") {
            OsFamily::MacOs
        } else if name.contains("win") {
            OsFamily::Windows
        } else {
            OsFamily::Unknown
        }
    }

    /// The family of the machine this process is running on.
    pub fn current() -> Self {
        Self::guess_from_name(std::env::consts::OS)
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Linux => "LINUX",
            OsFamily::MacOs => "MACOS",
            OsFamily::Windows => "WINDOWS",
            OsFamily::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_from_name() {
        assert_eq!(OsFamily::guess_from_name("Linux"), OsFamily::Linux);
        assert_eq!(OsFamily::guess_from_name("Arch Linux"), OsFamily::Linux);
        assert_eq!(OsFamily::guess_from_name("Mac OS X"), OsFamily::MacOs);
        assert_eq!(OsFamily::guess_from_name("Darwin"), OsFamily::MacOs);
        assert_eq!(OsFamily::guess_from_name("Windows 10"), OsFamily::Windows);
        assert_eq!(OsFamily::guess_from_name("Haiku"), OsFamily::Unknown);
    }

    #[test]
    fn test_darwin_is_not_windows() {
        // "darwin" contains "win" but must never classify as Windows.
        assert_eq!(OsFamily::guess_from_name("darwin"), OsFamily::MacOs);
    }
}
