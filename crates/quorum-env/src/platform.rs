use std::fmt;

use quorum_lazy::{LazyCell, LazyResult};
use serde::Serialize;

use crate::error::EnvResult;

/// Operating system family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OsType {
    Linux,
    Windows,
    Solaris,
    Mac,
    FreeBsd,
    Other,
}

impl OsType {
    /// Classify a human-readable OS name such as `"Windows 10"` or
    /// `"Mac OS X"`. Rules are applied in order; unknown names are `Other`.
    pub fn from_os_name(name: &str) -> Self {
        if name.starts_with("Windows") {
            Self::Windows
        } else if name.contains("SunOS") || name.contains("Solaris") {
            Self::Solaris
        } else if name.contains("Mac") {
            Self::Mac
        } else if name.contains("FreeBSD") {
            Self::FreeBsd
        } else if name.starts_with("Linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Classify a Rust `target_os` value such as `"linux"` or `"macos"`.
    pub fn from_target_os(os: &str) -> Self {
        match os {
            "linux" | "android" => Self::Linux,
            "windows" => Self::Windows,
            "solaris" | "illumos" => Self::Solaris,
            "macos" | "ios" => Self::Mac,
            "freebsd" => Self::FreeBsd,
            _ => Self::Other,
        }
    }

    /// The OS this process was built for.
    pub fn current() -> Self {
        Self::from_target_os(std::env::consts::OS)
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Solaris => "solaris",
            Self::Mac => "mac",
            Self::FreeBsd => "freebsd",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Description of the host platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub os: OsType,
    pub arch: &'static str,
    pub ppc64: bool,
}

fn detect() -> LazyResult<Platform> {
    Ok(Platform::detect())
}

static CURRENT: LazyCell<Platform, fn() -> LazyResult<Platform>> = LazyCell::new(detect);

impl Platform {
    /// Probe the host without caching.
    pub fn detect() -> Self {
        let arch = std::env::consts::ARCH;
        Self {
            os: OsType::current(),
            arch,
            ppc64: arch == "powerpc64",
        }
    }

    /// The host platform, probed once per process.
    pub fn current() -> EnvResult<&'static Platform> {
        Ok(CURRENT.get()?)
    }

    pub fn is_linux(&self) -> bool {
        self.os == OsType::Linux
    }

    pub fn is_windows(&self) -> bool {
        self.os == OsType::Windows
    }

    pub fn is_solaris(&self) -> bool {
        self.os == OsType::Solaris
    }

    pub fn is_mac(&self) -> bool {
        self.os == OsType::Mac
    }

    pub fn is_freebsd(&self) -> bool {
        self.os == OsType::FreeBsd
    }

    pub fn is_other(&self) -> bool {
        self.os == OsType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_os_names() {
        assert_eq!(OsType::from_os_name("Windows Server 2019"), OsType::Windows);
        assert_eq!(OsType::from_os_name("SunOS"), OsType::Solaris);
        assert_eq!(OsType::from_os_name("Solaris"), OsType::Solaris);
        assert_eq!(OsType::from_os_name("Mac OS X"), OsType::Mac);
        assert_eq!(OsType::from_os_name("FreeBSD"), OsType::FreeBsd);
        assert_eq!(OsType::from_os_name("Linux"), OsType::Linux);
        assert_eq!(OsType::from_os_name("AIX"), OsType::Other);
    }

    #[test]
    fn rule_order_is_significant() {
        // "Windows" wins even if the name mentions another family later.
        assert_eq!(OsType::from_os_name("Windows (Mac host)"), OsType::Windows);
        // "Linux" only matches as a prefix.
        assert_eq!(OsType::from_os_name("GNU/Linux"), OsType::Other);
    }

    #[test]
    fn classifies_target_os() {
        assert_eq!(OsType::from_target_os("linux"), OsType::Linux);
        assert_eq!(OsType::from_target_os("macos"), OsType::Mac);
        assert_eq!(OsType::from_target_os("illumos"), OsType::Solaris);
        assert_eq!(OsType::from_target_os("openbsd"), OsType::Other);
    }

    #[test]
    fn current_platform_is_memoized() {
        let a = Platform::current().unwrap();
        let b = Platform::current().unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(*a, Platform::detect());
        assert_eq!(a.arch, std::env::consts::ARCH);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_host_detected() {
        let platform = Platform::current().unwrap();
        assert!(platform.is_linux());
        assert!(!platform.is_windows());
    }

    #[test]
    fn serializes_os_type_in_snake_case() {
        let value = toml::Value::try_from(OsType::FreeBsd).unwrap();
        assert_eq!(value.as_str(), Some("free_bsd"));
    }
}
