use crate::domain::setup::PrivilegeChecker;

pub struct LinuxPrivilegeChecker;

impl Default for LinuxPrivilegeChecker {
    fn default() -> Self {
        Self
    }
}

impl LinuxPrivilegeChecker {
    pub fn new() -> Self {
        Self
    }
}

impl PrivilegeChecker for LinuxPrivilegeChecker {
    fn is_root(&self) -> bool {
        unsafe { libc::geteuid() == 0 }
    }
}
