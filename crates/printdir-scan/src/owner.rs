//! Resolving file owners to user names.

use std::collections::HashMap;
use std::sync::Mutex;

/// Maps numeric user ids to user names, remembering each lookup.
///
/// Most trees are owned by a handful of users, so the passwd database is
/// consulted once per distinct uid.
#[derive(Debug, Default)]
pub struct OwnerResolver {
    cache: Mutex<HashMap<u32, Option<String>>>,
}

impl OwnerResolver {
    /// Create a new resolver with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the user name for a uid. Returns `None` if the uid has no
    /// user entry.
    pub fn resolve(&self, uid: u32) -> Option<String> {
        let Ok(mut cache) = self.cache.lock() else {
            return lookup_user_name(uid);
        };
        cache
            .entry(uid)
            .or_insert_with(|| lookup_user_name(uid))
            .clone()
    }

    /// Number of distinct uids looked up so far.
    pub fn cached(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

/// Query the passwd database for a uid.
#[cfg(unix)]
fn lookup_user_name(uid: u32) -> Option<String> {
    use std::ffi::CStr;

    const MAX_BUFFER: usize = 1 << 16;

    let mut buffer: Vec<libc::c_char> = vec![0; 1024];
    loop {
        // SAFETY: passwd is plain old data; getpwuid_r fills it and points its
        // string fields into `buffer`, which outlives every read below.
        let mut passwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(
                uid as libc::uid_t,
                &mut passwd,
                buffer.as_mut_ptr(),
                buffer.len(),
                &mut result,
            )
        };

        if rc == libc::ERANGE && buffer.len() < MAX_BUFFER {
            buffer.resize(buffer.len() * 2, 0);
            continue;
        }
        if rc != 0 || result.is_null() || passwd.pw_name.is_null() {
            return None;
        }

        // SAFETY: pw_name is a NUL-terminated string inside `buffer`.
        let name = unsafe { CStr::from_ptr(passwd.pw_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

#[cfg(not(unix))]
fn lookup_user_name(_uid: u32) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_resolve_current_user() {
        let uid = unsafe { libc::getuid() };
        let resolver = OwnerResolver::new();
        // Containers may run with a uid that has no passwd entry.
        let first = resolver.resolve(uid);
        let second = resolver.resolve(uid);
        assert_eq!(first, second);
        assert_eq!(resolver.cached(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_root() {
        let resolver = OwnerResolver::new();
        assert_eq!(resolver.resolve(0).as_deref(), Some("root"));
    }

    #[test]
    fn test_unknown_uid() {
        let resolver = OwnerResolver::new();
        assert_eq!(resolver.resolve(u32::MAX - 7), None);
    }
}
