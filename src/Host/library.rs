// Loading a service shared library and resolving its contract.

use std::ffi::{c_void, CStr, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::BridgeError;
use crate::ffi::{
    FreeMessageFn, GetNextMessageFn, MessageCallback, RawMessage, SetMessageCallbackFn,
    StartServiceFn, StopServiceFn, FREE_MESSAGE, GET_NEXT_MESSAGE, SET_MESSAGE_CALLBACK,
    START_SERVICE, STOP_SERVICE,
};
use crate::Relay::Bridge;

/// A dynamically loaded service with its five mandatory symbols resolved.
///
/// The library is never unloaded: a detached worker may still be executing
/// its code after `stop_service` returns.
pub struct ServiceLibrary {
    path: PathBuf,
    handle: *mut c_void,
    start: StartServiceFn,
    stop: StopServiceFn,
    next: GetNextMessageFn,
    free: FreeMessageFn,
    set_callback: SetMessageCallbackFn,
}

// The handle is only used for dlsym, which is thread-safe.
unsafe impl Send for ServiceLibrary {}
unsafe impl Sync for ServiceLibrary {}

impl ServiceLibrary {
    /// Load `path` and resolve the contract. A missing mandatory symbol is a
    /// configuration error; the library is closed again before returning it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref().to_path_buf();
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| BridgeError::InvalidPath(path.clone()))?;

        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        if handle.is_null() {
            return Err(BridgeError::LibraryOpen {
                path,
                reason: last_dl_error(),
            });
        }

        match unsafe { Self::resolve(&path, handle) } {
            Ok(lib) => {
                info!(path = %lib.path.display(), "service library loaded");
                Ok(lib)
            }
            Err(e) => {
                unsafe { libc::dlclose(handle) };
                Err(e)
            }
        }
    }

    unsafe fn resolve(path: &Path, handle: *mut c_void) -> Result<Self, BridgeError> {
        let start = lookup(path, handle, START_SERVICE)?;
        let stop = lookup(path, handle, STOP_SERVICE)?;
        let next = lookup(path, handle, GET_NEXT_MESSAGE)?;
        let free = lookup(path, handle, FREE_MESSAGE)?;
        let set_callback = lookup(path, handle, SET_MESSAGE_CALLBACK)?;

        Ok(Self {
            path: path.to_path_buf(),
            handle,
            start: std::mem::transmute::<*mut c_void, StartServiceFn>(start),
            stop: std::mem::transmute::<*mut c_void, StopServiceFn>(stop),
            next: std::mem::transmute::<*mut c_void, GetNextMessageFn>(next),
            free: std::mem::transmute::<*mut c_void, FreeMessageFn>(free),
            set_callback: std::mem::transmute::<*mut c_void, SetMessageCallbackFn>(set_callback),
        })
    }

    /// Resolve a domain-specific export such as an accessor.
    ///
    /// # Safety
    /// `F` must be a function pointer type matching the symbol's real
    /// signature.
    pub unsafe fn symbol<F: Copy>(&self, name: &str) -> Result<F, BridgeError> {
        let size = std::mem::size_of::<F>();
        if size != std::mem::size_of::<*mut c_void>() {
            return Err(BridgeError::SymbolSize {
                symbol: name.to_string(),
                size,
            });
        }
        let raw = lookup(&self.path, self.handle, name)?;
        Ok(std::mem::transmute_copy::<*mut c_void, F>(&raw))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

unsafe fn lookup(path: &Path, handle: *mut c_void, name: &str) -> Result<*mut c_void, BridgeError> {
    let missing = || BridgeError::MissingSymbol {
        path: path.to_path_buf(),
        symbol: name.to_string(),
    };
    let c_name = CString::new(name).map_err(|_| missing())?;

    // clear stale state so a null result can be told apart
    libc::dlerror();
    let sym = libc::dlsym(handle, c_name.as_ptr());
    if sym.is_null() {
        debug!(path = %path.display(), symbol = name, reason = %last_dl_error(), "symbol lookup failed");
        return Err(missing());
    }
    Ok(sym)
}

fn last_dl_error() -> String {
    let err = unsafe { libc::dlerror() };
    if err.is_null() {
        return "unknown dynamic loader error".to_string();
    }
    unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned()
}

impl Bridge for ServiceLibrary {
    fn start_service(&self) {
        unsafe { (self.start)() }
    }

    fn stop_service(&self) {
        unsafe { (self.stop)() }
    }

    fn next_message(&self) -> RawMessage {
        unsafe { (self.next)() }
    }

    fn free_message(&self, msg: RawMessage) {
        unsafe { (self.free)(msg) }
    }

    fn set_message_callback(&self, callback: MessageCallback) {
        unsafe { (self.set_callback)(callback) }
    }
}

impl std::fmt::Debug for ServiceLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceLibrary")
            .field("path", &self.path)
            .field("handle", &format_args!("{:p}", self.handle))
            .finish_non_exhaustive()
    }
}
