use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::SetupError;

static QUIT_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_quit_signal(_signal: libc::c_int) {
    QUIT_REQUESTED.store(true, Ordering::SeqCst);
}

/// Routes SIGINT, SIGTERM and SIGHUP into the quit flag read by the input source.
pub fn install_quit_handlers() -> Result<(), SetupError> {
    for signal in [libc::SIGINT, libc::SIGTERM, libc::SIGHUP] {
        let handler = on_quit_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
        // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
        let previous = unsafe { libc::signal(signal, handler) };
        if previous == libc::SIG_ERR {
            return Err(SetupError::Signal {
                signal,
                source: io::Error::last_os_error(),
            });
        }
    }
    Ok(())
}

pub fn quit_requested() -> bool {
    QUIT_REQUESTED.load(Ordering::SeqCst)
}
