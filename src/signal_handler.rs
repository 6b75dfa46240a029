use libc::c_int;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::jobs::{BACKGROUND, FINISHED};

/// Installs the SIGCHLD handler. SA_RESTART keeps the blocking stdin read
/// alive across deliveries; SA_NOCLDSTOP limits deliveries to terminations.
pub fn install() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_sigchld),
        SaFlags::SA_RESTART | SaFlags::SA_NOCLDSTOP,
        SigSet::empty(),
    );
    unsafe { sigaction(Signal::SIGCHLD, &action) }?;
    Ok(())
}

/// A signal set holding only SIGCHLD, for masking delivery around the
/// fork/register, foreground-wait, and shutdown-drain windows.
pub fn sigchld_set() -> SigSet {
    let mut set = SigSet::empty();
    set.add(Signal::SIGCHLD);
    set
}

/// Collects every child the kernel has ready, without blocking.
///
/// Runs in signal context, so it touches only `waitpid` and the atomic job
/// tables. Tracked pids move to the finished queue; the main loop prints
/// their notices before the next prompt.
extern "C" fn handle_sigchld(_: c_int) {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, _)) | Ok(WaitStatus::Signaled(pid, _, _)) => {
                if BACKGROUND.remove(pid.as_raw()) {
                    FINISHED.add(pid.as_raw());
                }
            }
            Ok(WaitStatus::StillAlive) => break,
            Ok(_) => continue,
            Err(_) => break,
        }
    }
}
