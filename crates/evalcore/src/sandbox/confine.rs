//! Resource confinement applied to a spawned child between `fork` and
//! `exec`, via `std::os::unix::process::CommandExt::pre_exec`.
//!
//! Every call here must be async-signal-safe: no allocation, no locking,
//! just direct syscall wrappers. `nix` gives us that without hand-written
//! `unsafe extern "C"` declarations.

use std::io;

use nix::sched::{unshare, CloneFlags};
use nix::sys::resource::{setrlimit, Resource};
use nix::unistd::{setgid, setuid, Gid, Uid};

/// What to enforce in the child before the target program is exec'd.
#[derive(Debug, Clone, Copy)]
pub struct Confinement {
    pub cpu_time_seconds: u64,
    pub address_space_bytes: u64,
    pub pids_limit: u64,
    /// `None` for the compile step, which runs as the service's own uid so
    /// it can write the compiled artifact into the workspace it owns.
    pub drop_to: Option<(u32, u32)>,
}

impl Confinement {
    /// Apply every limit. Called from inside `pre_exec`; any error here
    /// aborts the child before `exec` runs, which `Command::spawn` surfaces
    /// to the parent as a normal I/O error.
    pub fn apply(&self) -> io::Result<()> {
        setrlimit(Resource::RLIMIT_CPU, self.cpu_time_seconds, self.cpu_time_seconds)
            .map_err(nix_to_io)?;
        setrlimit(
            Resource::RLIMIT_AS,
            self.address_space_bytes,
            self.address_space_bytes,
        )
        .map_err(nix_to_io)?;
        setrlimit(Resource::RLIMIT_NPROC, self.pids_limit, self.pids_limit).map_err(nix_to_io)?;

        // Network denial: a fresh, unconnected network namespace.
        unshare(CloneFlags::CLONE_NEWNET).map_err(nix_to_io)?;

        if let Some((uid, gid)) = self.drop_to {
            setgid(Gid::from_raw(gid)).map_err(nix_to_io)?;
            setuid(Uid::from_raw(uid)).map_err(nix_to_io)?;
        }

        Ok(())
    }
}

fn nix_to_io(e: nix::Error) -> io::Error {
    io::Error::from_raw_os_error(e as i32)
}
