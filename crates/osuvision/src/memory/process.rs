//! Live process access.
//!
//! `ProcessHandle` owns the OS handle to the target and implements
//! [`ReadMemory`] and [`QueryRegions`] on top of `ReadProcessMemory` and
//! `VirtualQueryEx`. Non-Windows builds compile the same API but every
//! attach attempt fails with [`Error::Unsupported`].

use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::{MemoryRegion, PointerWidth, QueryRegions, ReadMemory};

/// An open handle to the target process and its main module
#[derive(Debug)]
pub struct ProcessHandle {
    pub pid: u32,
    /// Load base of the main module
    pub base_address: u64,
    pub module_size: u64,
    pub pointer_width: PointerWidth,
    #[cfg(target_os = "windows")]
    handle: windows::Win32::Foundation::HANDLE,
}

impl ProcessHandle {
    /// Find a running process by executable name and open it
    pub fn find_and_open(process_name: &str, module_name: &str) -> Result<Self> {
        let pid = find_process_id(process_name)?;
        debug!("Found {} (pid {})", process_name, pid);
        Self::open(pid, module_name)
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use std::ffi::c_void;

    use tracing::warn;
    use windows::Win32::Foundation::{BOOL, CloseHandle, HANDLE};
    use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, Module32NextW, PROCESSENTRY32W,
        Process32FirstW, Process32NextW, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
        TH32CS_SNAPPROCESS,
    };
    use windows::Win32::System::Memory::{MEM_COMMIT, MEMORY_BASIC_INFORMATION, VirtualQueryEx};
    use windows::Win32::System::Threading::{
        IsWow64Process, OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
    };

    use super::*;

    /// Closes a toolhelp snapshot when dropped
    struct Snapshot(HANDLE);

    impl Drop for Snapshot {
        fn drop(&mut self) {
            // SAFETY: the snapshot handle came from CreateToolhelp32Snapshot and is closed once.
            let _ = unsafe { CloseHandle(self.0) };
        }
    }

    fn wide_to_string(wide: &[u16]) -> String {
        let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
        String::from_utf16_lossy(&wide[..len])
    }

    pub(super) fn find_process_id(name: &str) -> Result<u32> {
        // SAFETY: plain snapshot creation; the handle is owned by `Snapshot`.
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map(Snapshot)
            .map_err(|e| Error::ProcessNotFound(format!("{}: snapshot failed: {}", name, e)))?;

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        // SAFETY: `entry` is a properly sized PROCESSENTRY32W with dwSize set.
        let mut more = unsafe { Process32FirstW(snapshot.0, &mut entry) }.is_ok();
        while more {
            if wide_to_string(&entry.szExeFile).eq_ignore_ascii_case(name) {
                return Ok(entry.th32ProcessID);
            }
            // SAFETY: same entry buffer as above.
            more = unsafe { Process32NextW(snapshot.0, &mut entry) }.is_ok();
        }

        Err(Error::ProcessNotFound(name.to_string()))
    }

    fn find_module(pid: u32, module_name: &str) -> Result<(u64, u64)> {
        // SAFETY: plain snapshot creation; the handle is owned by `Snapshot`.
        let snapshot =
            unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }
                .map(Snapshot)
                .map_err(|e| Error::ModuleNotFound(format!("{}: {}", module_name, e)))?;

        let mut entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        // SAFETY: `entry` is a properly sized MODULEENTRY32W with dwSize set.
        let mut more = unsafe { Module32FirstW(snapshot.0, &mut entry) }.is_ok();
        while more {
            if wide_to_string(&entry.szModule).eq_ignore_ascii_case(module_name) {
                return Ok((entry.modBaseAddr as u64, entry.modBaseSize as u64));
            }
            // SAFETY: same entry buffer as above.
            more = unsafe { Module32NextW(snapshot.0, &mut entry) }.is_ok();
        }

        Err(Error::ModuleNotFound(module_name.to_string()))
    }

    fn detect_pointer_width(handle: HANDLE) -> PointerWidth {
        if cfg!(target_pointer_width = "32") {
            return PointerWidth::Bits32;
        }

        let mut wow64 = BOOL::default();
        // SAFETY: handle was opened with PROCESS_QUERY_INFORMATION.
        match unsafe { IsWow64Process(handle, &mut wow64) } {
            Ok(()) if wow64.as_bool() => PointerWidth::Bits32,
            Ok(()) => PointerWidth::Bits64,
            Err(e) => {
                // osu! stable only ships as a 32-bit build
                warn!("IsWow64Process failed ({}), assuming 32-bit target", e);
                PointerWidth::Bits32
            }
        }
    }

    impl ProcessHandle {
        /// Open a process by PID and locate `module_name` inside it
        pub fn open(pid: u32, module_name: &str) -> Result<Self> {
            // SAFETY: OpenProcess has no memory-safety preconditions.
            let handle =
                unsafe { OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid) }
                    .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;

            // Owned from here on so the handle is closed on every error path
            let mut process = Self {
                pid,
                base_address: 0,
                module_size: 0,
                pointer_width: detect_pointer_width(handle),
                handle,
            };

            let (base, size) = find_module(pid, module_name)?;
            process.base_address = base;
            process.module_size = size;
            Ok(process)
        }
    }

    impl Drop for ProcessHandle {
        fn drop(&mut self) {
            // SAFETY: the handle was returned by OpenProcess and is closed exactly once.
            let _ = unsafe { CloseHandle(self.handle) };
        }
    }

    // SAFETY: a process HANDLE is a kernel object reference; the Win32 calls
    // made through it are thread-safe and the handle is never mutated.
    unsafe impl Send for ProcessHandle {}
    // SAFETY: see above.
    unsafe impl Sync for ProcessHandle {}

    impl ReadMemory for ProcessHandle {
        fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
            let mut buffer = vec![0u8; size];
            let mut bytes_read = 0usize;

            // SAFETY: `buffer` provides `size` writable bytes; the foreign range is
            // validated by the OS and a bad range only produces an error.
            unsafe {
                ReadProcessMemory(
                    self.handle,
                    address as *const c_void,
                    buffer.as_mut_ptr() as *mut c_void,
                    size,
                    Some(&mut bytes_read),
                )
            }
            .map_err(|e| Error::read_failed(address, e.to_string()))?;

            if bytes_read != size {
                return Err(Error::read_failed(
                    address,
                    format!("partial read: {} of {} bytes", bytes_read, size),
                ));
            }

            Ok(buffer)
        }

        fn base_address(&self) -> u64 {
            self.base_address
        }

        fn pointer_width(&self) -> PointerWidth {
            self.pointer_width
        }
    }

    impl QueryRegions for ProcessHandle {
        fn query_region(&self, address: u64) -> Option<MemoryRegion> {
            let mut mbi = MEMORY_BASIC_INFORMATION::default();

            // SAFETY: `mbi` is a valid out-buffer of the size passed.
            let written = unsafe {
                VirtualQueryEx(
                    self.handle,
                    Some(address as *const c_void),
                    &mut mbi,
                    std::mem::size_of::<MEMORY_BASIC_INFORMATION>(),
                )
            };

            if written == 0 {
                return None;
            }

            Some(MemoryRegion {
                base: mbi.BaseAddress as u64,
                size: mbi.RegionSize as u64,
                committed: mbi.State == MEM_COMMIT,
                protection: mbi.Protect.0,
            })
        }
    }
}

#[cfg(target_os = "windows")]
use platform::find_process_id;

#[cfg(not(target_os = "windows"))]
mod platform {
    use super::*;

    const UNSUPPORTED: &str = "process memory access is only supported on Windows";

    pub(super) fn find_process_id(_name: &str) -> Result<u32> {
        Err(Error::Unsupported(UNSUPPORTED.to_string()))
    }

    impl ProcessHandle {
        pub fn open(_pid: u32, _module_name: &str) -> Result<Self> {
            Err(Error::Unsupported(UNSUPPORTED.to_string()))
        }
    }

    impl ReadMemory for ProcessHandle {
        fn read_bytes(&self, address: u64, _size: usize) -> Result<Vec<u8>> {
            Err(Error::read_failed(address, UNSUPPORTED))
        }

        fn base_address(&self) -> u64 {
            self.base_address
        }

        fn pointer_width(&self) -> PointerWidth {
            self.pointer_width
        }
    }

    impl QueryRegions for ProcessHandle {
        fn query_region(&self, _address: u64) -> Option<MemoryRegion> {
            None
        }
    }
}

#[cfg(not(target_os = "windows"))]
use platform::find_process_id;
