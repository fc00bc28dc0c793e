//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ControlStore`]: the last-known power, brightness and
//! pattern live as one postcard blob under namespace `moto`, key `ctrl`.
//! ESP-IDF commits are atomic per `nvs_commit()`, so a power cut mid-save
//! leaves the previous blob intact.
//!
//! The simulation backend keeps blobs in a `HashMap` for host tests.

use log::info;

#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::app::control::PersistedControl;
use crate::app::ports::{ControlStore, StorageError};

const CONTROL_NAMESPACE: &str = "moto";
const CONTROL_KEY: &str = "ctrl";

/// Upper bound for the control blob; postcard encodes it in a few bytes.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
const MAX_BLOB_SIZE: usize = 64;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Initialise NVS flash.
    ///
    /// On first boot or after a layout version change the partition is
    /// erased and re-initialised. Returns `IoError` if that fails too.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(StorageError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// NUL-terminated copy of `s`, truncated to the NVS 15-char limit.
    #[cfg(target_os = "espidf")]
    fn c_name(s: &str) -> [u8; 16] {
        let mut buf = [0u8; 16];
        let bytes = s.as_bytes();
        let len = bytes.len().min(15);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open an NVS namespace, run `f` with the handle, then close it.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let ns = Self::c_name(namespace);
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    fn read_blob(&self) -> Result<Vec<u8>, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONTROL_NAMESPACE, CONTROL_KEY);
            self.store
                .borrow()
                .get(&key)
                .cloned()
                .ok_or(StorageError::NotFound)
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(CONTROL_KEY);
            let result = Self::with_nvs_handle(CONTROL_NAMESPACE, false, |handle| {
                let mut buf = [0u8; MAX_BLOB_SIZE];
                let mut size = buf.len();
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(buf[..size].to_vec())
            });
            match result {
                Ok(bytes) => Ok(bytes),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Err(StorageError::NotFound),
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {}", e);
                    Err(StorageError::IoError)
                }
            }
        }
    }

    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONTROL_NAMESPACE, CONTROL_KEY);
            self.store.borrow_mut().insert(key, bytes.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let key = Self::c_name(CONTROL_KEY);
            let result = Self::with_nvs_handle(CONTROL_NAMESPACE, true, |handle| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                warn!("NvsAdapter: NVS write error {}", e);
                StorageError::IoError
            })
        }
    }
}

impl ControlStore for NvsAdapter {
    fn load(&self) -> Result<PersistedControl, StorageError> {
        let bytes = self.read_blob()?;
        let control: PersistedControl =
            postcard::from_bytes(&bytes).map_err(|_| StorageError::Corrupted)?;
        info!("NvsAdapter: loaded control state {:?}", control);
        Ok(control)
    }

    fn save(&mut self, control: &PersistedControl) -> Result<(), StorageError> {
        let bytes = postcard::to_allocvec(control).map_err(|_| StorageError::Corrupted)?;
        self.write_blob(&bytes)?;
        info!("NvsAdapter: control state saved ({} bytes)", bytes.len());
        Ok(())
    }
}
