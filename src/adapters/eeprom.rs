//! EEPROM emulation adapter.
//!
//! Implements [`NvStore`] as a fixed-size byte array.  The ESP32 has no
//! true EEPROM, so the array is mirrored in RAM and persisted as a single
//! NVS blob.
//!
//! - **`target_os = "espidf"`**: every `write` updates the mirror, then
//!   rewrites and commits the blob before returning.
//! - **`not(target_os = "espidf")`**: RAM only, for host tests and
//!   simulation.
//!
//! A fresh device reads as erased memory (all 0xFF), which the schema
//! check in [`persist`](crate::persist) treats as a version mismatch.

use log::info;

use crate::app::ports::{NvStore, StorageError};
use crate::config::EEPROM_SIZE;

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

#[cfg(target_os = "espidf")]
use log::warn;

const ERASED: u8 = 0xFF;

#[cfg(target_os = "espidf")]
const NVS_NAMESPACE: &[u8] = b"seatheat\0";
#[cfg(target_os = "espidf")]
const NVS_KEY: &[u8] = b"eeprom\0";

pub struct EepromAdapter {
    bytes: [u8; EEPROM_SIZE],
}

impl EepromAdapter {
    /// Initialise NVS flash and load the stored image.
    ///
    /// Returns `Err(StorageError::IoError)` if flash initialisation fails
    /// unrecoverably.  A partition with no free pages or a newer NVS
    /// format is erased and re-initialised.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32 || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32 {
                warn!("EepromAdapter: erasing and re-initialising flash partition");
                let ret2 = unsafe { nvs_flash_erase() };
                if ret2 != ESP_OK as i32 {
                    return Err(StorageError::IoError(ret2));
                }
                let ret3 = unsafe { nvs_flash_init() };
                if ret3 != ESP_OK as i32 {
                    return Err(StorageError::IoError(ret3));
                }
            } else if ret != ESP_OK as i32 {
                return Err(StorageError::IoError(ret));
            }

            let mut adapter = Self::erased();
            adapter.load_blob()?;
            info!("EepromAdapter: NVS image loaded");
            Ok(adapter)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("EepromAdapter: simulation backend");
            Ok(Self::erased())
        }
    }

    /// RAM-only store that reads as factory-fresh memory.
    pub fn erased() -> Self {
        Self {
            bytes: [ERASED; EEPROM_SIZE],
        }
    }

    /// RAM-only store pre-filled with `prefix`; the rest reads erased.
    /// Bytes beyond the store size are ignored.
    pub fn with_contents(prefix: &[u8]) -> Self {
        let mut adapter = Self::erased();
        let len = prefix.len().min(EEPROM_SIZE);
        adapter.bytes[..len].copy_from_slice(&prefix[..len]);
        adapter
    }

    /// Current image, for diagnostics and tests.
    pub fn contents(&self) -> &[u8] {
        &self.bytes
    }

    /// Open the NVS namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(NVS_NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn load_blob(&mut self) -> Result<(), StorageError> {
        let bytes = &mut self.bytes;
        let result = Self::with_nvs_handle(false, |handle| {
            let mut size = bytes.len();
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    NVS_KEY.as_ptr() as *const _,
                    bytes.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            Ok(size)
        });

        match result {
            Ok(size) => {
                info!("EepromAdapter: read {} bytes from NVS", size);
                Ok(())
            }
            // A namespace that was never written cannot be opened read-only.
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND as i32 => {
                info!("EepromAdapter: no stored image, starting erased");
                Ok(())
            }
            Err(e) => {
                warn!("EepromAdapter: NVS read error {}", e);
                Err(StorageError::IoError(e))
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn commit_blob(&self) -> Result<(), StorageError> {
        let bytes = &self.bytes;
        Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    NVS_KEY.as_ptr() as *const _,
                    bytes.as_ptr() as *const _,
                    bytes.len(),
                )
            };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            Ok(())
        })
        .map_err(|e| {
            warn!("EepromAdapter: NVS write error {}", e);
            StorageError::IoError(e)
        })
    }
}

impl NvStore for EepromAdapter {
    fn capacity(&self) -> usize {
        EEPROM_SIZE
    }

    fn read(&self, address: usize) -> Result<u8, StorageError> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(StorageError::OutOfBounds(address))
    }

    fn write(&mut self, address: usize, value: u8) -> Result<(), StorageError> {
        let slot = self
            .bytes
            .get_mut(address)
            .ok_or(StorageError::OutOfBounds(address))?;
        if *slot == value {
            return Ok(());
        }
        *slot = value;

        #[cfg(target_os = "espidf")]
        self.commit_blob()?;

        Ok(())
    }
}
