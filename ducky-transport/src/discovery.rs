//! Device discovery for the Ducky control interface

use std::ffi::CString;

use hidapi::HidApi;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::hid_wired::HidWiredTransport;
use crate::protocol::device;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};

/// HID device discovery
///
/// Owns the hidapi context for the lifetime of the process; the library is
/// torn down when this value drops.
pub struct HidDiscovery {
    api: HidApi,
    vid: u16,
    pid: u16,
}

impl HidDiscovery {
    /// Initialise hidapi and look for the supported keyboard
    pub fn new() -> Result<Self, TransportError> {
        Self::for_device(device::VENDOR_ID, device::PRODUCT_ID)
    }

    /// Initialise hidapi and look for a specific VID/PID
    pub fn for_device(vid: u16, pid: u16) -> Result<Self, TransportError> {
        let api = HidApi::new()?;
        Ok(Self { api, vid, pid })
    }

    /// List every HID interface exposed by matching devices
    pub fn list_devices(&self) -> Vec<DiscoveredDevice> {
        self.api
            .device_list()
            .filter(|d| d.vendor_id() == self.vid && d.product_id() == self.pid)
            .map(|d| {
                let info = TransportDeviceInfo {
                    vid: d.vendor_id(),
                    pid: d.product_id(),
                    interface_number: d.interface_number(),
                    device_path: d.path().to_string_lossy().into_owned(),
                    serial: d.serial_number().map(str::to_owned),
                    product_name: d.product_string().map(str::to_owned),
                };
                debug!("Found interface {}", info.describe());
                DiscoveredDevice { info }
            })
            .collect()
    }

    /// Open a discovered interface
    pub fn open_device(
        &self,
        device: &DiscoveredDevice,
    ) -> Result<HidWiredTransport, TransportError> {
        let path = CString::new(device.info.device_path.as_str())
            .map_err(|e| TransportError::HidError(format!("invalid device path: {e}")))?;
        let hid = self.api.open_path(&path)?;
        HidWiredTransport::new(hid, device.info.clone())
    }

    /// Find and open the vendor control interface
    pub fn open_control(&self) -> Result<HidWiredTransport, TransportError> {
        let devices = self.list_devices();
        let control = select_control_interface(&devices)?;
        info!("Using control interface {}", control.info.describe());
        self.open_device(control)
    }
}

/// Pick the vendor control interface among a device's HID interfaces.
///
/// Interface 0 is the boot keyboard and is never selected.
pub fn select_control_interface(
    devices: &[DiscoveredDevice],
) -> Result<&DiscoveredDevice, TransportError> {
    if devices.is_empty() {
        return Err(TransportError::DeviceNotFound(format!(
            "no {:04x}:{:04x} keyboard connected",
            device::VENDOR_ID,
            device::PRODUCT_ID
        )));
    }

    devices
        .iter()
        .find(|d| d.info.interface_number == device::INTERFACE_CONTROL)
        .ok_or_else(|| {
            warn!(
                "Keyboard present but interface {} missing ({} interfaces seen)",
                device::INTERFACE_CONTROL,
                devices.len()
            );
            TransportError::DeviceNotFound(format!(
                "control interface {} not exposed",
                device::INTERFACE_CONTROL
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(n: i32) -> DiscoveredDevice {
        DiscoveredDevice {
            info: TransportDeviceInfo {
                vid: device::VENDOR_ID,
                pid: device::PRODUCT_ID,
                interface_number: n,
                device_path: format!("/dev/hidraw{n}"),
                serial: None,
                product_name: Some("Ducky".into()),
            },
        }
    }

    #[test]
    fn test_selects_interface_one() {
        let devices = vec![iface(0), iface(1), iface(2)];
        let chosen = select_control_interface(&devices).unwrap();
        assert_eq!(chosen.info.interface_number, 1);
        assert_eq!(chosen.info.device_path, "/dev/hidraw1");
    }

    #[test]
    fn test_never_selects_keyboard_interface() {
        let devices = vec![iface(0)];
        assert!(matches!(
            select_control_interface(&devices),
            Err(TransportError::DeviceNotFound(_))
        ));
    }

    #[test]
    fn test_no_devices() {
        assert!(matches!(
            select_control_interface(&[]),
            Err(TransportError::DeviceNotFound(_))
        ));
    }

    #[test]
    #[ignore] // requires hardware
    fn test_open_control_interface() {
        let discovery = HidDiscovery::new().unwrap();
        let transport = discovery.open_control().unwrap();
        assert_eq!(
            crate::Transport::device_info(&transport).interface_number,
            device::INTERFACE_CONTROL
        );
    }
}
