//! Common types for the transport layer

/// Device identification information
#[derive(Debug, Clone)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// USB interface number
    pub interface_number: i32,
    /// Platform device path (hidraw node on Linux)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Short human-readable identifier for logs
    pub fn describe(&self) -> String {
        format!(
            "{:04x}:{:04x} if{} {} ({})",
            self.vid,
            self.pid,
            self.interface_number,
            self.product_name.as_deref().unwrap_or("unknown"),
            self.device_path
        )
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}
