//! Settings for the `tinywire` host binary.
use crate::error::ConfigError;
use crate::ethernet::EthernetAddress;
use std::env;
use std::net::Ipv4Addr;

pub const DEFAULT_DEVICE: &str = "tap0";
pub const DEFAULT_ETHERNET_ADDRESS: EthernetAddress = EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
pub const DEFAULT_IP_ADDRESS: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub device: String,
    pub ethernet_address: EthernetAddress,
    pub ip_address: Ipv4Addr,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            device: DEFAULT_DEVICE.to_string(),
            ethernet_address: DEFAULT_ETHERNET_ADDRESS,
            ip_address: DEFAULT_IP_ADDRESS,
        }
    }
}

impl HostConfig {
    /// Defaults, overridden by `TINYWIRE_DEV`, `TINYWIRE_MAC` and `TINYWIRE_IP`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HostConfig::default();
        if let Some(device) = lookup("TINYWIRE_DEV") {
            config.device = device;
        }
        if let Some(mac) = lookup("TINYWIRE_MAC") {
            config.ethernet_address = mac.parse()?;
        }
        if let Some(ip) = lookup("TINYWIRE_IP") {
            config.ip_address = ip.parse().map_err(|_| ConfigError::IpAddress(ip.clone()))?;
        }
        Ok(config)
    }
}
