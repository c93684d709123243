use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

#[derive(Debug)]
pub struct WifiNetwork<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
    pub auth_method: AuthMethod,
}

impl<'a> WifiNetwork<'a> {
    /// An empty password means an open network
    pub fn new(ssid: &'a str, password: &'a str) -> Self {
        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        Self {
            ssid,
            password,
            auth_method,
        }
    }
}

/// Station mode link used for telemetry and SNTP
///
/// The panel works without it, so a failed join is reported, never fatal.
pub struct WifiManager {
    wifi: BlockingWifi<EspWifi<'static>>,
    current_ssid: Option<String>,
}

impl WifiManager {
    pub fn new(modem: Modem, sys_loop: EspSystemEventLoop, nvs: EspDefaultNvsPartition) -> Result<Self> {
        let wifi = BlockingWifi::wrap(EspWifi::new(modem, sys_loop.clone(), Some(nvs))?, sys_loop)?;
        Ok(Self {
            wifi,
            current_ssid: None,
        })
    }

    /// Keep trying the known networks that are in range until one joins or `timeout` passes
    pub fn connect(&mut self, networks: &[WifiNetwork<'_>], timeout: Duration) -> Result<()> {
        let started = Instant::now();
        let available = self.scan_networks()?;
        info!("Found {} available networks", available.len());

        let known: Vec<_> = networks
            .iter()
            .filter(|n| available.iter().any(|ssid| ssid == n.ssid))
            .collect();
        if known.is_empty() {
            return Err(anyhow::anyhow!("No known networks available"));
        }

        while started.elapsed() < timeout {
            for network in known.iter() {
                info!("Connecting to {}", network.ssid);
                match self.connect_to_network(network) {
                    Ok(()) => {
                        self.current_ssid = Some(network.ssid.to_string());
                        info!("Connected to {} after {:?}", network.ssid, started.elapsed());
                        return Ok(());
                    }
                    Err(e) => {
                        warn!("Failed to connect to {}: {}", network.ssid, e);
                        // A half-open association blocks the next try
                        let _ = self.wifi.disconnect();
                    }
                }
            }
        }

        Err(anyhow::anyhow!("No connection within {:?}", timeout))
    }

    fn scan_networks(&mut self) -> Result<Vec<String>> {
        self.wifi
            .set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
        self.wifi.start().context("Starting WiFi for scan")?;

        let ap_infos = self.wifi.scan()?;
        Ok(ap_infos.iter().map(|ap| ap.ssid.to_string()).collect())
    }

    fn connect_to_network(&mut self, network: &WifiNetwork<'_>) -> Result<()> {
        let wifi_config = Configuration::Client(ClientConfiguration {
            ssid: network
                .ssid
                .try_into()
                .map_err(|_| anyhow::anyhow!("SSID too long: {}", network.ssid))?,
            password: network
                .password
                .try_into()
                .map_err(|_| anyhow::anyhow!("Password too long"))?,
            auth_method: network.auth_method,
            ..Default::default()
        });

        self.wifi.set_configuration(&wifi_config)?;
        self.wifi.connect()?;
        self.wifi.wait_netif_up()?;
        Ok(())
    }

    pub fn ip(&self) -> Option<Ipv4Addr> {
        let ip_info = self.wifi.wifi().sta_netif().get_ip_info().ok()?;
        Some(ip_info.ip)
    }

    pub fn current_ssid(&self) -> Option<&str> {
        self.current_ssid.as_deref()
    }

    /// Live association state, it drops when the access point goes away
    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }
}
