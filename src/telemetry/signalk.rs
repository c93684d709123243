//! SignalK delta messages over UDP
//!
//! The server's UDP input takes one JSON delta per datagram:
//! `{"updates":[{"values":[{"path":"…","value":1.0}],"Source":"…"}]}` plus a newline.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use serde::Serialize;

use super::TelemetryPublisher;
use crate::config::TelemetryConfig;

#[derive(Debug, Serialize)]
struct Delta<'a> {
    updates: [Update<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Update<'a> {
    values: [PathValue<'a>; 1],
    #[serde(rename = "Source")]
    source: &'a str,
}

#[derive(Debug, Serialize)]
struct PathValue<'a> {
    path: &'a str,
    value: f32,
}

/// Serialized single-value delta, newline terminated
pub fn delta_message(path: &str, value: f32, source: &str) -> serde_json::Result<String> {
    let delta = Delta {
        updates: [Update {
            values: [PathValue { path, value }],
            source,
        }],
    };
    let mut message = serde_json::to_string(&delta)?;
    message.push('\n');
    Ok(message)
}

pub struct SignalKUdp {
    enabled: bool,
    server: SocketAddr,
    source: String,
    socket: Option<UdpSocket>,
    /// Set after a failed send, cleared by the next one that goes out
    failing: bool,
}

impl SignalKUdp {
    /// The socket is bound on first use, so this works before the network is up
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            enabled: config.enabled,
            server: config.server,
            source: config.source.clone(),
            socket: None,
            failing: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_bound(&self) -> bool {
        self.socket.is_some()
    }

    pub fn is_failing(&self) -> bool {
        self.failing
    }

    fn socket(&mut self) -> io::Result<&UdpSocket> {
        if self.socket.is_none() {
            let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
            log::info!("Telemetry socket bound to {:?}, sending to {}", socket.local_addr(), self.server);
            self.socket = Some(socket);
        }
        self.socket
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "telemetry socket missing"))
    }

    fn send(&mut self, message: &str) -> io::Result<()> {
        let server = self.server;
        self.socket()?.send_to(message.as_bytes(), server)?;
        Ok(())
    }
}

impl TelemetryPublisher for SignalKUdp {
    fn publish(&mut self, path: &str, value: f32) {
        if !self.enabled {
            return;
        }

        let message = match delta_message(path, value, &self.source) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Dropping {}: {}", path, e);
                return;
            }
        };

        match self.send(&message) {
            Ok(()) if self.failing => {
                log::info!("Telemetry to {} restored", self.server);
                self.failing = false;
            }
            Ok(()) => {}
            Err(e) => {
                if self.failing {
                    log::debug!("Dropping {} = {}: {}", path, value, e);
                } else {
                    log::warn!("Telemetry to {} failing, dropping until it recovers: {}", self.server, e);
                    self.failing = true;
                }
                // Rebind on the next publish, the network may have come back
                self.socket = None;
            }
        }
    }
}
