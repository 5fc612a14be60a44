use anyhow::Context;
use std::sync::Arc;
use tinywire::{Device, EthernetFrame, HostConfig, NetworkInterface, SystemClock, Tap, Ticker};
use tracing::{info, trace};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = HostConfig::from_env()?;

    // Open the existing tap device we created by hand
    let dev = Tap::new(&config.device)
        .with_context(|| format!("failed to open {}", config.device))?;
    let mut iface = NetworkInterface::new(
        dev.name(),
        Box::new(dev.clone()),
        config.ethernet_address,
        config.ip_address,
    );
    let mut ticker = Ticker::new(Arc::new(SystemClock));

    info!(
        "Listening on {} as {} ({}) …",
        config.device, config.ip_address, config.ethernet_address
    );

    let mut buf = [0u8; 1518]; // MTU + Ethernet header + FCS headroom

    loop {
        let n = dev.recv(&mut buf).context("read from tap device")?;
        iface.tick(ticker.elapsed_ms());

        let frame = match EthernetFrame::parse(&buf[..n]) {
            Ok(frame) => frame,
            Err(e) => {
                trace!("ignoring frame: {}", e);
                continue;
            }
        };
        iface.recv_frame(&frame);

        while let Some(dgram) = iface.datagrams_received().pop_front() {
            info!(
                "◀ datagram {} → {} proto={} ttl={} len={}",
                dgram.source(),
                dgram.destination(),
                dgram.header.protocol.0,
                dgram.ttl(),
                dgram.payload.len()
            );
        }
    }
}
