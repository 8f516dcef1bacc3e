use log::{info, warn};
use std::sync::Arc;

use crate::readiness::ReadinessFlag;

/// Network stack events the reporter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkEvent {
    /// Station mode is up; an association attempt should start.
    StationStarted,
    /// DHCP handed out an address.
    AddressAcquired,
    /// Link to the access point was lost.
    Disconnected,
}

/// Starts an association attempt with the configured access point.
pub trait StationControl {
    fn connect(&self) -> Result<(), String>;
}

/// Readiness state shared by the network callback and the reporting task.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityContext {
    flag: Arc<ReadinessFlag>,
}

impl ConnectivityContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readiness(&self) -> &ReadinessFlag {
        &self.flag
    }

    /// Blocks until the station holds an address.
    pub fn wait_until_ready(&self) {
        self.flag.wait();
    }
}

/// Turns network stack events into readiness flag updates.
///
/// Reconnects immediately on disconnect, without backoff.
pub struct ConnectivityBridge<C: StationControl> {
    context: ConnectivityContext,
    station: C,
}

impl<C: StationControl> ConnectivityBridge<C> {
    pub fn new(context: ConnectivityContext, station: C) -> Self {
        Self { context, station }
    }

    pub fn handle(&self, event: NetworkEvent) {
        match event {
            NetworkEvent::StationStarted => {
                info!("WiFi station started, connecting");
                self.request_connect();
            }
            NetworkEvent::AddressAcquired => {
                info!("IP address acquired");
                self.context.readiness().set();
            }
            NetworkEvent::Disconnected => {
                warn!("WiFi disconnected, reconnecting");
                self.context.readiness().clear();
                self.request_connect();
            }
        }
    }

    pub fn context(&self) -> &ConnectivityContext {
        &self.context
    }

    fn request_connect(&self) {
        if let Err(e) = self.station.connect() {
            warn!("WiFi connect request failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingStation {
        calls: Cell<u32>,
        fail: bool,
    }

    impl StationControl for CountingStation {
        fn connect(&self) -> Result<(), String> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err("ESP_ERR_WIFI_CONN".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn bridge(fail: bool) -> ConnectivityBridge<CountingStation> {
        ConnectivityBridge::new(
            ConnectivityContext::new(),
            CountingStation {
                calls: Cell::new(0),
                fail,
            },
        )
    }

    #[test]
    fn station_started_only_requests_connect() {
        let bridge = bridge(false);
        bridge.handle(NetworkEvent::StationStarted);
        assert_eq!(bridge.station.calls.get(), 1);
        assert!(!bridge.context().readiness().is_set());
    }

    #[test]
    fn address_acquired_sets_flag_without_connecting() {
        let bridge = bridge(false);
        bridge.handle(NetworkEvent::AddressAcquired);
        assert!(bridge.context().readiness().is_set());
        assert_eq!(bridge.station.calls.get(), 0);
    }

    #[test]
    fn disconnect_clears_flag_and_reconnects() {
        let bridge = bridge(false);
        bridge.handle(NetworkEvent::AddressAcquired);
        bridge.handle(NetworkEvent::Disconnected);
        assert!(!bridge.context().readiness().is_set());
        assert_eq!(bridge.station.calls.get(), 1);
    }

    #[test]
    fn failed_connect_request_is_not_fatal() {
        let bridge = bridge(true);
        bridge.handle(NetworkEvent::StationStarted);
        bridge.handle(NetworkEvent::Disconnected);
        assert_eq!(bridge.station.calls.get(), 2);
        assert!(!bridge.context().readiness().is_set());
    }

    #[test]
    fn context_clones_share_one_flag() {
        let context = ConnectivityContext::new();
        let clone = context.clone();
        clone.readiness().set();
        assert!(context.readiness().is_set());
    }
}
