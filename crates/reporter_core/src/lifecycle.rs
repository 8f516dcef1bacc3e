//! Boot-to-publish-to-sleep cycle.
//!
//! ```text
//! AwaitingLink → ChannelOpen → Handshaking → Measuring → Publishing → TearingDown → Sleeping
//!                     └─────────────┴────────────┴────────────┴──────────┘ (on failure)
//! ```
//!
//! Nothing is retried. Teardown and power down run exactly once on every path.

use log::{debug, error, info, warn};

use crate::connectivity::ConnectivityContext;
use crate::message::{format_payload, OutboundMessage};
use crate::power::{DeepSleep, DeepSleepPlatform, StatusIndicator};
use crate::sensor::{ClimateSensor, SensorReading, SensorStatus};
use crate::session::{BrokerEndpoint, BrokerSession, BufferSizes, ConnectOptions, SessionError};

/// Everything a cycle needs that does not change between boots.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub endpoint: BrokerEndpoint,
    pub connect: ConnectOptions,
    pub buffers: BufferSizes,
    pub topic: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    AwaitingLink,
    ChannelOpen,
    Handshaking,
    Measuring,
    Publishing,
    TearingDown,
    Sleeping,
}

#[derive(Debug)]
pub enum CycleOutcome {
    Published,
    Aborted {
        stage: CycleState,
        error: SessionError,
    },
}

/// What happened during one cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub states: Vec<CycleState>,
    pub outcome: CycleOutcome,
    /// `None` when the cycle aborted before measuring.
    pub sensor_status: Option<SensorStatus>,
    pub published_payload: Option<String>,
}

impl CycleReport {
    fn new() -> Self {
        Self {
            states: Vec::with_capacity(7),
            outcome: CycleOutcome::Published,
            sensor_status: None,
            published_payload: None,
        }
    }

    fn enter(&mut self, state: CycleState) {
        debug!("cycle state: {:?}", state);
        self.states.push(state);
    }

    pub fn published(&self) -> bool {
        matches!(self.outcome, CycleOutcome::Published)
    }

    pub fn failed_stage(&self) -> Option<CycleState> {
        match self.outcome {
            CycleOutcome::Published => None,
            CycleOutcome::Aborted { stage, .. } => Some(stage),
        }
    }

    pub fn summary(&self) -> String {
        let outcome = match &self.outcome {
            CycleOutcome::Published => "published".to_string(),
            CycleOutcome::Aborted { stage, error } => format!("aborted at {:?} ({})", stage, error),
        };
        let sensor = match self.sensor_status {
            Some(status) => format!("{:?}", status),
            None => "not read".to_string(),
        };
        format!("{}, sensor: {}, states: {}", outcome, sensor, self.states.len())
    }
}

/// Runs one reporting cycle per boot.
pub struct LifecycleController<B, S, I, P>
where
    B: BrokerSession,
    S: ClimateSensor,
    I: StatusIndicator,
    P: DeepSleepPlatform,
{
    settings: CycleSettings,
    session: B,
    sensor: S,
    indicator: I,
    sleep: DeepSleep<P>,
    last_reading: SensorReading,
}

impl<B, S, I, P> LifecycleController<B, S, I, P>
where
    B: BrokerSession,
    S: ClimateSensor,
    I: StatusIndicator,
    P: DeepSleepPlatform,
{
    pub fn new(settings: CycleSettings, session: B, sensor: S, indicator: I, sleep: DeepSleep<P>) -> Self {
        Self {
            settings,
            session,
            sensor,
            indicator,
            sleep,
            last_reading: SensorReading::default(),
        }
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    /// Values that the next failed read would publish.
    pub fn last_reading(&self) -> SensorReading {
        self.last_reading
    }

    /// Runs one cycle and ends in deep sleep.
    ///
    /// Blocks without limit until `connectivity` reports an address.
    /// On hardware the final sleep call does not return.
    pub fn run_cycle(&mut self, connectivity: &ConnectivityContext) -> CycleReport {
        let mut report = CycleReport::new();

        if let Err(e) = self.indicator.turn_on() {
            warn!("Failed to turn on status indicator: {:?}", e);
        }

        report.enter(CycleState::AwaitingLink);
        debug!("Wait for WiFi ...");
        connectivity.wait_until_ready();
        info!("Connected to AP");

        if let Err((stage, error)) = self.forward(&mut report) {
            error!("{:?} not successful: {}", stage, error);
            report.outcome = CycleOutcome::Aborted { stage, error };
        }

        self.teardown(&mut report);
        self.power_down(&mut report);
        report
    }

    fn forward(&mut self, report: &mut CycleReport) -> Result<(), (CycleState, SessionError)> {
        report.enter(CycleState::ChannelOpen);
        info!("Opening channel to {}", self.settings.endpoint.uri());
        self.session
            .open_channel(&self.settings.endpoint, self.settings.buffers)
            .map_err(|e| (CycleState::ChannelOpen, e))?;

        report.enter(CycleState::Handshaking);
        info!("MQTT connect as '{}'", self.settings.connect.client_id);
        self.session
            .handshake(&self.settings.connect)
            .map_err(|e| (CycleState::Handshaking, e))?;
        info!("MQTT Connected!");

        report.enter(CycleState::Measuring);
        let reading = self.measure(report);

        report.enter(CycleState::Publishing);
        self.publish(&reading, report)
            .map_err(|e| (CycleState::Publishing, e))
    }

    fn measure(&mut self, report: &mut CycleReport) -> SensorReading {
        match self.sensor.read() {
            Ok(reading) => {
                info!("Temperature : {:.1}", reading.temperature);
                info!("Humidity : {:.1}", reading.humidity);
                self.last_reading = reading;
                report.sensor_status = Some(SensorStatus::Ok);
            }
            Err(status) => {
                self.sensor.report_error(status);
                report.sensor_status = Some(status);
                warn!(
                    "Sensor read failed ({}), publishing last held values",
                    status.code()
                );
            }
        }
        self.last_reading
    }

    fn publish(&mut self, reading: &SensorReading, report: &mut CycleReport) -> Result<(), SessionError> {
        let body = format_payload(reading)?;
        let message = OutboundMessage::fire_and_forget(&self.settings.topic, body.as_bytes());

        info!("MQTTPublish ... {}", body);
        self.session.publish(&message)?;
        report.published_payload = Some(body.as_str().to_string());
        Ok(())
    }

    fn teardown(&mut self, report: &mut CycleReport) {
        report.enter(CycleState::TearingDown);
        self.session.disconnect();
        self.session.close_channel();
        info!("Broker session closed");
    }

    fn power_down(&mut self, report: &mut CycleReport) {
        report.enter(CycleState::Sleeping);
        if let Err(e) = self.indicator.turn_off() {
            warn!("Failed to turn off status indicator: {:?}", e);
        }
        info!("Cycle finished: {}", report.summary());
        self.sleep.enter();
    }
}
