//! Recording test doubles.
//!
//! All mocks append to one shared [`CallLog`] so tests can assert on the
//! order of calls across collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::boot_counter::RetainedStore;
use crate::connectivity::StationControl;
use crate::message::{OutboundMessage, QualityOfService};
use crate::power::{DeepSleepPlatform, StatusIndicator};
use crate::sensor::{log_sensor_error, ClimateSensor, SensorReading, SensorStatus};
use crate::session::{
    BrokerEndpoint, BrokerSession, BufferSizes, ConnectOptions, ProtocolVersion, SessionError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    IndicatorOn,
    IndicatorOff,
    OpenChannel {
        uri: String,
        buffers: BufferSizes,
    },
    Handshake {
        client_id: String,
        protocol: ProtocolVersion,
        keep_alive_secs: u64,
        clean_session: bool,
    },
    ReadSensor,
    SensorErrorReported(SensorStatus),
    Publish {
        topic: String,
        payload: String,
        qos: QualityOfService,
        retained: bool,
        duplicate: bool,
    },
    Disconnect,
    CloseChannel,
    DeepSleep(u64),
    StationConnect,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn count_matching(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }
}

/// Stage at which [`MockBrokerSession`] reports an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    ChannelOpen,
    Handshake,
    Publish,
}

pub struct MockBrokerSession {
    log: CallLog,
    fail_at: Option<FailAt>,
}

impl MockBrokerSession {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail_at: None }
    }

    pub fn failing_at(log: CallLog, stage: FailAt) -> Self {
        Self {
            log,
            fail_at: Some(stage),
        }
    }
}

impl BrokerSession for MockBrokerSession {
    fn open_channel(
        &mut self,
        endpoint: &BrokerEndpoint,
        buffers: BufferSizes,
    ) -> Result<(), SessionError> {
        self.log.record(Call::OpenChannel {
            uri: endpoint.uri(),
            buffers,
        });
        if self.fail_at == Some(FailAt::ChannelOpen) {
            return Err(SessionError::ChannelOpen("connection refused (-0x0052)".to_string()));
        }
        Ok(())
    }

    fn handshake(&mut self, options: &ConnectOptions) -> Result<(), SessionError> {
        self.log.record(Call::Handshake {
            client_id: options.client_id.clone(),
            protocol: options.protocol,
            keep_alive_secs: options.keep_alive.as_secs(),
            clean_session: options.clean_session,
        });
        if self.fail_at == Some(FailAt::Handshake) {
            return Err(SessionError::Handshake("CONNACK: not authorized".to_string()));
        }
        Ok(())
    }

    fn publish(&mut self, message: &OutboundMessage<'_>) -> Result<(), SessionError> {
        self.log.record(Call::Publish {
            topic: message.topic.to_string(),
            payload: String::from_utf8_lossy(message.payload).into_owned(),
            qos: message.qos,
            retained: message.retained,
            duplicate: message.duplicate,
        });
        if self.fail_at == Some(FailAt::Publish) {
            return Err(SessionError::Publish("transport write failed".to_string()));
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        self.log.record(Call::Disconnect);
    }

    fn close_channel(&mut self) {
        self.log.record(Call::CloseChannel);
    }
}

/// Sensor returning scripted results in order, then timing out.
pub struct MockSensor {
    log: CallLog,
    script: VecDeque<Result<SensorReading, SensorStatus>>,
}

impl MockSensor {
    pub fn new(log: CallLog, script: Vec<Result<SensorReading, SensorStatus>>) -> Self {
        Self {
            log,
            script: script.into(),
        }
    }
}

impl ClimateSensor for MockSensor {
    fn read(&mut self) -> Result<SensorReading, SensorStatus> {
        self.log.record(Call::ReadSensor);
        self.script
            .pop_front()
            .unwrap_or(Err(SensorStatus::TimeoutError))
    }

    fn report_error(&mut self, status: SensorStatus) {
        self.log.record(Call::SensorErrorReported(status));
        log_sensor_error(status);
    }
}

pub struct MockIndicator {
    log: CallLog,
}

impl MockIndicator {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl StatusIndicator for MockIndicator {
    type Error = String;

    fn turn_on(&mut self) -> Result<(), Self::Error> {
        self.log.record(Call::IndicatorOn);
        Ok(())
    }

    fn turn_off(&mut self) -> Result<(), Self::Error> {
        self.log.record(Call::IndicatorOff);
        Ok(())
    }
}

/// Records the requested duration and returns, unlike the real chip.
pub struct MockDeepSleep {
    log: CallLog,
}

impl MockDeepSleep {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl DeepSleepPlatform for MockDeepSleep {
    fn deep_sleep(&self, duration_us: u64) {
        self.log.record(Call::DeepSleep(duration_us));
    }
}

pub struct MockStation {
    log: CallLog,
}

impl MockStation {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl StationControl for MockStation {
    fn connect(&self) -> Result<(), String> {
        self.log.record(Call::StationConnect);
        Ok(())
    }
}

/// RTC slow memory: kept across deep sleep, reinitialised by any other reset.
#[derive(Debug, Default)]
pub struct SimulatedRtcMemory {
    value: u32,
}

impl SimulatedRtcMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deep_sleep_and_wake(&mut self) {}

    /// Power loss, reset pin, software restart, watchdog or panic.
    pub fn cold_reset(&mut self) {
        self.value = 0;
    }
}

impl RetainedStore for SimulatedRtcMemory {
    fn load(&self) -> u32 {
        self.value
    }

    fn store(&mut self, value: u32) {
        self.value = value;
    }
}
