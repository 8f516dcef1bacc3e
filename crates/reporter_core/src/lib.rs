/*!
 * # Reporter Core
 *
 * Hardware independent logic of the DHT22 → MQTT deep-sleep reporter.
 *
 * ## Modules
 * - `lifecycle`: boot-to-publish-to-sleep cycle controller
 * - `readiness` / `connectivity`: WiFi readiness flag and the event bridge feeding it
 * - `boot_counter`: power-cycle counter kept in retained memory
 * - `sensor`: DHT22 frame decoding and status codes
 * - `message` / `session`: outbound payload and broker session contract
 * - `power`: deep-sleep and status indicator abstractions
 * - `config_validation`: checks applied to the build-time configuration
 * - `mock`: recording test doubles
 */

pub mod boot_counter;
pub mod config_validation;
pub mod connectivity;
pub mod lifecycle;
pub mod message;
pub mod mock;
pub mod power;
pub mod readiness;
pub mod sensor;
pub mod session;

pub use boot_counter::{BootCounter, RetainedStore};
pub use connectivity::{ConnectivityBridge, ConnectivityContext, NetworkEvent, StationControl};
pub use lifecycle::{CycleOutcome, CycleReport, CycleSettings, CycleState, LifecycleController};
pub use message::{format_payload, OutboundMessage, PayloadError, QualityOfService, PAYLOAD_CAPACITY};
pub use power::{DeepSleep, DeepSleepError, DeepSleepPlatform, StatusIndicator};
pub use readiness::ReadinessFlag;
pub use sensor::{ClimateSensor, SensorReading, SensorStatus};
pub use session::{
    BrokerEndpoint, BrokerSession, BufferSizes, ConnectOptions, ProtocolVersion, SessionError,
    Transport,
};
