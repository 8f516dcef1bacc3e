use core::fmt::Write;

use crate::sensor::SensorReading;

/// Capacity of the formatted JSON body in bytes.
pub const PAYLOAD_CAPACITY: usize = 200;

pub type Payload = heapless::String<PAYLOAD_CAPACITY>;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PayloadError {
    #[error("reading is not a finite number: temperature={temperature}, humidity={humidity}")]
    NonFinite { temperature: f32, humidity: f32 },

    #[error("payload does not fit in {cap} bytes", cap = PAYLOAD_CAPACITY)]
    Overflow,
}

/// MQTT delivery guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityOfService {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

/// A message handed to the broker session for one publish call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutboundMessage<'a> {
    pub topic: &'a str,
    pub payload: &'a [u8],
    pub qos: QualityOfService,
    pub retained: bool,
    pub duplicate: bool,
}

impl<'a> OutboundMessage<'a> {
    /// Fire-and-forget message: QoS 0, not retained, not a duplicate.
    pub fn fire_and_forget(topic: &'a str, payload: &'a [u8]) -> Self {
        Self {
            topic,
            payload,
            qos: QualityOfService::AtMostOnce,
            retained: false,
            duplicate: false,
        }
    }
}

/// Formats a reading as `{"temperature":<t>, "humidity": <h> }`, two decimals each.
///
/// # Errors
///
/// `NonFinite` for NaN or infinite values, `Overflow` if the text exceeds the
/// payload buffer.
pub fn format_payload(reading: &SensorReading) -> Result<Payload, PayloadError> {
    if !reading.temperature.is_finite() || !reading.humidity.is_finite() {
        return Err(PayloadError::NonFinite {
            temperature: reading.temperature,
            humidity: reading.humidity,
        });
    }

    let mut body = Payload::new();
    write!(
        body,
        "{{\"temperature\":{:.2}, \"humidity\": {:.2} }}",
        reading.temperature, reading.humidity
    )
    .map_err(|_| PayloadError::Overflow)?;
    Ok(body)
}
