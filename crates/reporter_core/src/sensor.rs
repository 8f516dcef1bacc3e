use log::error;

/// DHT22 read status. The numeric codes are the ones reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorStatus {
    Ok,
    ChecksumError,
    TimeoutError,
}

impl SensorStatus {
    pub fn code(&self) -> i32 {
        match self {
            SensorStatus::Ok => 0,
            SensorStatus::ChecksumError => -1,
            SensorStatus::TimeoutError => -2,
        }
    }
}

/// One temperature/humidity measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    /// °C
    pub temperature: f32,
    /// %RH
    pub humidity: f32,
}

impl SensorReading {
    pub fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }
}

/// A single-wire temperature/humidity sensor.
pub trait ClimateSensor {
    /// One blocking read. Never returns `Err(SensorStatus::Ok)`.
    fn read(&mut self) -> Result<SensorReading, SensorStatus>;

    /// Diagnostic hook for a failed read. Logs by default.
    fn report_error(&mut self, status: SensorStatus) {
        log_sensor_error(status);
    }
}

/// Diagnostic text for a read status.
///
/// `Ok` has no error meaning; reaching the handler with it is reported as
/// unknown.
pub fn sensor_error_message(status: SensorStatus) -> &'static str {
    match status {
        SensorStatus::TimeoutError => "Sensor Timeout",
        SensorStatus::ChecksumError => "CheckSum error",
        SensorStatus::Ok => "Unknown error",
    }
}

pub fn log_sensor_error(status: SensorStatus) {
    error!("{} ({})", sensor_error_message(status), status.code());
}

/// Number of bytes in a DHT22 frame: humidity (2), temperature (2), checksum.
pub const DHT22_FRAME_LEN: usize = 5;

/// A high pulse longer than this is a `1` bit.
pub const DHT22_ONE_THRESHOLD_US: u32 = 40;

/// Line timing limits used while clocking a frame in, in microseconds.
pub mod timing {
    pub const START_LOW_US: u32 = 3000;
    pub const START_RELEASE_US: u32 = 25;
    pub const RESPONSE_TIMEOUT_US: u32 = 85;
    pub const BIT_LOW_TIMEOUT_US: u32 = 56;
    pub const BIT_HIGH_TIMEOUT_US: u32 = 75;
}

/// Classifies the duration of a data bit's high phase.
pub fn bit_from_high_pulse(high_us: u32) -> bool {
    high_us > DHT22_ONE_THRESHOLD_US
}

/// Packs 40 bits, most significant first, into a frame.
pub fn pack_bits(bits: &[bool; DHT22_FRAME_LEN * 8]) -> [u8; DHT22_FRAME_LEN] {
    let mut frame = [0u8; DHT22_FRAME_LEN];
    for (i, bit) in bits.iter().enumerate() {
        if *bit {
            frame[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    frame
}

/// Verifies the checksum and converts a raw frame into a reading.
pub fn decode_frame(frame: &[u8; DHT22_FRAME_LEN]) -> Result<SensorReading, SensorStatus> {
    let sum = frame[..4]
        .iter()
        .fold(0u8, |acc, byte| acc.wrapping_add(*byte));
    if sum != frame[4] {
        return Err(SensorStatus::ChecksumError);
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;

    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    Ok(SensorReading::new(temperature, humidity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_checksum(bytes: [u8; 4]) -> [u8; 5] {
        let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        [bytes[0], bytes[1], bytes[2], bytes[3], sum]
    }

    #[test]
    fn error_messages_per_status() {
        assert_eq!(sensor_error_message(SensorStatus::TimeoutError), "Sensor Timeout");
        assert_eq!(sensor_error_message(SensorStatus::ChecksumError), "CheckSum error");
        assert_eq!(sensor_error_message(SensorStatus::Ok), "Unknown error");
    }

    #[test]
    fn decodes_positive_temperature() {
        // 65.2 %RH, 35.1 °C
        let frame = with_checksum([0x02, 0x8C, 0x01, 0x5F]);
        let reading = decode_frame(&frame).unwrap();
        assert!((reading.humidity - 65.2).abs() < 1e-4);
        assert!((reading.temperature - 35.1).abs() < 1e-4);
    }

    #[test]
    fn decodes_negative_temperature() {
        // -10.1 °C
        let frame = with_checksum([0x01, 0xF4, 0x80, 0x65]);
        let reading = decode_frame(&frame).unwrap();
        assert!((reading.temperature + 10.1).abs() < 1e-4);
        assert!((reading.humidity - 50.0).abs() < 1e-4);
    }

    #[test]
    fn checksum_wraps_at_one_byte() {
        let frame = with_checksum([0xFF, 0xFF, 0x00, 0x10]);
        assert_eq!(frame[4], 0x0E);
        assert!(decode_frame(&frame).is_ok());
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut frame = with_checksum([0x02, 0x8C, 0x01, 0x5F]);
        frame[4] ^= 0x01;
        assert_eq!(decode_frame(&frame), Err(SensorStatus::ChecksumError));
    }

    #[test]
    fn pulse_threshold() {
        assert!(!bit_from_high_pulse(26));
        assert!(!bit_from_high_pulse(40));
        assert!(bit_from_high_pulse(41));
        assert!(bit_from_high_pulse(70));
    }

    #[test]
    fn packs_msb_first() {
        let mut bits = [false; 40];
        bits[0] = true;
        bits[15] = true;
        bits[39] = true;
        assert_eq!(pack_bits(&bits), [0x80, 0x01, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn status_codes() {
        assert_eq!(SensorStatus::Ok.code(), 0);
        assert_eq!(SensorStatus::ChecksumError.code(), -1);
        assert_eq!(SensorStatus::TimeoutError.code(), -2);
    }
}
