use crate::session::ProtocolVersion;

pub const MAX_CLIENT_ID_LEN: usize = 23;
pub const MIN_BUFFER_SIZE: usize = 128;
pub const MAX_BUFFER_SIZE: usize = 8192;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("wifi_ssid is not set")]
    MissingWifiSsid,
    #[error("mqtt_broker is not set")]
    MissingBrokerHost,
    #[error("mqtt_port must not be 0")]
    InvalidBrokerPort,
    #[error("unsupported mqtt_protocol_version {0} (3 = MQTT 3.1, 4 = MQTT 3.1.1)")]
    UnsupportedProtocolVersion(u8),
    #[error("mqtt_client_id must be 1-{max} bytes: '{0}'", max = MAX_CLIENT_ID_LEN)]
    InvalidClientId(String),
    #[error("invalid publish topic: '{0}'")]
    InvalidTopic(String),
    #[error("sleep_duration_seconds must be greater than 0")]
    InvalidSleepDuration,
    #[error("mqtt_buffer_size must be {min}-{max} bytes: {0}", min = MIN_BUFFER_SIZE, max = MAX_BUFFER_SIZE)]
    InvalidBufferSize(usize),
}

pub fn validate_wifi_ssid(ssid: &str) -> Result<(), ValidationError> {
    if ssid.is_empty() {
        Err(ValidationError::MissingWifiSsid)
    } else {
        Ok(())
    }
}

pub fn validate_broker(host: &str, port: u16) -> Result<(), ValidationError> {
    if host.trim().is_empty() {
        return Err(ValidationError::MissingBrokerHost);
    }
    if port == 0 {
        return Err(ValidationError::InvalidBrokerPort);
    }
    Ok(())
}

pub fn parse_protocol_version(value: u8) -> Result<ProtocolVersion, ValidationError> {
    match value {
        3 => Ok(ProtocolVersion::V3_1),
        4 => Ok(ProtocolVersion::V3_1_1),
        other => Err(ValidationError::UnsupportedProtocolVersion(other)),
    }
}

pub fn validate_client_id(client_id: &str) -> Result<(), ValidationError> {
    if client_id.is_empty() || client_id.len() > MAX_CLIENT_ID_LEN {
        Err(ValidationError::InvalidClientId(client_id.to_string()))
    } else {
        Ok(())
    }
}

/// Publish topics may not be empty or contain wildcards.
pub fn validate_publish_topic(topic: &str) -> Result<(), ValidationError> {
    if topic.is_empty() || topic.contains(|c: char| matches!(c, '#' | '+' | '\0')) {
        Err(ValidationError::InvalidTopic(topic.to_string()))
    } else {
        Ok(())
    }
}

pub fn validate_sleep_duration(seconds: u64) -> Result<(), ValidationError> {
    if seconds == 0 {
        Err(ValidationError::InvalidSleepDuration)
    } else {
        Ok(())
    }
}

pub fn validate_buffer_size(size: usize) -> Result<(), ValidationError> {
    if (MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(ValidationError::InvalidBufferSize(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssid_required() {
        assert_eq!(validate_wifi_ssid(""), Err(ValidationError::MissingWifiSsid));
        assert!(validate_wifi_ssid("farm-ap").is_ok());
    }

    #[test]
    fn broker_host_and_port() {
        assert_eq!(validate_broker("  ", 443), Err(ValidationError::MissingBrokerHost));
        assert_eq!(validate_broker("broker", 0), Err(ValidationError::InvalidBrokerPort));
        assert!(validate_broker("broker", 443).is_ok());
    }

    #[test]
    fn protocol_versions() {
        assert_eq!(parse_protocol_version(3), Ok(ProtocolVersion::V3_1));
        assert_eq!(parse_protocol_version(4), Ok(ProtocolVersion::V3_1_1));
        assert_eq!(
            parse_protocol_version(5),
            Err(ValidationError::UnsupportedProtocolVersion(5))
        );
    }

    #[test]
    fn client_id_length() {
        assert!(validate_client_id("").is_err());
        assert!(validate_client_id("esp32-weather").is_ok());
        assert!(validate_client_id(&"x".repeat(23)).is_ok());
        assert!(validate_client_id(&"x".repeat(24)).is_err());
    }

    #[test]
    fn topic_rules() {
        assert!(validate_publish_topic("iotcebu/testuser/weather").is_ok());
        assert!(validate_publish_topic("").is_err());
        assert!(validate_publish_topic("iotcebu/testuser/pwm/#").is_err());
        assert!(validate_publish_topic("iotcebu/+/weather").is_err());
    }

    #[test]
    fn buffer_bounds() {
        assert!(validate_buffer_size(127).is_err());
        assert!(validate_buffer_size(128).is_ok());
        assert!(validate_buffer_size(512).is_ok());
        assert!(validate_buffer_size(8193).is_err());
    }

    #[test]
    fn messages_name_the_allowed_range() {
        assert_eq!(
            ValidationError::InvalidClientId("".to_string()).to_string(),
            "mqtt_client_id must be 1-23 bytes: ''"
        );
        assert_eq!(
            ValidationError::InvalidBufferSize(64).to_string(),
            "mqtt_buffer_size must be 128-8192 bytes: 64"
        );
    }

    #[test]
    fn sleep_duration_nonzero() {
        assert!(validate_sleep_duration(0).is_err());
        assert!(validate_sleep_duration(10).is_ok());
    }
}
