//! Downlink configuration commands.

use crate::constants::*;
use crate::frame::{put_item, seal_frame};

/// MQTT broker settings pushed down to a device.
///
/// On the wire this is a single text payload: the seven fields joined
/// by single spaces, with the down topic before the up topic. That
/// field order is what deployed firmware parses; do not reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttSetting {
    /// Broker host name or address.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// MQTT client id.
    pub client_id: String,
    /// Topic the device publishes to.
    pub up_topic: String,
    /// Topic the device subscribes to.
    pub down_topic: String,
}

impl MqttSetting {
    fn to_wire_string(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.host,
            self.port,
            self.username,
            self.password,
            self.client_id,
            self.down_topic,
            self.up_topic
        )
    }
}

/// A downlink configuration command.
///
/// Each present field emits one TLV item; an unset or zero field emits
/// nothing (zero is never a legal configured value here). An entirely
/// empty command still encodes to a minimal, well-formed frame; the
/// protocol has no notion of an invalid combination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    /// How often the device uplinks, in seconds. Sent on the wire in
    /// whole minutes (integer truncation).
    pub report_interval_secs: Option<u32>,
    /// How often the device samples its sensors, in seconds.
    pub collect_interval_secs: Option<u32>,
    /// Valve opening to drive to, percent. Scaled ×10 on the wire.
    pub valve_open_percent: Option<f64>,
    /// Trigger a valve self-check cycle.
    pub valve_self_check: bool,
    /// Tell the device the command stream is finished.
    pub end_flag: bool,
    /// MQTT broker settings.
    pub mqtt: Option<MqttSetting>,
}

impl Command {
    /// Command type byte: valve commands use their own type.
    pub fn cmd_type(&self) -> u8 {
        let has_valve =
            self.valve_open_percent.filter(|v| *v > 0.0).is_some() || self.valve_self_check;
        if has_valve {
            CMD_TYPE_VALVE
        } else {
            CMD_TYPE_CONFIG
        }
    }

    /// Encode the command as a complete downlink frame, checksum
    /// trailer included.
    pub fn encode(&self) -> Vec<u8> {
        let mut items = Vec::new();

        if let Some(secs) = self.collect_interval_secs.filter(|s| *s > 0) {
            put_item(&mut items, KEY_COLLECT_INTERVAL, &(secs as u16).to_le_bytes());
        }

        if let Some(secs) = self.report_interval_secs.filter(|s| *s > 0) {
            let minutes = (secs / 60) as u16;
            put_item(&mut items, KEY_REPORT_INTERVAL, &minutes.to_le_bytes());
        }

        if let Some(percent) = self.valve_open_percent.filter(|v| *v > 0.0) {
            let scaled = (percent * 10.0) as u16;
            put_item(&mut items, KEY_VALVE_OPEN, &scaled.to_le_bytes());
        }

        if self.valve_self_check {
            put_item(&mut items, KEY_VALVE_SELF_CHECK, &[0]);
        }

        if let Some(mqtt) = &self.mqtt {
            put_item(&mut items, KEY_MQTT, mqtt.to_wire_string().as_bytes());
        }

        if self.end_flag {
            put_item(&mut items, KEY_END_FLAG, &[1]);
        }

        seal_frame(self.cmd_type(), &items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire;

    fn items_of(frame: &[u8]) -> &[u8] {
        let len = u16::from_le_bytes([frame[3], frame[4]]) as usize;
        &frame[5..5 + len]
    }

    #[test]
    fn test_empty_command_is_a_minimal_frame() {
        let frame = Command::default().encode();
        assert_eq!(frame[..5], [0x43, 0x47, CMD_TYPE_CONFIG, 0, 0]);
        // Header plus checksum only.
        assert_eq!(frame.len(), 7);
    }

    #[test]
    fn test_report_interval_sent_in_minutes() {
        let cmd = Command {
            report_interval_secs: Some(3600),
            ..Default::default()
        };
        let frame = cmd.encode();
        assert_eq!(items_of(&frame), &[KEY_REPORT_INTERVAL, 2, 0, 60, 0]);
    }

    #[test]
    fn test_collect_interval_sent_in_raw_seconds() {
        let cmd = Command {
            collect_interval_secs: Some(300),
            ..Default::default()
        };
        let frame = cmd.encode();
        assert_eq!(items_of(&frame), &[KEY_COLLECT_INTERVAL, 2, 0, 0x2C, 0x01]);
    }

    #[test]
    fn test_valve_open_switches_cmd_type_and_scales() {
        let cmd = Command {
            valve_open_percent: Some(50.0),
            ..Default::default()
        };
        let frame = cmd.encode();
        assert_eq!(frame[2], CMD_TYPE_VALVE);
        // 50 × 10 = 500 = 0x01F4
        assert_eq!(items_of(&frame), &[KEY_VALVE_OPEN, 2, 0, 0xF4, 0x01]);
    }

    #[test]
    fn test_valve_self_check_payload_is_zero() {
        let cmd = Command {
            valve_self_check: true,
            ..Default::default()
        };
        let frame = cmd.encode();
        assert_eq!(frame[2], CMD_TYPE_VALVE);
        assert_eq!(items_of(&frame), &[KEY_VALVE_SELF_CHECK, 1, 0, 0]);
    }

    #[test]
    fn test_mqtt_wire_order_puts_down_topic_first() {
        let cmd = Command {
            mqtt: Some(MqttSetting {
                host: "broker.local".into(),
                port: 1883,
                username: "user".into(),
                password: "pass".into(),
                client_id: "dev-01".into(),
                up_topic: "site/up".into(),
                down_topic: "site/down".into(),
            }),
            ..Default::default()
        };
        let frame = cmd.encode();
        let items = items_of(&frame);
        assert_eq!(items[0], KEY_MQTT);
        let text = std::str::from_utf8(&items[3..]).unwrap();
        assert_eq!(text, "broker.local 1883 user pass dev-01 site/down site/up");
    }

    #[test]
    fn test_item_order_and_checksum() {
        let cmd = Command {
            report_interval_secs: Some(600),
            collect_interval_secs: Some(60),
            end_flag: true,
            ..Default::default()
        };
        let frame = cmd.encode();

        let items = items_of(&frame);
        // Collect interval always precedes report interval.
        assert_eq!(items[0], KEY_COLLECT_INTERVAL);
        assert_eq!(items[5], KEY_REPORT_INTERVAL);
        assert_eq!(items[10], KEY_END_FLAG);
        assert_eq!(items[13], 1);

        let crc = u16::from_le_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
        assert_eq!(crc, wire::checksum(&frame[..frame.len() - 2]));
    }

    #[test]
    fn test_zero_valued_fields_emit_nothing() {
        let cmd = Command {
            report_interval_secs: Some(0),
            collect_interval_secs: Some(0),
            valve_open_percent: Some(0.0),
            ..Default::default()
        };
        let frame = cmd.encode();
        assert_eq!(frame[2], CMD_TYPE_CONFIG);
        assert!(items_of(&frame).is_empty());
    }

    #[test]
    fn test_encoded_frame_decodes_as_settings_echo() {
        // The uplink decoder understands the shared keys, which makes
        // for a convenient cross-check of both paths.
        let cmd = Command {
            report_interval_secs: Some(3600),
            end_flag: true,
            ..Default::default()
        };
        let result = crate::decode_frame(&cmd.encode()).unwrap();
        assert_eq!(result.report_interval_secs, Some(3600));
        assert_eq!(result.end_flag, Some(true));
    }
}
