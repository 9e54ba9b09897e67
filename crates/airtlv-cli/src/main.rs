//! Command-line frontend: hex or base64 frames in, JSON out, and the
//! reverse direction for building configuration downlinks.

use anyhow::{Context, Result};
use base64::prelude::*;
use clap::{Parser, Subcommand};

use airtlv_protocol::{decode_frame, Command, MqttSetting};

#[derive(Parser)]
#[command(name = "airtlv", about = "Sensor TLV frame codec", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Decode an uplink frame and print the readings as JSON.
    Decode {
        /// Frame bytes, hex-encoded (or base64 with --base64).
        input: String,

        /// Treat the input as base64 instead of hex.
        #[arg(long)]
        base64: bool,
    },

    /// Build a configuration downlink frame and print it hex-encoded.
    Encode {
        /// Report interval in seconds (sent in whole minutes).
        #[arg(long)]
        report_interval: Option<u32>,

        /// Collect interval in seconds.
        #[arg(long)]
        collect_interval: Option<u32>,

        /// Valve opening in percent.
        #[arg(long)]
        valve_open: Option<f64>,

        /// Trigger a valve self-check.
        #[arg(long)]
        valve_self_check: bool,

        /// Append the end-of-command flag.
        #[arg(long)]
        end_flag: bool,

        /// MQTT settings as "host port username password clientId upTopic downTopic".
        #[arg(long)]
        mqtt: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Cmd::Decode { input, base64 } => {
            let bytes = if base64 {
                BASE64_STANDARD
                    .decode(input.trim())
                    .context("invalid base64 input")?
            } else {
                hex::decode(input.trim()).context("invalid hex input")?
            };

            log::debug!("decoding {} byte frame", bytes.len());
            let result = decode_frame(&bytes)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Cmd::Encode {
            report_interval,
            collect_interval,
            valve_open,
            valve_self_check,
            end_flag,
            mqtt,
        } => {
            let cmd = Command {
                report_interval_secs: report_interval,
                collect_interval_secs: collect_interval,
                valve_open_percent: valve_open,
                valve_self_check,
                end_flag,
                mqtt: mqtt.as_deref().map(parse_mqtt).transpose()?,
            };

            println!("{}", hex::encode(cmd.encode()));
        }
    }

    Ok(())
}

/// Parse the seven space-separated MQTT fields in the order a user
/// would state them (up topic before down topic; the wire order is the
/// encoder's concern).
fn parse_mqtt(arg: &str) -> Result<MqttSetting> {
    let fields: Vec<&str> = arg.split_whitespace().collect();
    anyhow::ensure!(
        fields.len() == 7,
        "expected 7 MQTT fields (host port username password clientId upTopic downTopic), got {}",
        fields.len()
    );

    Ok(MqttSetting {
        host: fields[0].to_string(),
        port: fields[1]
            .parse()
            .with_context(|| format!("invalid MQTT port: {}", fields[1]))?,
        username: fields[2].to_string(),
        password: fields[3].to_string(),
        client_id: fields[4].to_string(),
        up_topic: fields[5].to_string(),
        down_topic: fields[6].to_string(),
    })
}
