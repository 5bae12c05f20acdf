use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use slabridge_frame::{encode_hex, Packet};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One translated line, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct PacketRecord {
    /// 1-based input line number.
    pub line: usize,
    pub source: String,
    pub command: &'static str,
    pub length: usize,
    pub hex: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl PacketRecord {
    pub fn new(line: usize, source: &str, packet: &Packet) -> Self {
        Self {
            line,
            source: source.trim().to_string(),
            command: packet.name(),
            length: packet.len(),
            hex: encode_hex(packet.as_bytes()),
            bytes: packet.as_bytes().to_vec(),
        }
    }
}

pub fn print_packets(records: &[PacketRecord], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for record in records {
                println!(
                    "{}",
                    serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["LINE", "SOURCE", "COMMAND", "LEN", "BYTES"]);
            for record in records {
                table.add_row(vec![
                    record.line.to_string(),
                    record.source.clone(),
                    record.command.to_string(),
                    record.length.to_string(),
                    record.hex.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for record in records {
                println!(
                    "line={} command={} len={} bytes=[{}] source={:?}",
                    record.line, record.command, record.length, record.hex, record.source
                );
            }
        }
        OutputFormat::Raw => {
            for record in records {
                print_raw(&record.bytes);
            }
        }
    }
}

#[derive(Serialize)]
struct ReceivedOutput<'a> {
    direction: &'a str,
    length: usize,
    hex: String,
    timestamp: String,
}

/// Print bytes received from the controller.
pub fn print_received(data: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReceivedOutput {
                direction: "rx",
                length: data.len(),
                hex: encode_hex(data),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("rx len={} bytes=[{}]", data.len(), encode_hex(data));
        }
        OutputFormat::Raw => print_raw(data),
    }
}

#[derive(Serialize)]
struct PortsOutput<'a> {
    ports: &'a [String],
}

pub fn print_ports(ports: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&PortsOutput { ports }).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT"]);
            for port in ports {
                table.add_row(vec![port.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for port in ports {
                println!("{port}");
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
