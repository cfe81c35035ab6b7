use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde_json::Value;
use tracing::debug;

use crate::api::{ApiClient, DeviceSource};
use crate::config::Settings;
use crate::selector::DeviceIdentifier;
use crate::table::{self, TableStyle};
use crate::terminology::{LEGACY_WARNING, Terminology};
use crate::view::{DeviceView, derive_view};

#[derive(Debug, Clone, Args)]
pub struct DeviceArgs {
    /// Device uuid (full or short) or numeric device id.
    #[arg(value_name = "uuid")]
    pub uuid: String,
    /// Use "fleet" instead of the deprecated "application" terminology.
    #[arg(long)]
    pub v13: bool,
    /// Print the device as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Output streams plus what we know about the attached terminal.
pub struct Console<O: Write, E: Write> {
    pub out: O,
    pub err: E,
    pub stderr_is_terminal: bool,
    pub color: bool,
}

/// Table rows, top to bottom.
pub fn device_fields(terminology: Terminology) -> Vec<&'static str> {
    vec![
        "$device_name$",
        "id",
        "device_type",
        "status",
        "is_online",
        "ip_address",
        "public_address",
        "mac_address",
        terminology.application_field(),
        "last_seen",
        "uuid",
        "commit",
        "supervisor_version",
        "is_web_accessible",
        "note",
        "os_version",
        "dashboard_url",
        "cpu_usage_percent",
        "cpu_temp_c",
        "cpu_id",
        "memory_usage_mb",
        "memory_total_mb",
        "memory_usage_percent",
        "storage_block_device",
        "storage_usage_mb",
        "storage_total_mb",
        "storage_usage_percent",
        "undervoltage_detected",
    ]
}

pub async fn run(args: DeviceArgs, settings: &Settings) -> Result<()> {
    let client = ApiClient::new(settings)?;
    let mut console = Console {
        out: io::stdout(),
        err: io::stderr(),
        stderr_is_terminal: io::stderr().is_terminal(),
        color: io::stdout().is_terminal(),
    };
    show(&args, &client, settings, &mut console).await
}

/// Fetches one device and prints it. Nothing is written unless the fetch succeeds.
pub async fn show<S, O, E>(
    args: &DeviceArgs,
    source: &S,
    settings: &Settings,
    console: &mut Console<O, E>,
) -> Result<()>
where
    S: DeviceSource,
    O: Write,
    E: Write,
{
    let identifier = DeviceIdentifier::parse(&args.uuid);
    debug!("[CLI][DEVICE] resolving {:?}", identifier);
    let record = source.fetch_device(&identifier).await?;

    let view = derive_view(&record, &settings.dashboard_url);
    let terminology = Terminology::resolve(args.v13, settings.v13);

    if terminology.is_legacy() && console.stderr_is_terminal {
        writeln!(console.err, "{}", LEGACY_WARNING.yellow())?;
    }

    if args.json {
        writeln!(console.out, "{}", serde_json::to_string_pretty(&view)?)?;
    } else {
        let rendered = render_table(&view, terminology, TableStyle {
            color: console.color,
        })?;
        write!(console.out, "{}", rendered)?;
    }
    console.out.flush()?;
    Ok(())
}

fn render_table(view: &DeviceView, terminology: Terminology, style: TableStyle) -> Result<String> {
    let Value::Object(record) = serde_json::to_value(view)? else {
        anyhow::bail!("device view did not serialize to an object");
    };
    Ok(table::vertical(&record, &device_fields(terminology), style))
}
