// Bring-up: load a hardware description, walk the lifecycle, run the control loop
//
// Usage: cargo run --example bringup -- --description demos/diffbot.json --left 1.0 --right 1.0
//
// Make sure the wheels are OFF THE GROUND. Ctrl+C deactivates and cleans up.

use clap::Parser;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use epmc_hw_plugin::hardware::{HardwareComponent, HardwareInfo, HardwareRegistry, ReadStatus};

#[derive(Parser, Debug)]
#[command(about = "Drive an EPMC board through the hardware lifecycle")]
struct Args {
    /// Hardware description (JSON)
    #[arg(long, default_value = "demos/diffbot.json")]
    description: String,

    /// Override the serial port from the description
    #[arg(long)]
    port: Option<String>,

    /// Control loop frequency (1-1000 Hz)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..=1000))]
    hz: u64,

    /// Motor A target (rad/s)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    left: f64,

    /// Motor B target (rad/s)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    right: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args = Args::parse();

    let mut info = HardwareInfo::from_json(&std::fs::read_to_string(&args.description)?)?;
    if let Some(port) = args.port.clone() {
        info.hardware_parameters.insert("port".to_string(), port);
    }
    let motor_a = info.hardware_parameters.get("motorA_wheel_name").cloned().unwrap_or_default();
    let motor_b = info.hardware_parameters.get("motorB_wheel_name").cloned().unwrap_or_default();

    let registry = HardwareRegistry::with_builtin();
    let mut hw = HardwareComponent::load(&registry, &info)?;
    info!("State interfaces: {:?}", hw.state_interface_names());
    info!("Command interfaces: {:?}", hw.command_interface_names());

    hw.configure()?;
    hw.activate()?;

    let result = run(&mut hw, &args, &motor_a, &motor_b).await;

    if let Err(e) = hw.shutdown() {
        warn!("Shutdown failed: {}", e);
    }
    result
}

async fn run(
    hw: &mut HardwareComponent,
    args: &Args,
    motor_a: &str,
    motor_b: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let period = Duration::from_secs_f64(1.0 / args.hz as f64);
    let mut tick = interval(period);
    let mut cycles: u64 = 0;

    hw.set_command(&format!("{}/velocity", motor_a), args.left)?;
    hw.set_command(&format!("{}/velocity", motor_b), args.right)?;
    info!("Control loop started: {}Hz, targets a={} b={}", args.hz, args.left, args.right);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                return Ok(());
            }
        }

        if hw.read(period)? == ReadStatus::Stale {
            warn!("Stale motor state this cycle");
        }
        hw.write(period)?;

        cycles += 1;
        if cycles % args.hz == 0 {
            info!(
                "a: pos={:.3} vel={:.3} | b: pos={:.3} vel={:.3}",
                hw.state_value(&format!("{}/position", motor_a))?,
                hw.state_value(&format!("{}/velocity", motor_a))?,
                hw.state_value(&format!("{}/position", motor_b))?,
                hw.state_value(&format!("{}/velocity", motor_b))?,
            );
        }
    }
}
