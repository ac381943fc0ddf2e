//! Thermostat demo: a PID controller regulating a first-order thermal plant.
//!
//! Run with `cargo run --example thermostat` and set `RUST_LOG=debug` to see
//! the telemetry stream.

use rl_pid::{PidConfig, PidController, TracingSink};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let dt = 0.1;
    let config = PidConfig::new()
        .with_kp(0.6)
        .with_ki(0.15)
        .with_kd(0.05)
        .with_tau(0.5)
        .with_time_step(dt)
        .with_output_limits(0.0, 1.0)
        .with_telemetry("demo.thermostat");
    let mut controller = PidController::new(config).with_telemetry(TracingSink);

    // plant: room temperature with heater input and ambient losses
    let ambient = 15.0;
    let set_point = 21.0;
    let mut temperature = ambient;

    for step in 0..600 {
        let heat = controller.step(set_point, temperature);
        temperature += dt * (4.0 * heat - 0.08 * (temperature - ambient));

        if step % 50 == 0 {
            tracing::info!(step, temperature, heat, "thermostat");
        }
    }

    tracing::info!(
        final_temperature = temperature,
        set_point,
        "demo finished"
    );
}
