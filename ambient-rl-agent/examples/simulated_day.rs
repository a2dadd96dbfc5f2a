//! Example: driving the engine through a synthetic day

use ambient_rl_agent::{AgentConfig, LearningEngine};
use ambient_rl_core::{FixedClock, RawSample};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let dir = std::env::temp_dir().join("ambient-rl-demo");
    std::fs::create_dir_all(&dir)?;
    let config = AgentConfig {
        table_path: dir.join("q_table.json"),
        log_path: dir.join("q_table_updates.json"),
        ..AgentConfig::default()
    };

    let mut total_reward = 0i64;
    let mut steps = 0usize;

    for hour in 0..24u8 {
        // One engine per hour keeps the demo's clock honest; recovery
        // carries the learned table across instances.
        let engine = LearningEngine::with_clock(config.clone(), Box::new(FixedClock(hour)));

        // A warm afternoon with someone home in the evening
        let occupied = (8..22).contains(&hour);
        let temperature = if (12..17).contains(&hour) { 31.0 } else { 24.0 };
        let sample = RawSample {
            temperature,
            motion: u8::from(occupied),
            light_state: 0,
            fan_speed: 0,
        };

        engine.observe(&sample)?;
        let action = engine.choose_action()?;

        // Pretend the actuators obeyed and feed the outcome back
        let after = RawSample {
            temperature,
            motion: u8::from(occupied),
            light_state: u8::from(action.target_light().unwrap_or(false)),
            fan_speed: match action.target_fan() {
                Some(level) => ambient_rl_core::state::FAN_RAW_SPEEDS[level.index()],
                None => sample.fan_speed,
            },
        };
        let reward = engine.feedback(&after, action, hour)?;
        total_reward += i64::from(reward);
        steps += 1;

        println!("hour {hour:2}: {action:<16} reward {reward:+4}");
    }

    println!("\n{steps} steps, total reward {total_reward:+}");
    Ok(())
}
