// Keyboard teleop: WASD move, QE/ZC diagonals, J/L rotate, R/F speed,
// 1-5 presets (circle, square, patrol, shoot, take), space stop, Esc quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::Duration;
use tracing::info;

use omni_kicker_runtime::config::{DEFAULT_KEY_PREFIX, TOPIC_DIRECTIVE, topic};
use omni_kicker_runtime::messages::Directive;

const SPEEDS: [i32; 4] = [25, 50, 75, 100]; // percent
const MOVE_SECONDS: u32 = 1;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let prefix = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string());

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session
        .declare_publisher(topic(&prefix, TOPIC_DIRECTIVE))
        .await?;

    info!("Controls: WASD/QEZC=move, J/L=rotate, R/F=speed, 1-5=presets, space=stop, Esc=quit");
    info!("Speed: {}%", SPEEDS[1]);

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

fn move_directive(direction: &str, speed: i32) -> Directive {
    Directive::Move {
        direction: direction.to_string(),
        duration: MOVE_SECONDS,
        speed,
    }
}

fn rotate_directive(rotation: &str, speed: i32) -> Directive {
    Directive::Rotate {
        rotation: rotation.to_string(),
        duration: MOVE_SECONDS,
        speed,
    }
}

fn command_directive(command: &str) -> Directive {
    Directive::Command {
        command: command.to_string(),
    }
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut speed_idx: usize = 1;

    loop {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }

        let speed = SPEEDS[speed_idx];
        let directive = match code {
            KeyCode::Char('w') => move_directive("forward", speed),
            KeyCode::Char('s') => move_directive("backward", speed),
            KeyCode::Char('a') => move_directive("left", speed),
            KeyCode::Char('d') => move_directive("right", speed),
            KeyCode::Char('q') => move_directive("forward left", speed),
            KeyCode::Char('e') => move_directive("forward right", speed),
            KeyCode::Char('z') => move_directive("backward left", speed),
            KeyCode::Char('c') => move_directive("backward right", speed),
            KeyCode::Char(' ') => move_directive("stop", 0),

            KeyCode::Char('j') => rotate_directive("counterclockwise", speed),
            KeyCode::Char('l') => rotate_directive("clockwise", speed),

            KeyCode::Char('1') => command_directive("circle"),
            KeyCode::Char('2') => command_directive("square"),
            KeyCode::Char('3') => command_directive("patrol"),
            KeyCode::Char('4') => command_directive("shoot"),
            KeyCode::Char('5') => command_directive("take"),

            // Speed control
            KeyCode::Char('r') => {
                speed_idx = (speed_idx + 1).min(SPEEDS.len() - 1);
                info!("Speed: {}%", SPEEDS[speed_idx]);
                continue;
            }
            KeyCode::Char('f') => {
                speed_idx = speed_idx.saturating_sub(1);
                info!("Speed: {}%", SPEEDS[speed_idx]);
                continue;
            }

            KeyCode::Esc => break,
            _ => continue,
        };

        let json = serde_json::to_string(&directive)?;
        info!("Sending {}", json);
        publisher.put(json).await?;
    }

    Ok(())
}
