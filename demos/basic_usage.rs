/// Basic usage example: feed accelerometer events, watch the score
use shakeit::{MemoryStore, NotificationTray, SessionUpdate, ShakeConfig, ShakeEdge, ShakeSession};

fn main() -> Result<(), shakeit::ShakeError> {
    println!("=== ShakeIt Engine: Basic Example ===\n");

    // Default config: difference classifier, onset 50, continuation 5, 10 Hz
    let config = ShakeConfig::default();
    let mut session = ShakeSession::new(config, MemoryStore::new(), NotificationTray::new())?;
    session.activate();

    // Simulated X axis: phone at rest, a hard shake, then rest again
    let samples: Vec<[f32; 3]> = vec![
        // At rest (0-0.4 s)
        [0.1, 0.2, 9.81],
        [0.0, 0.1, 9.80],
        [0.2, 0.2, 9.81],
        [0.1, 0.1, 9.79],
        // Shaking (0.4-1.2 s)
        [35.0, 1.0, 9.5],
        [-32.0, 0.8, 9.9],
        [30.0, 1.2, 9.6],
        [-28.0, 0.9, 9.7],
        [25.0, 1.1, 9.8],
        [-20.0, 0.7, 9.8],
        [12.0, 0.5, 9.8],
        [4.0, 0.3, 9.8],
        // Settling (1.2-1.6 s)
        [3.0, 0.2, 9.81],
        [3.1, 0.1, 9.81],
        [3.0, 0.1, 9.80],
        [3.0, 0.1, 9.81],
    ];

    println!("Processing {} samples...\n", samples.len());

    for values in samples {
        if let Some(update) = session.on_sensor_event(values) {
            print_update(&update);
        }
    }

    println!("\n=== Summary ===");
    let stats = session.stats();
    println!("Samples: {}", stats.samples);
    println!("Shakes: {}", stats.shakes);
    println!("Best score: {}", stats.best_score);
    println!("Highscore: {}", session.highscore());

    while let Some(alert) = session.notifier_mut().pop() {
        println!("Notification [{}]: {} / {}", alert.channel_id, alert.title, alert.message);
    }

    let (min, max) = session.chart().axis_range();
    println!("Chart: {} points, axis {:.1}..{:.1}", session.chart().len(), min, max);
    Ok(())
}

fn print_update(update: &SessionUpdate) {
    let marker = match update.edge {
        ShakeEdge::Started => " <- shake started",
        ShakeEdge::Ended => " <- shake ended",
        ShakeEdge::None => "",
    };
    println!(
        "#{:<3} delta {:>6.1}  shaking {:<5}  score {:>4}  highscore {:>4}{}",
        update.index, update.delta, update.is_shaking, update.score, update.highscore, marker
    );
}
