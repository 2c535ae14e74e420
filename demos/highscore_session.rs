/// Highscore example: two app sessions sharing a preferences file
///
/// The first session scores and persists a high score; the second one reads
/// it back before any sample arrives, then resets it.
use shakeit::{
    ClassifierKind, JsonFileStore, LogNotifier, ReplaySource, ShakeConfig, ShakeResult,
    ShakeSession,
};

fn main() -> ShakeResult<()> {
    tracing_subscriber::fmt().with_env_filter("shakeit=debug").init();

    let path = std::env::temp_dir().join("shakeit_highscore_demo.json");
    let _ = std::fs::remove_file(&path);

    let config = ShakeConfig {
        classifier: ClassifierKind::PeakToPeak,
        shake_intensity: 30.0,
        ..Default::default()
    };

    // Session 1: play a recording
    {
        let recording = "\
# x, y, z
0.0, 0.1, 9.8
20.0, 0.3, 9.7
-20.0, 0.2, 9.9
22.0, 0.4, 9.6
-21.0, 0.1, 9.8
19.0, 0.2, 9.8
18.5, 0.1, 9.8
18.8, 0.1, 9.8
";
        let mut source = ReplaySource::parse(recording)?;
        let mut session = ShakeSession::new(config.clone(), JsonFileStore::open(&path)?, LogNotifier)?;

        session.resume(&mut source)?;
        let updates = session.drain(&mut source);
        session.pause(&mut source);

        println!("Session 1: {} samples, highscore {}", updates.len(), session.highscore());
    }

    // Session 2: the high score is already there
    {
        let mut session = ShakeSession::new(config, JsonFileStore::open(&path)?, LogNotifier)?;
        println!("Session 2: loaded highscore {}", session.highscore());

        session.reset_highscore();
        println!("Session 2: after reset {}", session.highscore());
    }

    println!("Preferences file: {}", std::fs::read_to_string(&path)?);
    std::fs::remove_file(&path)?;
    Ok(())
}
