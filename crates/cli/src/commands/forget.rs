use super::open_history;
use crate::config::Settings;

pub fn run(host: String) {
    let settings = Settings::load();
    let removed = open_history(&settings).and_then(|history| {
        let removed = history.forget(&host);
        history.shutdown();
        removed
    });

    match removed {
        Ok(true) => println!("Forgot {}", host),
        Ok(false) => println!("No saved pattern for {}", host),
        Err(e) => {
            eprintln!("Failed to update history: {:#}", e);
            std::process::exit(1);
        }
    }
}
