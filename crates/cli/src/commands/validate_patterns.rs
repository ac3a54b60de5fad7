use regex_search_engine::{LineCheck, PatternSet, SearchConfig, check_lines};

use crate::config::Settings;

pub fn run(patterns: Vec<String>) {
    let settings = Settings::load();
    let checks = validate(&patterns, &settings.search);

    if checks.is_empty() {
        println!("No pattern lines given");
        std::process::exit(1);
    }

    for check in &checks {
        match &check.error {
            None => println!("  ok     {}", check.pattern),
            Some(error) => {
                println!("  error  {}", check.pattern);
                for line in error.lines() {
                    println!("         {}", line);
                }
            }
        }
    }

    let invalid = checks.iter().filter(|check| !check.is_valid()).count();
    println!();
    if invalid == 0 {
        println!("Result: Valid");
    } else {
        println!(
            "Result: {} of {} lines invalid (invalid lines are skipped when searching)",
            invalid,
            checks.len()
        );
        std::process::exit(1);
    }
}

/// Each argument may hold several newline-separated lines.
fn validate(patterns: &[String], config: &SearchConfig) -> Vec<LineCheck> {
    check_lines(&PatternSet::parse(&patterns.join("\n")), config)
}
