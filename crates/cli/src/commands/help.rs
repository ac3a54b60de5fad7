pub fn run() {
    println!("Available commands:");
    println!();
    println!("  -search <document> --host <h>  Run one search and print every match");
    println!("      --pattern <p>              Pattern line (repeatable, defaults to saved)");
    println!("      --literal                  Match lines as plain text");
    println!("      --ignore-case              Case-insensitive matching");
    println!("  -history [--host <h>]          List saved patterns");
    println!("  -forget <host>                 Remove a host's saved pattern");
    println!("  -validate-patterns <p>...      Check which pattern lines compile");
    println!("  -show-config                   Display current configuration");
    println!("  -version                       Show version information");
    println!("  -help                          Show this help message");
}
