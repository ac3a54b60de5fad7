pub fn run() {
    println!("regex-search-cli {}", env!("CARGO_PKG_VERSION"));
}
