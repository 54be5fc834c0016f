fn main() {
    if let Err(e) = domcluster::cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
