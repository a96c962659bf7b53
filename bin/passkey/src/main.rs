fn main() {
    if let Err(err) = passkey::cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
