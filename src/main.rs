fn main() {
    if let Err(err) = starword::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
