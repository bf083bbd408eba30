fn main() {
    if let Err(err) = university_loader::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
