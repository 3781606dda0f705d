fn main() {
    if let Err(err) = parts_mapper::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
