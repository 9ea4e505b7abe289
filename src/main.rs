fn main() {
    if let Err(e) = marker_match::run(wild::args_os()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
