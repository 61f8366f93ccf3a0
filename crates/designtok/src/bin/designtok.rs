fn main() {
    if let Err(err) = designtok::run() {
        eprintln!("{}", designtok::format_error(&err));
        std::process::exit(1);
    }
}
