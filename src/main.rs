fn main() {
    if let Err(err) = bkaudit::cli::run() {
        bkaudit::ui::eprintln_error(&err);
        std::process::exit(bkaudit::exit::exit_code(&err));
    }
}
