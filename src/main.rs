fn main() {
    cops_client::cli::run();
}
