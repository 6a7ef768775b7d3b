#[tokio::main]
async fn main() {
    // Errors are logged inside the bootstrap path; exit nonzero on failure.
    if discovery_server::run_with_config().await.is_err() {
        std::process::exit(1);
    }
}
