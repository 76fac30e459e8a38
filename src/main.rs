#[tokio::main]
async fn main() {
    if let Err(e) = cardiocheck_lib::run().await {
        tracing::error!(error = %e, "CardioCheck exited with an error");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
