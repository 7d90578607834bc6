mod config;
mod run;

#[tokio::main]
async fn main() {
    if let Err(error) = run::run().await {
        eprintln!("qris-server failed: {error}");
        std::process::exit(1);
    }
}
