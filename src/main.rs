#[tokio::main]
async fn main() {
    if let Err(e) = tournament_predictor_lib::run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
