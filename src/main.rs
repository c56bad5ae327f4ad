#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    venue_backend::run().await;
}
