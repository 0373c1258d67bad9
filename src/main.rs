#[tokio::main]
async fn main() {
    activity_booking::run().await;
}
