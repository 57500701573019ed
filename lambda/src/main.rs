#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    lambda::run().await
}
