#[tokio::main]
async fn main() {
    if let Err(err) = dfs_api::run().await {
        tracing::error!(error = %err, "dfs-api failed");
        eprintln!("dfs-api failed: {err}");
        std::process::exit(1);
    }
}
