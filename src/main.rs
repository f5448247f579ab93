use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match counsel_web::web::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
