use std::process::ExitCode;
use usmca_compliance_api::run;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("application error: {err}");
            ExitCode::FAILURE
        }
    }
}
