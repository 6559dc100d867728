use std::process::ExitCode;

fn main() -> ExitCode {
    ExitCode::from(dnssec_runner::run(dnssec_runner::env::RealEnv))
}
