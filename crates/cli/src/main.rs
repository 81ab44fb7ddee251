use std::process::ExitCode;

fn main() -> ExitCode {
    amplify_cli::run()
}
