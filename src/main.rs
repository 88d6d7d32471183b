use std::process::ExitCode;

fn main() -> ExitCode {
    youtrack_hook_lib::run()
}
