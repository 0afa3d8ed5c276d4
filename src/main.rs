//! kinematic main entrypoint.

use kinematic::run;
use kinematic::ui::envelope;

fn main() {
    if let Err(e) = run() {
        envelope::fail(&e);
        std::process::exit(e.exit_code());
    }
}
