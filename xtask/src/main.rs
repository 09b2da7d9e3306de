use std::env;

/// Finds the value of `--target <triple>` so every cross build lands in its own target
/// directory, e.g. `target/x86_64-pc-windows-gnu`. The flag itself is left in place for
/// `nih_plug_xtask` to forward to cargo.
fn requested_target(args: &[String]) -> Option<&str> {
    let pos = args.iter().position(|a| a == "--target")?;
    args.get(pos + 1).map(String::as_str)
}

fn main() -> nih_plug_xtask::Result<()> {
    let args = env::args().collect::<Vec<_>>();

    if let Some(target) = requested_target(&args) {
        env::set_var("CARGO_TARGET_DIR", format!("target/{}", target));
    }

    nih_plug_xtask::main()
}
