mod utils;

use std::io;
use std::ops::Not;
use std::process::{Command, Stdio};

use utils::{print_command, print_info};

const ARCH: &str = "aarch64-unknown-none-softfloat";
const KERNEL_OUT: &str = "target/aarch64-unknown-none-softfloat/release/kernel";
const KERNEL_BIN: &str = "kernel8.img";
const LINKER_FILE: &str = "src/boot/kernel.ld";

type AnyErr = Box<dyn std::error::Error>;
type Result = std::result::Result<(), AnyErr>;

fn main() {
    let subcommand = std::env::args().nth(1);
    let res = match subcommand.as_deref() {
        Some("build") => build(),
        Some("qemu") => build().and_then(|_| qemu()),

        _ => {
            eprintln!("Tasks:");
            eprintln!("  build - build the kernel image ({})", KERNEL_BIN);
            eprintln!("  qemu  - build, then boot the image on an emulated Raspberry Pi 4");
            Ok(())
        }
    };

    if let Err(e) = res {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cmd: &mut Command, what: &str) -> Result {
    print_command(cmd);
    if cmd.status()?.success().not() {
        return Err(format!("{} failed", what).into());
    }
    Ok(())
}

fn build() -> Result {
    check_deps()?;

    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    run(
        Command::new(cargo)
            .arg("rustc")
            .args(["--package", "rasp4-io"])
            .args(["--bin", "kernel"])
            .args(["--target", ARCH])
            .arg("--release")
            .arg("--")
            .args(["-C", &format!("link-arg=-T{}", LINKER_FILE)])
            .args(["-C", "target-cpu=cortex-a72"])
            .args(["-C", "relocation-model=static"])
            .args(["-D", "warnings"]),
        "Build",
    )?;

    run(
        Command::new("rust-objcopy")
            .arg("--strip-all")
            .args(["-O", "binary"])
            .arg(KERNEL_OUT)
            .arg(KERNEL_BIN),
        "Objcopy",
    )?;

    print_info(format!("wrote {}", KERNEL_BIN));
    Ok(())
}

fn found(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_or(false, |status| status.success())
}

fn check_deps() -> Result {
    if found("rust-objcopy") {
        return Ok(());
    }

    eprintln!("Could not find rust-objcopy which is required for the build, would you like to install it? [y/n]");
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    if let "y" | "yes" = input.trim().to_lowercase().as_ref() {
        run(
            Command::new("cargo").args(["install", "cargo-binutils"]),
            "Installing 'cargo-binutils'",
        )?;
        run(
            Command::new("rustup").args(["component", "add", "llvm-tools-preview"]),
            "Adding component 'llvm-tools-preview'",
        )?;
        Ok(())
    } else {
        Err("rust-objcopy is required to produce the kernel image".into())
    }
}

fn qemu() -> Result {
    if !found("qemu-system-aarch64") {
        return Err("Could not find required binary 'qemu-system-aarch64'".into());
    }

    // The mini UART is the second serial port.
    run(
        Command::new("qemu-system-aarch64")
            .args(["-M", "raspi4b"])
            .args(["-display", "none"])
            .args(["-serial", "null"])
            .args(["-serial", "stdio"])
            .args(["-kernel", KERNEL_BIN]),
        "Qemu",
    )
}
