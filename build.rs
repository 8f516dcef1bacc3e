use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=cfg.toml");
    if !Path::new("cfg.toml").exists() {
        println!("cargo:warning=cfg.toml not found, building with defaults (see cfg.toml.example)");
    }

    // Host builds (tests) have no ESP-IDF environment to propagate.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
    Ok(())
}
