use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;

fn main() -> Result<()> {
    // This tells cargo to rerun this script if something in /res/ changes.
    println!("cargo:rerun-if-changed=res/");

    // Copy the /res/ folder next to the executable.
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    let paths_to_copy = vec!["res/"];

    let profile = std::env::var("PROFILE")?;
    let target_dir = std::env::var("CARGO_TARGET_DIR").unwrap_or_else(|_| "./target".to_string());
    let output_dir = format!("{}/{}/", target_dir, profile);

    // Make sure the directory exists.
    std::fs::create_dir_all(&output_dir)?;
    copy_items(&paths_to_copy, &output_dir, &copy_options)?;

    Ok(())
}
