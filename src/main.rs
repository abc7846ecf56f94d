fn main() {
    #[cfg(feature = "cli")]
    bdelta::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("bdelta: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
