use log::LevelFilter;

fn main() -> anyhow::Result<()> {
    simple_logging::log_to_file(std::env::temp_dir().join("phpcbf-fmt.log"), LevelFilter::Info)?;
    phpcbf_fmt::cli::cli()
}
